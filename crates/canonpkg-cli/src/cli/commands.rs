//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Package lookup flags shared by every command.
fn with_lookup_args(cmd: Command) -> Command {
    cmd.arg(root_arg()).arg(no_std_arg()).arg(color_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("canonpkg")
        .about("Canonical package loading and type identity checks")
        .after_help(
            "ENVIRONMENT:
  CANONPKG_PATH       extra package roots, searched after --root
  CANONPKG_LOG        tracing filter, e.g. canonpkg_lib=debug
  CANONPKG_LOG_STYLE  set to `full` for timestamps",
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(check_command())
        .subcommand(identical_command())
        .subcommand(describe_command())
}

/// Type-check an inline unit.
pub fn check_command() -> Command {
    let cmd = Command::new("check")
        .about("Type-check a Go source file")
        .override_usage(
            "\
  canonpkg check <FILE>
  canonpkg check -e <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  canonpkg check demo.go
  canonpkg check demo.go --root ./src
  canonpkg check -e 'package demo; import "sync"; var m sync.Mutex'"#,
        )
        .arg(file_arg())
        .arg(source_text_arg());

    with_lookup_args(cmd)
}

/// Compare a variable's declared type with a package type.
pub fn identical_command() -> Command {
    let cmd = Command::new("identical")
        .about("Check whether a variable's type is identical to a package type")
        .override_usage(
            "\
  canonpkg identical <FILE> --var <NAME> --type <PATH.NAME> [--isolated]
  canonpkg identical -e <TEXT> --var <NAME> --type <PATH.NAME> [--isolated]",
        )
        .after_help(
            r#"EXAMPLES:
  canonpkg identical demo.go --var m --type sync.Mutex
  canonpkg identical demo.go --var m --type sync.Mutex --isolated   # not identical"#,
        )
        .arg(file_arg())
        .arg(source_text_arg())
        .arg(var_arg())
        .arg(type_arg())
        .arg(isolated_arg());

    with_lookup_args(cmd)
}

/// Print the declarations of a package.
pub fn describe_command() -> Command {
    let cmd = Command::new("describe")
        .about("Print the declarations of a package")
        .after_help(
            r#"EXAMPLES:
  canonpkg describe sync
  canonpkg describe example.com/app --root ./src --json"#,
        )
        .arg(import_path_arg())
        .arg(json_arg());

    with_lookup_args(cmd)
}
