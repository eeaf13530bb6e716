//! Shared argument builders for CLI commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Go source file of the inline unit (positional, "-" for stdin).
pub fn file_arg() -> Arg {
    Arg::new("file")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Go source file (use \"-\" for stdin)")
}

/// Inline source text (-e/--source).
pub fn source_text_arg() -> Arg {
    Arg::new("source_text")
        .short('e')
        .long("source")
        .value_name("TEXT")
        .conflicts_with("file")
        .help("Inline source text")
}

/// Import path to load (positional).
pub fn import_path_arg() -> Arg {
    Arg::new("import_path")
        .value_name("IMPORT_PATH")
        .required(true)
        .help("Import path, e.g. sync or example.com/app")
}

/// Variable of the inline unit to compare (--var).
pub fn var_arg() -> Arg {
    Arg::new("var")
        .long("var")
        .value_name("NAME")
        .required(true)
        .help("Package-level variable whose declared type is compared")
}

/// Qualified type to compare against (--type).
pub fn type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .value_name("PATH.NAME")
        .required(true)
        .help("Type to compare against, e.g. sync.Mutex")
}

/// Load the target package through a second registry (--isolated).
pub fn isolated_arg() -> Arg {
    Arg::new("isolated")
        .long("isolated")
        .action(ArgAction::SetTrue)
        .help("Load the target package through a separate registry")
}

/// Package roots (--root, repeatable).
pub fn root_arg() -> Arg {
    Arg::new("root")
        .long("root")
        .value_name("DIR")
        .action(ArgAction::Append)
        .value_parser(value_parser!(PathBuf))
        .help("Directory holding <import path>/*.go packages (repeatable)")
}

/// Leave out the embedded standard packages (--no-std).
pub fn no_std_arg() -> Arg {
    Arg::new("no_std")
        .long("no-std")
        .action(ArgAction::SetTrue)
        .help("Do not resolve the embedded standard packages")
}

/// Output JSON (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print the package summary as JSON")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}
