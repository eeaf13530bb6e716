//! Tests for CLI dispatch logic.

use std::path::PathBuf;

use super::*;
use crate::cli::commands::{check_command, describe_command, identical_command};

#[test]
fn check_accepts_file() {
    let m = check_command()
        .try_get_matches_from(["check", "demo.go", "--color", "never"])
        .unwrap();
    let params = CheckParams::from_matches(&m);

    assert_eq!(params.file, Some(PathBuf::from("demo.go")));
    assert_eq!(params.source_text, None);
    assert_eq!(params.lookup.color, ColorChoice::Never);
    assert!(params.lookup.roots.is_empty());
    assert!(!params.lookup.no_std);
}

#[test]
fn check_accepts_inline_source() {
    let m = check_command()
        .try_get_matches_from(["check", "-e", "package demo"])
        .unwrap();
    let params = CheckParams::from_matches(&m);
    assert_eq!(params.file, None);
    assert_eq!(params.source_text.as_deref(), Some("package demo"));
}

#[test]
fn check_rejects_file_and_inline_source() {
    let result = check_command().try_get_matches_from(["check", "demo.go", "-e", "package demo"]);
    assert!(result.is_err());
}

#[test]
fn roots_repeat_in_order() {
    let m = check_command()
        .try_get_matches_from(["check", "demo.go", "--root", "a", "--root", "b", "--no-std"])
        .unwrap();
    let params = CheckParams::from_matches(&m);
    assert_eq!(
        params.lookup.roots,
        [PathBuf::from("a"), PathBuf::from("b")]
    );
    assert!(params.lookup.no_std);
}

#[test]
fn identical_requires_var_and_type() {
    let missing_type = identical_command().try_get_matches_from(["identical", "demo.go", "--var", "m"]);
    assert!(missing_type.is_err());

    let missing_var =
        identical_command().try_get_matches_from(["identical", "demo.go", "--type", "sync.Mutex"]);
    assert!(missing_var.is_err());
}

#[test]
fn identical_params() {
    let m = identical_command()
        .try_get_matches_from([
            "identical",
            "demo.go",
            "--var",
            "m",
            "--type",
            "sync.Mutex",
            "--isolated",
            "--color",
            "always",
        ])
        .unwrap();
    let params = IdenticalParams::from_matches(&m);

    assert_eq!(params.file, Some(PathBuf::from("demo.go")));
    assert_eq!(params.var, "m");
    assert_eq!(params.type_ref, "sync.Mutex");
    assert!(params.isolated);
    assert_eq!(params.lookup.color, ColorChoice::Always);
}

#[test]
fn describe_params() {
    let m = describe_command()
        .try_get_matches_from(["describe", "sync/atomic", "--json"])
        .unwrap();
    let params = DescribeParams::from_matches(&m);
    assert_eq!(params.import_path, "sync/atomic");
    assert!(params.json);
    assert_eq!(params.lookup.color, ColorChoice::Auto);
}

#[test]
fn describe_requires_import_path() {
    assert!(describe_command().try_get_matches_from(["describe"]).is_err());
}

#[test]
fn color_choice_explicit_values() {
    assert!(ColorChoice::Always.should_colorize());
    assert!(!ColorChoice::Never.should_colorize());
}

#[test]
fn cli_lists_all_commands() {
    let cli = build_cli();
    let names: Vec<_> = cli.get_subcommands().map(|c| c.get_name()).collect();
    assert_eq!(names, ["check", "identical", "describe"]);
}
