use std::fs;

use canonpkg_lib::{ResolutionFailure, SourceFile};
use indoc::indoc;

use super::LookupArgs;
use super::identical::{CompareError, compare, split_type_ref};
use super::session::new_registry;

const DEMO: &str = indoc! {r#"
    package demo

    import "sync"

    var m sync.Mutex

    func F() {}
"#};

fn std_only() -> LookupArgs {
    LookupArgs::default()
}

fn demo() -> SourceFile {
    SourceFile::new("demo.go", DEMO)
}

#[test]
fn type_refs() {
    assert_eq!(split_type_ref("sync.Mutex"), Ok(("sync", "Mutex")));
    assert_eq!(
        split_type_ref("example.com/app.Config"),
        Ok(("example.com/app", "Config"))
    );
    assert_eq!(
        split_type_ref("gopkg.in/yaml.v3.Node"),
        Ok(("gopkg.in/yaml.v3", "Node"))
    );
    assert!(split_type_ref("Mutex").is_err());
    assert!(split_type_ref(".Mutex").is_err());
    assert!(split_type_ref("sync.").is_err());
}

#[test]
fn shared_registry_is_identical() {
    let registry = new_registry(&std_only());
    let verdict = compare(&registry, None, demo(), "m", "sync.Mutex").unwrap();
    assert!(verdict);
}

#[test]
fn isolated_registry_is_not_identical() {
    let registry = new_registry(&std_only());
    let isolated = new_registry(&std_only());
    let verdict = compare(&registry, Some(&isolated), demo(), "m", "sync.Mutex").unwrap();
    assert!(!verdict);
}

#[test]
fn different_type_is_not_identical() {
    let registry = new_registry(&std_only());
    let verdict = compare(&registry, None, demo(), "m", "sync.RWMutex").unwrap();
    assert!(!verdict);
}

#[test]
fn usage_errors() {
    let registry = new_registry(&std_only());

    let err = compare(&registry, None, demo(), "missing", "sync.Mutex").unwrap_err();
    assert!(matches!(err, CompareError::Usage(msg) if msg == "undefined: missing"));

    let err = compare(&registry, None, demo(), "F", "sync.Mutex").unwrap_err();
    assert!(matches!(err, CompareError::Usage(msg) if msg == "`F` is a func, not a variable"));

    let err = compare(&registry, None, demo(), "m", "sync.Nope").unwrap_err();
    assert!(matches!(err, CompareError::Usage(msg) if msg == "package `sync` has no type `Nope`"));
}

#[test]
fn resolution_failures() {
    let registry = new_registry(&std_only());
    let err = compare(&registry, None, demo(), "m", "example.com/none.T").unwrap_err();
    assert!(matches!(
        err,
        CompareError::Failed(ResolutionFailure::PackageNotFound { .. })
    ));

    let no_std = new_registry(&LookupArgs {
        no_std: true,
        ..LookupArgs::default()
    });
    let err = compare(&no_std, None, demo(), "m", "sync.Mutex").unwrap_err();
    assert!(matches!(
        err,
        CompareError::Failed(ResolutionFailure::PackageNotFound { path, .. }) if path == "sync"
    ));
}

#[test]
fn roots_are_searched_before_std() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("example.com/app");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("app.go"),
        "package app\n\nimport \"sync\"\n\ntype Guard struct {\n\tmu sync.Mutex\n}\n",
    )
    .unwrap();

    let args = LookupArgs {
        roots: vec![root.path().to_path_buf()],
        ..LookupArgs::default()
    };
    let registry = new_registry(&args);
    let unit = SourceFile::new(
        "main.go",
        "package main\n\nimport \"example.com/app\"\n\nvar g app.Guard\n",
    );
    assert!(compare(&registry, None, unit, "g", "example.com/app.Guard").unwrap());
}
