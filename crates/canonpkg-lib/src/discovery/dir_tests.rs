use std::fs;

use super::{DirSource, DiscoveryError, PackageSource};

#[test]
fn reads_package_files_in_name_order() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("example.com/lib");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("b.go"), "package lib\n").unwrap();
    fs::write(dir.join("a.go"), "package lib\n\ntype T int\n").unwrap();
    fs::write(dir.join("a_test.go"), "package lib\n").unwrap();
    fs::write(dir.join("notes.txt"), "ignored").unwrap();
    fs::create_dir(dir.join("sub.go")).unwrap();

    let files = DirSource::new(root.path()).locate("example.com/lib").unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|f| f.name.rsplit('/').next().unwrap().to_string())
        .collect();
    assert_eq!(names, ["a.go", "b.go"]);
    assert!(files[0].text.contains("type T int"));
}

#[test]
fn missing_directory_is_not_found() {
    let root = tempfile::tempdir().unwrap();
    let source = DirSource::new(root.path());
    assert_eq!(source.root(), root.path());
    assert_eq!(
        source.locate("nowhere").unwrap_err(),
        DiscoveryError::NotFound {
            path: "nowhere".into()
        }
    );
}

#[test]
fn directory_without_go_files() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("empty")).unwrap();
    fs::write(root.path().join("empty/only_test.go"), "package empty\n").unwrap();

    let err = DirSource::new(root.path()).locate("empty").unwrap_err();
    assert!(matches!(err, DiscoveryError::NoSourceFiles { .. }));
}

#[test]
fn rejects_escaping_paths() {
    let root = tempfile::tempdir().unwrap();
    let err = DirSource::new(root.path()).locate("a/../b").unwrap_err();
    assert!(matches!(err, DiscoveryError::InvalidPath(_)));
}
