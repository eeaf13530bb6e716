use std::sync::Arc;

use canonpkg_core::SourceFile;

use super::{DiscoveryError, MemorySource, PackageSource, SearchPath, StdSource};

#[test]
fn memory_source_keeps_insertion_order() {
    let source = MemorySource::new()
        .with("example.com/lib", "b.go", "package lib")
        .with("example.com/lib", "a.go", "package lib");

    let files = source.locate("example.com/lib").unwrap();
    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["b.go", "a.go"]);
    assert_eq!(source.paths(), ["example.com/lib"]);
}

#[test]
fn memory_source_unknown_path() {
    let err = MemorySource::new().locate("nope").unwrap_err();
    assert_eq!(
        err,
        DiscoveryError::NotFound {
            path: "nope".into()
        }
    );
    assert_eq!(err.to_string(), "cannot find package `nope`");
}

#[test]
fn memory_source_rejects_invalid_paths() {
    let err = MemorySource::new()
        .insert("../escape", SourceFile::new("x.go", "package x"))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid import path `../escape`: relative path segment"
    );
}

#[test]
fn std_source_packages() {
    assert_eq!(StdSource::paths(), ["sync", "sync/atomic"]);

    let sync = StdSource.locate("sync").unwrap();
    let names: Vec<_> = sync.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["sync/mutex.go", "sync/once.go", "sync/waitgroup.go"]);
    assert!(sync.iter().all(|f| f.text.contains("\npackage sync\n") || f.text.starts_with("package sync\n")));

    let atomic = StdSource.locate("sync/atomic").unwrap();
    assert_eq!(atomic.len(), 1);
    assert!(matches!(
        StdSource.locate("fmt"),
        Err(DiscoveryError::NotFound { .. })
    ));
}

#[test]
fn search_path_first_hit_wins() {
    let shadow = MemorySource::new().with("sync", "sync.go", "package sync\n\ntype Mutex int\n");
    let search = SearchPath::new().with(shadow).with(StdSource);
    assert_eq!(search.len(), 2);

    let files = search.locate("sync").unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "sync.go");

    let atomic = search.locate("sync/atomic").unwrap();
    assert_eq!(atomic[0].name, "sync/atomic/types.go");
}

#[test]
fn search_path_stops_at_hard_errors() {
    struct Broken;
    impl PackageSource for Broken {
        fn locate(&self, path: &str) -> Result<Vec<SourceFile>, DiscoveryError> {
            Err(DiscoveryError::NoSourceFiles { dir: path.into() })
        }
    }

    let mut search = SearchPath::new();
    search.push(Arc::new(Broken));
    search.push(Arc::new(StdSource));
    assert_eq!(
        search.locate("sync").unwrap_err(),
        DiscoveryError::NoSourceFiles { dir: "sync".into() }
    );
}

#[test]
fn empty_search_path() {
    let search = SearchPath::new();
    assert!(search.is_empty());
    assert!(matches!(
        search.locate("sync"),
        Err(DiscoveryError::NotFound { .. })
    ));
}
