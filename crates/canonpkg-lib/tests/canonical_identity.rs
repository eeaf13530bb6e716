//! Session-level identity properties, driven through the public API.

use std::fs;
use std::sync::Arc;
use std::thread;

use canonpkg_lib::{
    DirSource, MemorySource, Registry, ResolutionFailure, SearchPath, SourceFile, StdSource,
    TypedPackage, identical,
};
use indoc::indoc;

const DEMO: &str = indoc! {r#"
    package demo

    import "sync"

    var mutex sync.Mutex
"#};

#[test]
fn inline_unit_and_direct_load_share_the_mutex() {
    let registry = Registry::new(StdSource);
    let demo = registry.add_inline(SourceFile::new("demo.go", DEMO));

    let demo = registry.load(&demo).unwrap();
    let sync = registry.load_path("sync").unwrap();

    let var_type = demo.type_of("mutex").unwrap();
    let mutex = sync.lookup_type("Mutex").unwrap();
    assert!(identical(&var_type, &mutex));
    assert!(TypedPackage::ptr_eq(var_type.canonical().package(), &sync));
}

#[test]
fn isolated_registries_do_not_share_identity() {
    let shared = Registry::new(StdSource);
    let demo = shared.add_inline(SourceFile::new("demo.go", DEMO));
    let demo = shared.load(&demo).unwrap();

    let isolated = Registry::new(StdSource).load_path("sync").unwrap();
    let var_type = demo.type_of("mutex").unwrap();
    let mutex = isolated.lookup_type("Mutex").unwrap();

    assert_eq!(var_type.to_string(), "sync.Mutex");
    assert_eq!(mutex.to_string(), "sync.Mutex");
    assert!(!identical(&var_type, &mutex));
}

#[test]
fn transitive_imports_are_canonical() {
    let registry = Registry::new(StdSource);
    let sync = registry.load_path("sync").unwrap();
    let atomic = registry.load_path("sync/atomic").unwrap();

    assert!(TypedPackage::ptr_eq(&sync.imports()[0], &atomic));

    // `WaitGroup.state` is an atomic.Uint64 owned by the canonical atomic package.
    let wait_group = sync.lookup_type("WaitGroup").unwrap();
    let state = wait_group
        .underlying()
        .fields()
        .into_iter()
        .find(|f| f.name == "state")
        .unwrap();
    assert!(identical(&state.ty, &atomic.lookup_type("Uint64").unwrap()));
    assert_eq!(registry.stats().misses, 2);
}

#[test]
fn equal_declarations_under_distinct_keys_differ() {
    let text = "package shape\n\ntype Point struct {\n\tX, Y int\n}\n";
    let source = MemorySource::new()
        .with("example.com/one/shape", "shape.go", text)
        .with("example.com/two/shape", "shape.go", text);
    let registry = Registry::new(source);

    let one = registry.load_path("example.com/one/shape").unwrap();
    let two = registry.load_path("example.com/two/shape").unwrap();
    let p1 = one.lookup_type("Point").unwrap();
    let p2 = two.lookup_type("Point").unwrap();

    assert!(!identical(&p1, &p2));
    // Their exported struct shapes still match.
    assert!(identical(&p1.underlying(), &p2.underlying()));
}

#[test]
fn corrected_package_loads_after_failure() {
    let source = Arc::new(MemorySource::new().with(
        "example.com/cfg",
        "cfg.go",
        "package cfg\n\ntype Config struct {\n\tName string\n",
    ));
    let registry = Registry::new(Arc::clone(&source));
    let user = registry.add_inline(SourceFile::new(
        "main.go",
        "package main\n\nimport \"example.com/cfg\"\n\nvar c cfg.Config\n",
    ));

    let err = registry.load(&user).unwrap_err();
    assert!(matches!(err, ResolutionFailure::Parse { .. }));
    assert_eq!(err.key().unwrap().to_string(), "example.com/cfg");

    source
        .replace(
            "example.com/cfg",
            vec![SourceFile::new(
                "cfg.go",
                "package cfg\n\ntype Config struct {\n\tName string\n}\n",
            )],
        )
        .unwrap();

    let user = registry.load(&user).unwrap();
    let cfg = registry.load_path("example.com/cfg").unwrap();
    assert!(identical(
        &user.type_of("c").unwrap(),
        &cfg.lookup_type("Config").unwrap()
    ));
}

#[test]
fn concurrent_sessions_share_one_package() {
    let registry = Arc::new(Registry::new(StdSource));

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let key = registry.add_inline(SourceFile::new(format!("demo{}.go", i), DEMO));
                let demo = registry.load(&key).unwrap();
                demo.type_of("mutex").unwrap()
            })
        })
        .collect();
    let types: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let mutex = registry.load_path("sync").unwrap().lookup_type("Mutex").unwrap();
    assert!(types.iter().all(|t| identical(t, &mutex)));

    // Six inline units, `sync` and `sync/atomic`, each resolved once.
    assert_eq!(registry.stats().misses, 8);
}

#[test]
fn directory_packages_import_embedded_std() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("example.com/store");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("store.go"),
        indoc! {r#"
            package store

            import "sync"

            type Store struct {
                mu    sync.Mutex
                items map[string]int
            }

            func (s *Store) Len() int { return len(s.items) }
        "#},
    )
    .unwrap();

    let search = SearchPath::new()
        .with(DirSource::new(root.path()))
        .with(StdSource);
    let registry = Registry::new(search);

    let store = registry.load_path("example.com/store").unwrap();
    let sync = registry.load_path("sync").unwrap();

    let mu = store
        .lookup_type("Store")
        .unwrap()
        .underlying()
        .fields()
        .into_iter()
        .find(|f| f.name == "mu")
        .unwrap();
    assert!(identical(&mu.ty, &sync.lookup_type("Mutex").unwrap()));
    assert!(store.lookup_type("Store").unwrap().method("Len").is_some());
}
