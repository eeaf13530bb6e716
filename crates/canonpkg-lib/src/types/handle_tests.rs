use canonpkg_core::BasicKind;

use super::test_utils::{Fixture, sync_like};
use super::{DeclKind, TypeData, TypeKind, TypedPackage};

#[test]
fn named_type_views() {
    let sync = sync_like();
    let mutex = sync.lookup_type("Mutex").unwrap();

    assert_eq!(mutex.kind(), TypeKind::Named);
    assert_eq!(mutex.name(), Some("Mutex"));
    assert_eq!(mutex.to_string(), "sync.Mutex");

    let underlying = mutex.underlying();
    assert_eq!(underlying.kind(), TypeKind::Struct);
    insta::assert_snapshot!(underlying.to_string(), @"struct{state int32; sema uint32}");

    let fields = underlying.fields();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name, "state");
    assert_eq!(fields[0].ty.basic(), Some(BasicKind::Int32));

    let methods = mutex.methods();
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0].name, "Lock");
    assert!(methods[0].pointer_receiver);
    assert_eq!(methods[0].signature.to_string(), "func()");
    assert!(mutex.method("Unlock").is_none());
}

#[test]
fn imported_links_resolve_to_owner() {
    let sync = sync_like();
    let mutex = sync.lookup_type("Mutex").unwrap();

    let mut demo = Fixture::new("demo");
    let link = demo.import(&mutex);
    let ptr = demo.push(TypeData::Pointer(link));
    demo.var("mutex", link);
    demo.var("ptr", ptr);
    let demo = demo.build();

    let var = demo.type_of("mutex").unwrap();
    assert!(TypedPackage::ptr_eq(var.package(), &demo));
    assert!(TypedPackage::ptr_eq(var.canonical().package(), &sync));
    assert_eq!(var.kind(), TypeKind::Named);
    assert_eq!(var.to_string(), "sync.Mutex");

    let ptr = demo.type_of("ptr").unwrap();
    assert_eq!(ptr.to_string(), "*sync.Mutex");
    let elem = ptr.elem().unwrap();
    assert!(TypedPackage::ptr_eq(elem.canonical().package(), &sync));
    assert_eq!(elem.underlying().kind(), TypeKind::Struct);

    assert_eq!(demo.imports().len(), 1);
    assert!(TypedPackage::ptr_eq(&demo.imports()[0], &sync));
}

#[test]
fn composite_display() {
    let mut f = Fixture::new("example.com/shapes");
    let int = f.basic(BasicKind::Int);
    let string = f.basic(BasicKind::String);
    let strings = f.push(TypeData::Slice(string));
    let point = f.push(TypeData::Struct(vec![
        Fixture::field("X", int),
        Fixture::field("Y", int),
    ]));
    let named = f.named("Point", point);
    let index = f.push(TypeData::Map(string, named));
    let variadic = f.push(TypeData::Signature {
        params: vec![int, strings],
        results: vec![int, named],
        variadic: true,
    });
    let single = f.push(TypeData::Signature {
        params: vec![],
        results: vec![int],
        variadic: false,
    });
    f.var("index", index);
    f.var("variadic", variadic);
    f.var("single", single);
    let pkg = f.build();

    insta::assert_snapshot!(pkg.type_of("index").unwrap().to_string(), @"map[string]example.com/shapes.Point");
    insta::assert_snapshot!(pkg.type_of("variadic").unwrap().to_string(), @"func(int, ...string) (int, example.com/shapes.Point)");
    insta::assert_snapshot!(pkg.type_of("single").unwrap().to_string(), @"func() int");

    let sig = pkg.type_of("variadic").unwrap();
    assert!(sig.is_variadic());
    assert_eq!(sig.params().len(), 2);
    assert_eq!(sig.results().len(), 2);
    assert_eq!(sig.signature_suffix(), "(int, ...string) (int, example.com/shapes.Point)");

    let index = pkg.type_of("index").unwrap();
    assert_eq!(index.key().unwrap().basic(), Some(BasicKind::String));
    assert_eq!(index.elem().unwrap().name(), Some("Point"));
}

#[test]
fn declarations_and_exports() {
    let mut f = Fixture::new("p");
    let int = f.basic(BasicKind::Int);
    let exported = f.named("Exported", int);
    f.named("hidden", int);
    f.var("V", exported);
    f.var("v", int);
    let pkg = f.build();

    let names: Vec<_> = pkg.decls().map(|d| d.name).collect();
    assert_eq!(names, vec!["Exported", "hidden", "V", "v"]);

    let exports: Vec<_> = pkg.exports().map(|d| d.name).collect();
    assert_eq!(exports, vec!["Exported", "V"]);

    assert!(pkg.lookup_type("V").is_none());
    assert!(pkg.type_of("Exported").is_none());
    assert_eq!(pkg.decl("V").unwrap().kind, DeclKind::Var);
    assert_eq!(pkg.len(), 4);
}

#[test]
fn summary_serializes() {
    let summary = sync_like().summary();
    let json = serde_json::to_string_pretty(&summary).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "key": {
        "kind": "path",
        "path": "sync"
      },
      "name": "sync",
      "files": [
        "sync.go"
      ],
      "imports": [],
      "decls": [
        {
          "name": "Mutex",
          "kind": "type",
          "exported": true,
          "type": "struct{state int32; sema uint32}",
          "methods": [
            "Lock()"
          ]
        }
      ]
    }
    "#);
}
