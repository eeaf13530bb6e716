use canonpkg_lib::{MemorySource, Registry};
use indoc::indoc;

use super::describe::render_text;

const GEO: &str = indoc! {r#"
    package geo

    type Point struct {
        X, Y int
    }

    func (p Point) Norm() int { return 0 }

    const Origin = 0

    var unit Point

    func Dist(a, b Point) int { return 0 }
"#};

fn geo() -> canonpkg_lib::TypedPackage {
    let registry = Registry::new(MemorySource::new().with("example.com/geo", "geo.go", GEO));
    registry.load_path("example.com/geo").unwrap()
}

#[test]
fn text_lists_declarations() {
    insta::assert_snapshot!(render_text(&geo()), @r"
    package geo (example.com/geo)
    type Point struct{X int; Y int}
        method Norm() int
    const Origin int
    var unit example.com/geo.Point  (unexported)
    func Dist(example.com/geo.Point, example.com/geo.Point) int
    ");
}

#[test]
fn json_summary() {
    let value = serde_json::to_value(geo().summary()).unwrap();

    assert_eq!(
        value["key"],
        serde_json::json!({ "kind": "path", "path": "example.com/geo" })
    );
    assert_eq!(value["name"], "geo");
    assert_eq!(value["files"], serde_json::json!(["geo.go"]));
    assert_eq!(value["decls"][0]["name"], "Point");
    assert_eq!(value["decls"][0]["kind"], "type");
    assert_eq!(value["decls"][0]["methods"], serde_json::json!(["Norm() int"]));
    // Methods are left out when there are none.
    assert!(value["decls"][1].get("methods").is_none());
}

#[test]
fn std_package_imports_are_listed() {
    let registry = Registry::new(canonpkg_lib::StdSource);
    let sync = registry.load_path("sync").unwrap();
    let text = render_text(&sync);
    assert!(text.starts_with("package sync (sync)\nimport sync/atomic\n"));
    assert!(text.contains("type Mutex struct{"));
}
