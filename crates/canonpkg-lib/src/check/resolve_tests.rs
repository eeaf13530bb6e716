use indoc::indoc;

use super::test_utils::{Harness, type_of};
use crate::diagnostics::DiagnosticKind;
use crate::types::identical;

#[test]
fn underlying_types() {
    let package = Harness::new().ok(indoc! {r#"
        package app

        type Celsius float64
        type Pair struct {
            A, B int
        }
        type Index map[string][]int
        type Handler func(code int, rest ...string) bool
        type Split func() (int, string)
    "#});

    let underlying = |name: &str| package.lookup_type(name).unwrap().underlying().to_string();
    assert_eq!(underlying("Celsius"), "float64");
    assert_eq!(underlying("Pair"), "struct{A int; B int}");
    assert_eq!(underlying("Index"), "map[string][]int");
    assert_eq!(underlying("Handler"), "func(int, ...string) bool");
    assert_eq!(underlying("Split"), "func() (int, string)");
}

#[test]
fn self_reference_through_pointer() {
    let package = Harness::new().ok(indoc! {r#"
        package app

        type Node struct {
            next  *Node
            kids  []Node
            byKey map[string]*Node
            value int
        }
    "#});

    let node = package.lookup_type("Node").unwrap();
    assert_eq!(
        node.underlying().to_string(),
        "struct{next *example.com/app.Node; kids []example.com/app.Node; byKey map[string]*example.com/app.Node; value int}"
    );
    let next = node.underlying().fields()[0].ty.elem().unwrap();
    assert!(identical(&next, &node));
}

#[test]
fn declaration_order_does_not_matter() {
    let package = Harness::new().ok(indoc! {r#"
        package app

        var total Amount

        type Amount Units
        type Units uint64
    "#});

    assert_eq!(type_of(&package, "total"), "example.com/app.Amount");
    let amount = package.lookup_type("Amount").unwrap();
    assert_eq!(amount.underlying().to_string(), "uint64");
}

#[test]
fn alias_denotes_the_same_type() {
    let package = Harness::new().ok(indoc! {r#"
        package app

        type Byte = uint8
        type Name string
        type Label = Name

        var b Byte
        var l Label
    "#});

    assert_eq!(type_of(&package, "b"), "uint8");
    assert_eq!(type_of(&package, "l"), "example.com/app.Name");
    let label = package.lookup_type("Label").unwrap();
    let name = package.lookup_type("Name").unwrap();
    assert!(identical(&label, &name));
}

#[test]
fn recursive_struct() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        type A struct {
            b B
        }
        type B struct {
            a A
        }
    "#});

    insta::assert_snapshot!(res, @"error: invalid recursive type `A`");
}

#[test]
fn recursive_named_chain() {
    let res = Harness::new().kinds(indoc! {r#"
        package app

        type A B
        type B A
    "#});

    assert_eq!(res, vec![DiagnosticKind::InvalidRecursiveType]);
}

#[test]
fn recursive_alias() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        type T = []T
    "#});

    insta::assert_snapshot!(res, @"error: invalid recursive type `T`");
}

#[test]
fn map_keys_must_be_comparable() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        type Key struct {
            parts []string
        }

        var ok map[string]int
        var bad map[Key]int
        var worse map[[]int]bool
    "#});

    insta::assert_snapshot!(res, @r"
    error: invalid map key type Key
    error: invalid map key type []int
    ");
}

#[test]
fn duplicate_fields() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        type T struct {
            x int
            x string
        }
    "#});

    insta::assert_snapshot!(res, @"error: `x` redeclared in this block");
}

#[test]
fn embedded_fields() {
    let package = Harness::new().with("sync", "package sync\n\ntype Mutex struct {\n\tstate int32\n}\n").ok(indoc! {r#"
        package app

        import "sync"

        type Base struct{}

        type Derived struct {
            Base
            *sync.Mutex
            count int
        }
    "#});

    let fields = package.lookup_type("Derived").unwrap().underlying().fields();
    let names: Vec<_> = fields.iter().map(|f| (f.name.as_str(), f.embedded)).collect();
    assert_eq!(names, [("Base", true), ("Mutex", true), ("count", false)]);
}

#[test]
fn embedded_field_must_be_a_type_name() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        type T struct {
            *[]int
        }
    "#});

    insta::assert_snapshot!(res, @"error: invalid operation: embedded field type must be a type name");
}

#[test]
fn undefined_and_non_type_names() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        var v int

        type A Missing
        type B v
    "#});

    insta::assert_snapshot!(res, @r"
    error: undefined: Missing
    error: `v` is not a type
    ");
}

#[test]
fn qualified_names() {
    let res = Harness::new()
        .with("lib", "package lib\n\ntype Public int\ntype private int\n\nvar Value int\n")
        .messages(indoc! {r#"
            package app

            import "lib"

            type A lib.private
            type B lib.Gone
            type C lib.Value
            type D lib
        "#});

    insta::assert_snapshot!(res, @r"
    error: `lib.private` is not exported by its package
    error: undefined: lib.Gone
    error: `lib.Value` is not a type
    error: `lib` is not a type
    ");
}

#[test]
fn parameter_lists() {
    let package = Harness::new().ok(indoc! {r#"
        package app

        func Pair(a, b int, s string) (x, y bool) { return }
        func Anon(int, string) error2
        type error2 int
        func Spread(format string, args ...int) {}
    "#});

    assert_eq!(type_of(&package, "Pair"), "func(int, int, string) (bool, bool)");
    assert_eq!(type_of(&package, "Anon"), "func(int, string) example.com/app.error2");
    assert_eq!(type_of(&package, "Spread"), "func(string, ...int)");
}

#[test]
fn invalid_parameter_lists() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        func Mixed(a int, string) {}
        func Early(a ...int, b int) {}
        func Result() (...int) {}
        func Twice(a int, a string) {}
    "#});

    insta::assert_snapshot!(res, @r"
    error: invalid parameter list: mixed named and unnamed parameters
    error: invalid parameter list: can only use ... with final parameter
    error: invalid parameter list: cannot use ... in result list
    error: `a` redeclared in this block
    ");
}

#[test]
fn methods() {
    let package = Harness::new().ok(indoc! {r#"
        package app

        type Counter struct {
            n int
        }

        func (c *Counter) Inc() {}
        func (c Counter) Value() int { return c.n }
    "#});

    let counter = package.lookup_type("Counter").unwrap();
    let methods: Vec<_> = counter
        .methods()
        .into_iter()
        .map(|m| format!("{}{} {}", m.name, m.signature.signature_suffix(), m.pointer_receiver))
        .collect();
    assert_eq!(methods, ["Inc() true", "Value() int false"]);
}

#[test]
fn invalid_receivers() {
    let res = Harness::new()
        .with("lib", "package lib\n\ntype T int\n")
        .messages(indoc! {r#"
            package app

            import "lib"

            type P *int
            type S struct {
                size int
            }

            func (x int) A() {}
            func (x lib.T) B() {}
            func (x P) C() {}
            func (x []S) D() {}
            func (s S) size() int { return 0 }
            func (s S) E() {}
            func (s *S) E() {}
        "#});

    insta::assert_snapshot!(res, @r"
    error: invalid receiver type: int (cannot define new methods on non-local type)
    error: invalid receiver type: lib.T (cannot define new methods on non-local type)
    error: invalid receiver type: P (pointer or interface type)
    error: invalid receiver type: []S
    error: field and method with the same name `S.size`
    error: method `S.E` already declared
    ");
}
