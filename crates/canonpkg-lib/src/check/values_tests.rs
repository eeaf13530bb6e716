use indoc::indoc;

use super::test_utils::{Harness, type_of};
use crate::types::DeclKind;

const LIB: &str = indoc! {r#"
    package lib

    type T struct {
        X int
    }

    const C = 10

    var V T

    func New() *T { return nil }
"#};

#[test]
fn inferred_variable_types() {
    let package = Harness::new().ok(indoc! {r#"
        package app

        type T struct {
            x int
        }

        func Make() *T { return nil }
        func Two() (int, string) { return 0, "" }

        var (
            a    = 1
            b    = "s"
            c    = 2.5
            d    = true
            r    = 'x'
            e    = []int{}
            f    = &T{}
            g    = map[string]int{}
            h    = T{x: 1}
            i    = new(T)
            j    = make([]int, 3)
            k    = len("abc")
            l    = int64(7)
            m    = []byte("hi")
            n    = Make()
            p, q = Two()
            fn   = Two
        )
    "#});

    let types: Vec<_> = ["a", "b", "c", "d", "r", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "p", "q", "fn"]
        .iter()
        .map(|name| format!("{} {}", name, type_of(&package, name)))
        .collect();
    insta::assert_snapshot!(types.join("\n"), @r"
    a int
    b string
    c float64
    d bool
    r int32
    e []int
    f *example.com/app.T
    g map[string]int
    h example.com/app.T
    i *example.com/app.T
    j []int
    k int
    l int64
    m []uint8
    n *example.com/app.T
    p int
    q string
    fn func() (int, string)
    ");
}

#[test]
fn constants_and_iota() {
    let package = Harness::new().ok(indoc! {r#"
        package app

        const (
            A = iota
            B
            C
        )

        const (
            Low, High = iota, iota
            Mid, Top
        )

        const Name = "canon"
        const Small int8 = 100
        const Ratio = 0.5
    "#});

    let a = package.decl("A").unwrap();
    assert_eq!(a.kind, DeclKind::Const);
    assert!(a.untyped);
    assert_eq!(a.ty.to_string(), "int");
    assert_eq!(type_of(&package, "Top"), "int");
    assert_eq!(type_of(&package, "Name"), "string");
    assert_eq!(type_of(&package, "Ratio"), "float64");

    let small = package.decl("Small").unwrap();
    assert!(!small.untyped);
    assert_eq!(small.ty.to_string(), "int8");
}

#[test]
fn signed_constants() {
    let package = Harness::new().ok(indoc! {r#"
        package app

        const Min int8 = -128
        const Neg = -1
        const Pos = +2.5
        const Back = -Neg

        var x =-1
        var y = -Min
        var z = -(Pos)
    "#});

    assert_eq!(type_of(&package, "Min"), "int8");
    assert_eq!(type_of(&package, "Neg"), "int");
    assert_eq!(type_of(&package, "Pos"), "float64");
    assert_eq!(type_of(&package, "Back"), "int");
    assert_eq!(type_of(&package, "x"), "int");
    assert_eq!(type_of(&package, "y"), "int8");
    assert_eq!(type_of(&package, "z"), "float64");
}

#[test]
fn signed_constant_errors() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        const Under int8 = -129
        var u uint8 = -1
        var s = -"text"
        var b = +true
    "#});

    insta::assert_snapshot!(res, @r#"
    error: cannot use -129 (untyped int constant) as int8 value in constant declaration (overflows)
    error: cannot use -1 (untyped int constant) as uint8 value in variable declaration (overflows)
    error: invalid operation: operator - not defined on "text"
    error: invalid operation: operator + not defined on true
    "#);
}

#[test]
fn constant_errors() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        type P *int

        var v = 1

        const Big int8 = 300
        const Frac int = 1.5
        const NotConst = v
        const Ptr P = 1
        const Mismatch, Extra = 1
        var outside = iota
    "#});

    insta::assert_snapshot!(res, @r"
    error: cannot use 300 (untyped int constant) as int8 value in constant declaration (overflows)
    error: cannot use 1.5 (untyped float constant) as int value in constant declaration (truncated)
    error: invalid operation: v is not constant
    error: invalid operation: invalid constant type P
    error: assignment mismatch: 2 constants but 1 value
    error: invalid operation: cannot use iota outside constant declaration
    ");
}

#[test]
fn assignability() {
    let package = Harness::new().with("lib", LIB).ok(indoc! {r#"
        package app

        import "lib"

        type Ints []int

        var (
            ints  Ints          = []int{}
            plain []int         = ints
            ptr   *int          = nil
            t     lib.T         = lib.V
            s     struct{ X int } = lib.V
            made  *lib.T        = lib.New()
            small int8          = lib.C
        )
    "#});

    assert_eq!(type_of(&package, "t"), "lib.T");
    assert_eq!(type_of(&package, "s"), "struct{X int}");
}

#[test]
fn assignment_errors() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        type Celsius float64

        const Big = 300

        var (
            x int
            f float64

            a int8    = 1000
            b int     = "s"
            c string  = x
            d Celsius = f
            e int     = nil
            g         = nil
            h int8    = Big
        )
    "#});

    insta::assert_snapshot!(res, @r#"
    error: cannot use 1000 (untyped int constant) as int8 value in variable declaration (overflows)
    error: cannot use "s" (untyped string constant) as int value in variable declaration
    error: cannot use x (value of type int) as string value in variable declaration
    error: cannot use f (value of type float64) as Celsius value in variable declaration
    error: cannot use nil as int value in variable declaration
    error: use of untyped nil in variable declaration
    error: cannot use Big (untyped int constant) as int8 value in variable declaration (overflows)
    "#);
}

#[test]
fn value_count_mismatch() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        func One() int { return 1 }
        func Two() (int, string) { return 0, "" }

        var a, b = 1
        var c = 1, 2
        var d, e = One()
        var f, g, h = Two()
    "#});

    insta::assert_snapshot!(res, @r"
    error: assignment mismatch: 2 variables but 1 value
    error: assignment mismatch: 1 variable but 2 values
    error: assignment mismatch: 2 variables but 1 value
    error: assignment mismatch: 3 variables but Two() returns 2 values
    ");
}

#[test]
fn calls() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        func Pair() (int, int)
        func Unit() {}
        func Sum(xs ...int) int
        func Div(a, b int) int

        var n int

        var (
            x1 = Div(1)
            x2 = Div(1, 2, 3)
            x3 = Div(1, "two")
            x4 = Div(Pair())
            x5 = Sum()
            x6 = Sum(1, 2, 3)
            x7 = Unit()
            x8 = Pair()
            x9 = n(2)
        )
    "#});

    insta::assert_snapshot!(res, @r#"
    error: invalid call: not enough arguments in call to Div
    error: invalid call: too many arguments in call to Div
    error: cannot use "two" (untyped string constant) as int value in argument to Div
    error: invalid call: Unit() (no value) used as value
    error: invalid call: multiple-value Pair() (value of type (int, int)) in single-value context
    error: invalid call: cannot call non-function n
    "#);
}

#[test]
fn conversions() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        type Celsius float64

        var f float64

        var (
            a = Celsius(f)
            b = string(65)
            c = int("x")
            d = []byte(f)
            e = Celsius(1, 2)
            g = []rune("ok")
        )
    "#});

    insta::assert_snapshot!(res, @r#"
    error: invalid operation: cannot convert "x" (untyped string constant) to type int
    error: invalid operation: cannot convert f (value of type float64) to type []uint8
    error: invalid call: too many arguments in conversion to Celsius
    "#);
}

#[test]
fn builtins() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        var (
            a = make(int)
            b = make([]int)
            c = make(map[string]int)
            d = new(1)
            e = len(1)
            f = new
        )
    "#});

    insta::assert_snapshot!(res, @r"
    error: invalid call: cannot make int; type must be slice or map
    error: invalid call: make expects 2 or 3 arguments; found 1
    error: `1` is not a type
    error: invalid operation: invalid argument 1 for built-in len
    error: invalid operation: new (built-in function) must be called
    ");
}

#[test]
fn names_that_are_not_values() {
    let res = Harness::new().with("lib", LIB).messages(indoc! {r#"
        package app

        import "lib"

        type T int

        var (
            a = int
            b = _
            c = missing
            d = lib
            e = lib.T
            f = T
            g = lib.C
        )
    "#});

    insta::assert_snapshot!(res, @r"
    error: `int` is not an expression
    error: invalid operation: cannot use _ as value
    error: undefined: missing
    error: `lib` is not an expression
    error: `lib.T` is not an expression
    error: `T` is not an expression
    ");
}

#[test]
fn initialization_cycles() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        var a = b
        var b = c
        var c = a

        var self = self
    "#});

    insta::assert_snapshot!(res, @r"
    error: initialization cycle: a -> b -> c -> a
    error: initialization cycle: `self` refers to itself
    ");
}

#[test]
fn address_of() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        type T struct{}

        func F() T { return T{} }

        var v T
        var (
            a = &v
            b = &T{}
            c = &F()
            d = &1
        )
    "#});

    insta::assert_snapshot!(res, @r"
    error: invalid operation: cannot take address of F()
    error: invalid operation: cannot take address of 1
    ");
}

#[test]
fn composite_literal_types() {
    let res = Harness::new().messages(indoc! {r#"
        package app

        type Num int

        var (
            a = Num{}
            b = struct{ x int }{}
        )
    "#});

    insta::assert_snapshot!(res, @"error: invalid operation: invalid composite literal type Num");
}
