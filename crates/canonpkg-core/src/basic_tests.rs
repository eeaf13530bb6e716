use crate::BasicKind;

#[test]
fn aliases_resolve_to_canonical_kind() {
    assert_eq!(BasicKind::from_name("byte"), Some(BasicKind::Uint8));
    assert_eq!(BasicKind::from_name("rune"), Some(BasicKind::Int32));
    assert_eq!(BasicKind::Uint8.name(), "uint8");
}

#[test]
fn unknown_names() {
    assert_eq!(BasicKind::from_name("Mutex"), None);
    assert_eq!(BasicKind::from_name("complex128"), None);
    assert_eq!(BasicKind::from_name(""), None);
}

#[test]
fn name_round_trips() {
    let all = [
        BasicKind::Bool,
        BasicKind::Int,
        BasicKind::Int64,
        BasicKind::Uint32,
        BasicKind::Uintptr,
        BasicKind::Float64,
        BasicKind::String,
    ];
    for kind in all {
        assert_eq!(BasicKind::from_name(kind.name()), Some(kind));
    }
}

#[test]
fn numeric_classes() {
    assert!(BasicKind::Int32.is_integer());
    assert!(BasicKind::Uintptr.is_integer());
    assert!(!BasicKind::Float32.is_integer());
    assert!(BasicKind::Float32.is_numeric());
    assert!(!BasicKind::String.is_numeric());
    assert!(!BasicKind::Bool.is_numeric());
}

#[test]
fn display() {
    insta::assert_snapshot!(BasicKind::Float64.to_string(), @"float64");
}
