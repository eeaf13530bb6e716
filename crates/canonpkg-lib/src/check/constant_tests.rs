use canonpkg_core::BasicKind;

use super::constant::{ConstValue, Constant, Unrepresentable, UntypedKind, unquote};
use crate::parser::cst::SyntaxKind;

fn string(text: &str) -> Option<Vec<u8>> {
    match Constant::from_literal(SyntaxKind::StringLit, text)?.value {
        ConstValue::String(bytes) => Some(bytes),
        other => panic!("string literal gave {:?}", other),
    }
}

fn rune(text: &str) -> Option<i128> {
    match Constant::from_literal(SyntaxKind::CharLit, text)?.value {
        ConstValue::Int(v) => Some(v),
        other => panic!("rune literal gave {:?}", other),
    }
}

#[test]
fn octal_escapes_take_three_digits() {
    assert_eq!(string(r#""\012""#), Some(vec![b'\n']));
    assert_eq!(string(r#""\0001""#), Some(vec![0, b'1']));
    assert_eq!(string(r#""\377""#), Some(vec![0xff]));
    assert_eq!(string(r#""\400""#), None);
    assert_eq!(string(r#""\0""#), None);
    assert_eq!(string(r#""\08""#), None);
}

#[test]
fn hex_escapes_are_bytes() {
    assert_eq!(string(r#""\x80""#), Some(vec![0x80]));
    assert_eq!(string(r#""a\x41""#), Some(vec![b'a', b'A']));
    assert_eq!(string(r#""\x4""#), None);
    assert_eq!(string(r#""\xg0""#), None);
}

#[test]
fn unicode_escapes_are_utf8() {
    assert_eq!(string(r#""é""#), Some("é".as_bytes().to_vec()));
    assert_eq!(string(r#""\u00e9""#), Some("é".as_bytes().to_vec()));
    assert_eq!(string(r#""\U0001F600""#), Some("😀".as_bytes().to_vec()));
    assert_eq!(string(r#""\uD800""#), None);
    assert_eq!(string(r#""\U00110000""#), None);
    assert_eq!(string(r#""\q""#), None);
}

#[test]
fn raw_strings_keep_backslashes() {
    assert_eq!(string("`a\\n\r\n`"), Some(b"a\\n\n".to_vec()));
}

#[test]
fn rune_literals() {
    assert_eq!(rune("'a'"), Some(97));
    assert_eq!(rune("'é'"), Some(0xe9));
    assert_eq!(rune(r"'\n'"), Some(10));
    assert_eq!(rune(r"'\377'"), Some(255));
    assert_eq!(rune(r"'\xff'"), Some(255));
    assert_eq!(rune(r"'\U0001F600'"), Some(0x1f600));
    assert_eq!(rune("'ab'"), None);
    assert_eq!(rune("''"), None);
}

#[test]
fn import_paths_must_be_text() {
    assert_eq!(unquote(r#""sync/atomic""#).as_deref(), Some("sync/atomic"));
    assert_eq!(unquote(r#""\x41b""#).as_deref(), Some("Ab"));
    assert_eq!(unquote(r#""\xff""#), None);
}

#[test]
fn negation_and_bounds() {
    let one = Constant::from_literal(SyntaxKind::IntLit, "128").unwrap();
    let neg = one.clone().negate();
    assert_eq!(neg.kind, UntypedKind::Int);
    assert_eq!(neg.value, ConstValue::Int(-128));
    assert_eq!(neg.representable(BasicKind::Int8), Ok(()));
    assert_eq!(one.representable(BasicKind::Int8), Err(Unrepresentable::Overflows));

    let below = Constant::from_literal(SyntaxKind::IntLit, "129").unwrap().negate();
    assert_eq!(below.representable(BasicKind::Int8), Err(Unrepresentable::Overflows));

    let minus_one = Constant::from_literal(SyntaxKind::IntLit, "1").unwrap().negate();
    assert_eq!(minus_one.representable(BasicKind::Uint8), Err(Unrepresentable::Overflows));
    assert_eq!(minus_one.representable(BasicKind::Float32), Ok(()));

    let half = Constant::from_literal(SyntaxKind::FloatLit, "0.5").unwrap().negate();
    assert_eq!(half.value, ConstValue::Float(-0.5));
    assert_eq!(half.clone().negate().value, ConstValue::Float(0.5));
}
