use crate::utils::{is_blank, is_exported, is_identifier, last_segment};

#[test]
fn exported_names() {
    assert!(is_exported("Mutex"));
    assert!(is_exported("Ä"));
    assert!(!is_exported("mutex"));
    assert!(!is_exported("_Mutex"));
    assert!(!is_exported(""));
}

#[test]
fn identifiers() {
    assert!(is_identifier("x"));
    assert!(is_identifier("_tmp1"));
    assert!(is_identifier("héllo"));
    assert!(!is_identifier(""));
    assert!(!is_identifier("1x"));
    assert!(!is_identifier("a-b"));
}

#[test]
fn blank() {
    assert!(is_blank("_"));
    assert!(!is_blank("__"));
}

#[test]
fn last_segments() {
    assert_eq!(last_segment("example.com/demo"), "demo");
    assert_eq!(last_segment("a/b/c"), "c");
    assert_eq!(last_segment("sync"), "sync");
}
