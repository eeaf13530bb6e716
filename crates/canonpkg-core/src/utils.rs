//! Naming rules of the Go subset.

/// Whether a top-level name is visible to importers.
///
/// The first character decides: upper case exports, anything else
/// (lower case, `_`, digits never occur) keeps the name package-private.
///
/// # Examples
/// ```
/// use canonpkg_core::utils::is_exported;
/// assert!(is_exported("Mutex"));
/// assert!(!is_exported("mutex"));
/// assert!(!is_exported("_"));
/// ```
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Whether `name` is a syntactically valid identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_') && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// The blank identifier `_` declares nothing.
pub fn is_blank(name: &str) -> bool {
    name == "_"
}

/// Last segment of an import path; the default package name for it.
///
/// # Examples
/// ```
/// use canonpkg_core::utils::last_segment;
/// assert_eq!(last_segment("sync/atomic"), "atomic");
/// assert_eq!(last_segment("sync"), "sync");
/// ```
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
