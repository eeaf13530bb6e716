//! Import keys: the identity under which a package is memoized.
//!
//! Two shapes:
//! - **Path**: a validated import path such as `sync` or `example.com/demo`
//! - **Inline**: a source unit with no on-disk home, keyed by its declared
//!   package name plus a token that is unique within the session
//!
//! Equality is plain value equality. Two inline units declaring the same
//! package name still get distinct keys because their tokens differ.

use std::fmt;

use serde::Serialize;

/// Memoization key of the package registry.
#[derive(Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportKey {
    Path { path: String },
    Inline { name: String, token: u64 },
}

/// Why an import path was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid import path `{path}`: {reason}")]
pub struct InvalidImportPath {
    pub path: String,
    pub reason: &'static str,
}

impl ImportKey {
    /// Validate `path` and build a path key.
    pub fn path(path: &str) -> Result<Self, InvalidImportPath> {
        validate_import_path(path)?;
        Ok(Self::Path {
            path: path.to_owned(),
        })
    }

    /// Synthetic key for an inline unit.
    pub fn inline(name: impl Into<String>, token: u64) -> Self {
        Self::Inline {
            name: name.into(),
            token,
        }
    }

    /// The import path, for path keys.
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Self::Path { path } => Some(path),
            Self::Inline { .. } => None,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }

    /// Qualifier used when printing named types owned by this package.
    ///
    /// Path keys print the full import path (`sync.Mutex`,
    /// `example.com/demo.Config`); inline keys print the declared name.
    pub fn qualifier(&self) -> &str {
        match self {
            Self::Path { path } => path,
            Self::Inline { name, .. } => name,
        }
    }
}

impl fmt::Display for ImportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path { path } => f.write_str(path),
            Self::Inline { name, token } => write!(f, "<inline {}#{}>", name, token),
        }
    }
}

fn validate_import_path(path: &str) -> Result<(), InvalidImportPath> {
    let reject = |reason| {
        Err(InvalidImportPath {
            path: path.to_owned(),
            reason,
        })
    };

    if path.is_empty() {
        return reject("path is empty");
    }
    if path.starts_with('/') || path.ends_with('/') {
        return reject("leading or trailing `/`");
    }

    for segment in path.split('/') {
        match segment {
            "" => return reject("empty path segment"),
            "." | ".." => return reject("relative path segment"),
            _ => {}
        }
        if !segment.chars().all(is_path_char) {
            return reject("unexpected character");
        }
    }

    Ok(())
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '~' | '+')
}
