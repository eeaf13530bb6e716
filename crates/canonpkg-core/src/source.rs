//! Source units handed to the frontend.

use crate::ImportKey;

/// A named chunk of source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Something the frontend can turn into a typed package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceUnit {
    /// In-memory text registered under a synthetic key.
    Inline { key: ImportKey, file: SourceFile },
    /// A package located through package discovery.
    Import(ImportKey),
}

impl SourceUnit {
    pub fn key(&self) -> &ImportKey {
        match self {
            Self::Inline { key, .. } => key,
            Self::Import(key) => key,
        }
    }
}
