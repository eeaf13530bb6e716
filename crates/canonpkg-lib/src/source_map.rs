//! Source storage for one package resolution.
//!
//! Every file that takes part in resolving a package is registered here so
//! diagnostics can point back into it after the resolution is over.

use canonpkg_core::SourceFile;

/// Lightweight handle to a file in a [`SourceMap`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct SourceId(pub(crate) u32);

/// A borrowed view of a registered file.
#[derive(Clone, Copy, Debug)]
pub struct Source<'s> {
    pub id: SourceId,
    pub name: &'s str,
    pub content: &'s str,
}

/// Registry of all files of a resolution.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    entries: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map with a single file.
    pub fn one_file(name: &str, content: &str) -> Self {
        let mut map = Self::new();
        map.add_file(name, content);
        map
    }

    pub fn add_file(&mut self, name: &str, content: &str) -> SourceId {
        self.push(SourceFile::new(name, content))
    }

    pub fn push(&mut self, file: SourceFile) -> SourceId {
        let id = SourceId(self.entries.len() as u32);
        self.entries.push(file);
        id
    }

    pub fn content(&self, id: SourceId) -> &str {
        self.entries
            .get(id.0 as usize)
            .map(|e| e.text.as_str())
            .expect("invalid SourceId")
    }

    pub fn name(&self, id: SourceId) -> &str {
        self.entries
            .get(id.0 as usize)
            .map(|e| e.name.as_str())
            .expect("invalid SourceId")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: SourceId) -> Source<'_> {
        let entry = self.entries.get(id.0 as usize).expect("invalid SourceId");
        Source {
            id,
            name: &entry.name,
            content: &entry.text,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Source<'_>> {
        self.entries.iter().enumerate().map(|(idx, entry)| Source {
            id: SourceId(idx as u32),
            name: &entry.name,
            content: &entry.text,
        })
    }
}
