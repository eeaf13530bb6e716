//! Typed packages: the immutable result of resolving one package.
//!
//! Each package owns an arena of type slots addressed by [`TypeId`].
//! References inside the package use ids; references into an imported
//! package go through an `Imported` slot holding a [`TypeHandle`], which keeps
//! the imported package alive. Since imports form a DAG, so do the `Arc`s.

mod handle;
mod identity;

#[cfg(test)]
mod handle_tests;
#[cfg(test)]
pub(crate) mod test_utils;

use std::fmt;
use std::sync::Arc;

use canonpkg_core::utils::is_exported;
use canonpkg_core::{BasicKind, ImportKey};
use indexmap::IndexMap;
use serde::Serialize;

pub use handle::{Field, Method, TypeHandle, TypeKind};
pub use identity::identical;

/// Slot index in a package's type arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub(crate) enum TypeData {
    Basic(BasicKind),
    Named {
        name: String,
        underlying: TypeId,
        methods: IndexMap<String, MethodData>,
    },
    Pointer(TypeId),
    Slice(TypeId),
    Map(TypeId, TypeId),
    Struct(Vec<FieldData>),
    Signature {
        params: Vec<TypeId>,
        results: Vec<TypeId>,
        variadic: bool,
    },
    /// A type owned by another package.
    Imported(TypeHandle),
}

#[derive(Debug, Clone)]
pub(crate) struct FieldData {
    pub name: String,
    pub ty: TypeId,
    pub embedded: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct MethodData {
    pub signature: TypeId,
    pub pointer_receiver: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    Type,
    Var,
    Const,
    Func,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Type => "type",
            Self::Var => "var",
            Self::Const => "const",
            Self::Func => "func",
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct DeclData {
    pub kind: DeclKind,
    pub ty: TypeId,
    /// Untyped constant; `ty` holds its default type.
    pub untyped: bool,
}

pub(crate) struct PackageData {
    pub key: ImportKey,
    pub name: String,
    pub files: Vec<String>,
    pub imports: Vec<TypedPackage>,
    pub types: Vec<TypeData>,
    pub decls: IndexMap<String, DeclData>,
}

/// A package-level declaration, as seen from outside the package.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    pub ty: TypeHandle,
    pub exported: bool,
    pub untyped: bool,
}

/// Shared handle to an immutable typed package.
///
/// Cloning is cheap. Two handles denote the same package instance iff
/// [`TypedPackage::ptr_eq`] holds; that is the identity named types rely on.
#[derive(Clone)]
pub struct TypedPackage(Arc<PackageData>);

impl TypedPackage {
    pub(crate) fn new(data: PackageData) -> Self {
        Self(Arc::new(data))
    }

    /// Whether `a` and `b` are the same package instance.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub fn key(&self) -> &ImportKey {
        &self.0.key
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn files(&self) -> &[String] {
        &self.0.files
    }

    /// Directly imported packages, in first-import order.
    pub fn imports(&self) -> &[TypedPackage] {
        &self.0.imports
    }

    /// The type declared as `name`.
    pub fn lookup_type(&self, name: &str) -> Option<TypeHandle> {
        let decl = self.0.decls.get(name)?;
        (decl.kind == DeclKind::Type).then(|| self.handle(decl.ty))
    }

    /// The type of the variable, constant or function declared as `name`.
    pub fn type_of(&self, name: &str) -> Option<TypeHandle> {
        let decl = self.0.decls.get(name)?;
        (decl.kind != DeclKind::Type).then(|| self.handle(decl.ty))
    }

    pub fn decl(&self, name: &str) -> Option<Declaration> {
        let (name, data) = self.0.decls.get_key_value(name)?;
        Some(self.declaration(name, data))
    }

    /// All package-level declarations in source order.
    pub fn decls(&self) -> impl Iterator<Item = Declaration> + '_ {
        self.0
            .decls
            .iter()
            .map(|(name, data)| self.declaration(name, data))
    }

    pub fn exports(&self) -> impl Iterator<Item = Declaration> + '_ {
        self.decls().filter(|d| d.exported)
    }

    pub fn len(&self) -> usize {
        self.0.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.decls.is_empty()
    }

    /// Serializable overview of the package.
    pub fn summary(&self) -> PackageSummary {
        PackageSummary {
            key: self.key().clone(),
            name: self.name().to_string(),
            files: self.files().to_vec(),
            imports: self.imports().iter().map(|p| p.key().clone()).collect(),
            decls: self.decls().map(|d| DeclSummary::new(&d)).collect(),
        }
    }

    /// Address of the shared data. Stable while any clone is alive.
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub(crate) fn handle(&self, id: TypeId) -> TypeHandle {
        TypeHandle::new(self.clone(), id)
    }

    pub(crate) fn data(&self, id: TypeId) -> &TypeData {
        &self.0.types[id.index()]
    }

    fn declaration(&self, name: &str, data: &DeclData) -> Declaration {
        Declaration {
            name: name.to_string(),
            kind: data.kind,
            ty: self.handle(data.ty),
            exported: is_exported(name),
            untyped: data.untyped,
        }
    }
}

impl fmt::Debug for TypedPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedPackage")
            .field("key", &self.0.key)
            .field("name", &self.0.name)
            .field("decls", &self.0.decls.len())
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageSummary {
    pub key: ImportKey,
    pub name: String,
    pub files: Vec<String>,
    pub imports: Vec<ImportKey>,
    pub decls: Vec<DeclSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeclSummary {
    pub name: String,
    pub kind: DeclKind,
    pub exported: bool,
    /// For type declarations, the underlying type.
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
}

impl DeclSummary {
    fn new(decl: &Declaration) -> Self {
        let (ty, methods) = match decl.kind {
            DeclKind::Type => (
                decl.ty.underlying().to_string(),
                decl.ty
                    .methods()
                    .iter()
                    .map(|m| format!("{}{}", m.name, m.signature.signature_suffix()))
                    .collect(),
            ),
            _ => (decl.ty.to_string(), Vec::new()),
        };
        Self {
            name: decl.name.clone(),
            kind: decl.kind,
            exported: decl.exported,
            ty,
            methods,
        }
    }
}
