use std::fmt;

use canonpkg_core::BasicKind;

use super::{TypeData, TypeId, TypedPackage};

/// A type: a slot in some package's arena.
///
/// Handles keep their package alive. Use [`super::identical`] to compare
/// them; `TypeHandle` deliberately has no `PartialEq`.
#[derive(Clone)]
pub struct TypeHandle {
    package: TypedPackage,
    id: TypeId,
}

/// Shape of a type after following import links.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Basic,
    Named,
    Pointer,
    Slice,
    Map,
    Struct,
    Signature,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: TypeHandle,
    pub embedded: bool,
}

#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub signature: TypeHandle,
    pub pointer_receiver: bool,
}

/// Follow `Imported` links to the owning package's slot.
pub(crate) fn resolve(package: &TypedPackage, id: TypeId) -> (&TypedPackage, TypeId) {
    let mut package = package;
    let mut id = id;
    while let TypeData::Imported(handle) = package.data(id) {
        package = &handle.package;
        id = handle.id;
    }
    (package, id)
}

impl TypeHandle {
    pub(crate) fn new(package: TypedPackage, id: TypeId) -> Self {
        Self { package, id }
    }

    /// The package whose arena holds this slot.
    ///
    /// For a handle obtained through an import link this is the importing
    /// package; call [`Self::canonical`] first to get the owner.
    pub fn package(&self) -> &TypedPackage {
        &self.package
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The same type, addressed in the package that owns it.
    pub fn canonical(&self) -> TypeHandle {
        let (package, id) = self.resolved();
        TypeHandle::new(package.clone(), id)
    }

    pub(crate) fn resolved(&self) -> (&TypedPackage, TypeId) {
        resolve(&self.package, self.id)
    }

    fn data(&self) -> &TypeData {
        let (package, id) = self.resolved();
        package.data(id)
    }

    fn sibling(&self, id: TypeId) -> TypeHandle {
        let (package, _) = self.resolved();
        TypeHandle::new(package.clone(), id)
    }

    pub fn kind(&self) -> TypeKind {
        match self.data() {
            TypeData::Basic(_) => TypeKind::Basic,
            TypeData::Named { .. } => TypeKind::Named,
            TypeData::Pointer(_) => TypeKind::Pointer,
            TypeData::Slice(_) => TypeKind::Slice,
            TypeData::Map(..) => TypeKind::Map,
            TypeData::Struct(_) => TypeKind::Struct,
            TypeData::Signature { .. } => TypeKind::Signature,
            TypeData::Imported(_) => unreachable!("resolved through import links"),
        }
    }

    pub fn basic(&self) -> Option<BasicKind> {
        match self.data() {
            TypeData::Basic(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Name of a named type.
    pub fn name(&self) -> Option<&str> {
        match self.data() {
            TypeData::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// For named types, the type they were declared with; otherwise the type itself.
    pub fn underlying(&self) -> TypeHandle {
        match self.data() {
            TypeData::Named { underlying, .. } => self.sibling(*underlying).canonical(),
            _ => self.canonical(),
        }
    }

    /// Element type of a pointer or slice, value type of a map.
    pub fn elem(&self) -> Option<TypeHandle> {
        match self.data() {
            TypeData::Pointer(elem) | TypeData::Slice(elem) | TypeData::Map(_, elem) => {
                Some(self.sibling(*elem))
            }
            _ => None,
        }
    }

    pub fn key(&self) -> Option<TypeHandle> {
        match self.data() {
            TypeData::Map(key, _) => Some(self.sibling(*key)),
            _ => None,
        }
    }

    /// Fields of a struct type. Empty for anything else, named structs included.
    pub fn fields(&self) -> Vec<Field> {
        match self.data() {
            TypeData::Struct(fields) => fields
                .iter()
                .map(|f| Field {
                    name: f.name.clone(),
                    ty: self.sibling(f.ty),
                    embedded: f.embedded,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn params(&self) -> Vec<TypeHandle> {
        match self.data() {
            TypeData::Signature { params, .. } => {
                params.iter().map(|id| self.sibling(*id)).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn results(&self) -> Vec<TypeHandle> {
        match self.data() {
            TypeData::Signature { results, .. } => {
                results.iter().map(|id| self.sibling(*id)).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self.data(), TypeData::Signature { variadic: true, .. })
    }

    /// Methods declared on a named type, in declaration order.
    pub fn methods(&self) -> Vec<Method> {
        match self.data() {
            TypeData::Named { methods, .. } => methods
                .iter()
                .map(|(name, m)| Method {
                    name: name.clone(),
                    signature: self.sibling(m.signature),
                    pointer_receiver: m.pointer_receiver,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn method(&self, name: &str) -> Option<Method> {
        self.methods().into_iter().find(|m| m.name == name)
    }

    /// `(params) results` of a signature, as written after a method name.
    pub fn signature_suffix(&self) -> String {
        let (package, id) = self.resolved();
        let mut out = String::new();
        if let TypeData::Signature {
            params,
            results,
            variadic,
        } = package.data(id)
        {
            let _ = write_signature(&mut out, package, params, results, *variadic);
        }
        out
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(f, &self.package, self.id)
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHandle({})", self)
    }
}

/// Go notation. Named types print with their package qualifier.
fn write_type(w: &mut impl fmt::Write, package: &TypedPackage, id: TypeId) -> fmt::Result {
    let (package, id) = resolve(package, id);
    match package.data(id) {
        TypeData::Basic(kind) => w.write_str(kind.name()),
        TypeData::Named { name, .. } => write!(w, "{}.{}", package.key().qualifier(), name),
        TypeData::Pointer(elem) => {
            w.write_char('*')?;
            write_type(w, package, *elem)
        }
        TypeData::Slice(elem) => {
            w.write_str("[]")?;
            write_type(w, package, *elem)
        }
        TypeData::Map(key, value) => {
            w.write_str("map[")?;
            write_type(w, package, *key)?;
            w.write_char(']')?;
            write_type(w, package, *value)
        }
        TypeData::Struct(fields) => {
            w.write_str("struct{")?;
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    w.write_str("; ")?;
                }
                if !field.embedded {
                    write!(w, "{} ", field.name)?;
                }
                write_type(w, package, field.ty)?;
            }
            w.write_char('}')
        }
        TypeData::Signature {
            params,
            results,
            variadic,
        } => {
            w.write_str("func")?;
            write_signature(w, package, params, results, *variadic)
        }
        TypeData::Imported(_) => unreachable!("resolved through import links"),
    }
}

fn write_signature(
    w: &mut impl fmt::Write,
    package: &TypedPackage,
    params: &[TypeId],
    results: &[TypeId],
    variadic: bool,
) -> fmt::Result {
    w.write_char('(')?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            w.write_str(", ")?;
        }
        let last = i + 1 == params.len();
        match (variadic && last, package.data(*param)) {
            (true, TypeData::Slice(elem)) => {
                w.write_str("...")?;
                write_type(w, package, *elem)?;
            }
            _ => write_type(w, package, *param)?,
        }
    }
    w.write_char(')')?;

    match results {
        [] => Ok(()),
        [single] => {
            w.write_char(' ')?;
            write_type(w, package, *single)
        }
        _ => {
            w.write_str(" (")?;
            for (i, result) in results.iter().enumerate() {
                if i > 0 {
                    w.write_str(", ")?;
                }
                write_type(w, package, *result)?;
            }
            w.write_char(')')
        }
    }
}
