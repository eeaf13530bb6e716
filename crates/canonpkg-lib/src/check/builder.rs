//! Type arena under construction.
//!
//! Imported named types (and imported structs with unexported fields) are
//! kept as links into their owner; every other imported type is rebuilt
//! locally. Comparing two local slots therefore never has to look across
//! arenas, except link against link.

use std::fmt::Write as _;

use canonpkg_core::BasicKind;
use canonpkg_core::utils::is_exported;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::types::{
    FieldData, MethodData, TypeData, TypeHandle, TypeId, TypeKind, identical as identical_handles,
};

/// Underlying type of a named type whose declaration is still being resolved.
pub(super) const PENDING: TypeId = TypeId(u32::MAX);

/// Shape of a type after taking its underlying type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Shape {
    Basic(BasicKind),
    Pointer,
    Slice,
    Map,
    Struct,
    Signature,
    /// Underlying type not known yet, or the result of an earlier error.
    Unknown,
}

#[derive(Default)]
pub(super) struct TypeBuilder {
    types: Vec<TypeData>,
    basics: FxHashMap<BasicKind, TypeId>,
    links: FxHashMap<(usize, TypeId), TypeId>,
}

impl TypeBuilder {
    pub fn push(&mut self, data: TypeData) -> TypeId {
        self.types.push(data);
        TypeId(self.types.len() as u32 - 1)
    }

    pub fn basic(&mut self, kind: BasicKind) -> TypeId {
        if let Some(&id) = self.basics.get(&kind) {
            return id;
        }
        let id = self.push(TypeData::Basic(kind));
        self.basics.insert(kind, id);
        id
    }

    /// Fresh named type with its underlying type still pending.
    pub fn declare_named(&mut self, name: &str) -> TypeId {
        self.push(TypeData::Named {
            name: name.to_string(),
            underlying: PENDING,
            methods: IndexMap::new(),
        })
    }

    pub fn set_underlying(&mut self, named: TypeId, to: TypeId) {
        if let TypeData::Named { underlying, .. } = &mut self.types[named.index()] {
            *underlying = to;
        }
    }

    pub fn add_method(&mut self, named: TypeId, name: &str, method: MethodData) -> bool {
        match &mut self.types[named.index()] {
            TypeData::Named { methods, .. } => methods.insert(name.to_string(), method).is_none(),
            _ => false,
        }
    }

    pub fn has_method(&self, named: TypeId, name: &str) -> bool {
        matches!(&self.types[named.index()], TypeData::Named { methods, .. } if methods.contains_key(name))
    }

    /// Bring a type of another package into this arena.
    pub fn import(&mut self, handle: &TypeHandle) -> TypeId {
        let handle = handle.canonical();
        match handle.kind() {
            TypeKind::Basic => match handle.basic() {
                Some(kind) => self.basic(kind),
                None => self.link(handle),
            },
            TypeKind::Pointer | TypeKind::Slice => match handle.elem() {
                Some(elem) => {
                    let elem = self.import(&elem);
                    self.push(if handle.kind() == TypeKind::Pointer {
                        TypeData::Pointer(elem)
                    } else {
                        TypeData::Slice(elem)
                    })
                }
                None => self.link(handle),
            },
            TypeKind::Map => match (handle.key(), handle.elem()) {
                (Some(key), Some(value)) => {
                    let key = self.import(&key);
                    let value = self.import(&value);
                    self.push(TypeData::Map(key, value))
                }
                _ => self.link(handle),
            },
            TypeKind::Struct => {
                let fields = handle.fields();
                if fields.iter().any(|f| !is_exported(&f.name)) {
                    return self.link(handle);
                }
                let fields = fields
                    .iter()
                    .map(|f| FieldData {
                        name: f.name.clone(),
                        ty: self.import(&f.ty),
                        embedded: f.embedded,
                    })
                    .collect();
                self.push(TypeData::Struct(fields))
            }
            TypeKind::Signature => {
                let params = handle.params().iter().map(|p| self.import(p)).collect();
                let results = handle.results().iter().map(|r| self.import(r)).collect();
                self.push(TypeData::Signature {
                    params,
                    results,
                    variadic: handle.is_variadic(),
                })
            }
            TypeKind::Named => self.link(handle),
        }
    }

    fn link(&mut self, handle: TypeHandle) -> TypeId {
        let key = (handle.package().addr(), handle.id());
        if let Some(&id) = self.links.get(&key) {
            return id;
        }
        let id = self.push(TypeData::Imported(handle));
        self.links.insert(key, id);
        id
    }

    pub fn data(&self, id: TypeId) -> &TypeData {
        &self.types[id.index()]
    }

    /// Named or predeclared: types with a name of their own.
    pub fn is_defined(&self, id: TypeId) -> bool {
        match self.data(id) {
            TypeData::Named { .. } | TypeData::Basic(_) => true,
            TypeData::Imported(handle) => handle.kind() == TypeKind::Named,
            _ => false,
        }
    }

    /// Underlying type, or `None` while a declaration is pending.
    pub fn underlying(&mut self, id: TypeId) -> Option<TypeId> {
        match self.data(id) {
            TypeData::Named { underlying, .. } => (*underlying != PENDING).then_some(*underlying),
            TypeData::Imported(handle) if handle.kind() == TypeKind::Named => {
                let underlying = handle.underlying();
                Some(self.import(&underlying))
            }
            _ => Some(id),
        }
    }

    pub fn shape(&mut self, id: TypeId) -> Shape {
        let Some(id) = self.underlying(id) else {
            return Shape::Unknown;
        };
        match self.data(id) {
            TypeData::Basic(kind) => Shape::Basic(*kind),
            TypeData::Pointer(_) => Shape::Pointer,
            TypeData::Slice(_) => Shape::Slice,
            TypeData::Map(..) => Shape::Map,
            TypeData::Struct(_) => Shape::Struct,
            TypeData::Signature { .. } => Shape::Signature,
            TypeData::Imported(handle) => match handle.kind() {
                TypeKind::Struct => Shape::Struct,
                _ => Shape::Unknown,
            },
            TypeData::Named { .. } => Shape::Unknown,
        }
    }

    pub fn elem(&self, id: TypeId) -> Option<TypeId> {
        match self.data(id) {
            TypeData::Pointer(elem) | TypeData::Slice(elem) | TypeData::Map(_, elem) => Some(*elem),
            _ => None,
        }
    }

    /// Parameters, results and variadic flag of a signature.
    pub fn signature(&mut self, id: TypeId) -> Option<(Vec<TypeId>, Vec<TypeId>, bool)> {
        let id = self.underlying(id)?;
        match self.data(id) {
            TypeData::Signature {
                params,
                results,
                variadic,
            } => Some((params.clone(), results.clone(), *variadic)),
            _ => None,
        }
    }

    pub fn struct_fields(&mut self, id: TypeId) -> Vec<String> {
        let Some(id) = self.underlying(id) else {
            return Vec::new();
        };
        match self.data(id) {
            TypeData::Struct(fields) => fields.iter().map(|f| f.name.clone()).collect(),
            TypeData::Imported(handle) => handle.fields().into_iter().map(|f| f.name).collect(),
            _ => Vec::new(),
        }
    }

    pub fn identical(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        match (self.data(a), self.data(b)) {
            (TypeData::Imported(x), TypeData::Imported(y)) => identical_handles(x, y),
            (TypeData::Basic(x), TypeData::Basic(y)) => x == y,
            (TypeData::Pointer(x), TypeData::Pointer(y))
            | (TypeData::Slice(x), TypeData::Slice(y)) => self.identical(*x, *y),
            (TypeData::Map(k1, v1), TypeData::Map(k2, v2)) => {
                self.identical(*k1, *k2) && self.identical(*v1, *v2)
            }
            (TypeData::Struct(x), TypeData::Struct(y)) => {
                x.len() == y.len()
                    && x.iter().zip(y).all(|(f, g)| {
                        f.name == g.name && f.embedded == g.embedded && self.identical(f.ty, g.ty)
                    })
            }
            (
                TypeData::Signature {
                    params: p1,
                    results: r1,
                    variadic: v1,
                },
                TypeData::Signature {
                    params: p2,
                    results: r2,
                    variadic: v2,
                },
            ) => v1 == v2 && self.all_identical(p1, p2) && self.all_identical(r1, r2),
            _ => false,
        }
    }

    fn all_identical(&self, a: &[TypeId], b: &[TypeId]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| self.identical(*x, *y))
    }

    /// Whether values of the type can be map keys.
    pub fn comparable(&mut self, id: TypeId) -> bool {
        let Some(id) = self.underlying(id) else {
            return true;
        };
        match self.data(id).clone() {
            TypeData::Slice(_) | TypeData::Map(..) | TypeData::Signature { .. } => false,
            TypeData::Struct(fields) => fields.iter().all(|f| self.comparable(f.ty)),
            TypeData::Imported(handle) => comparable_handle(&handle),
            _ => true,
        }
    }

    /// Go notation, with local named types unqualified.
    pub fn describe(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write(&mut out, id);
        out
    }

    fn write(&self, out: &mut String, id: TypeId) {
        match self.data(id) {
            TypeData::Basic(kind) => out.push_str(kind.name()),
            TypeData::Named { name, .. } => out.push_str(name),
            TypeData::Imported(handle) => {
                let _ = write!(out, "{}", handle);
            }
            TypeData::Pointer(elem) => {
                out.push('*');
                self.write(out, *elem);
            }
            TypeData::Slice(elem) => {
                out.push_str("[]");
                self.write(out, *elem);
            }
            TypeData::Map(key, value) => {
                out.push_str("map[");
                self.write(out, *key);
                out.push(']');
                self.write(out, *value);
            }
            TypeData::Struct(fields) => {
                out.push_str("struct{");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    if !field.embedded {
                        out.push_str(&field.name);
                        out.push(' ');
                    }
                    self.write(out, field.ty);
                }
                out.push('}');
            }
            TypeData::Signature {
                params,
                results,
                variadic,
            } => {
                out.push_str("func(");
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    match self.data(*param) {
                        TypeData::Slice(elem) if *variadic && i + 1 == params.len() => {
                            out.push_str("...");
                            self.write(out, *elem);
                        }
                        _ => self.write(out, *param),
                    }
                }
                out.push(')');
                match results.as_slice() {
                    [] => {}
                    [single] => {
                        out.push(' ');
                        self.write(out, *single);
                    }
                    _ => {
                        out.push_str(" (");
                        for (i, result) in results.iter().enumerate() {
                            if i > 0 {
                                out.push_str(", ");
                            }
                            self.write(out, *result);
                        }
                        out.push(')');
                    }
                }
            }
        }
    }

    /// Named types still waiting for their underlying type.
    pub fn has_pending(&self) -> bool {
        self.types
            .iter()
            .any(|t| matches!(t, TypeData::Named { underlying, .. } if *underlying == PENDING))
    }

    pub fn finish(self) -> Vec<TypeData> {
        self.types
    }
}

fn comparable_handle(handle: &TypeHandle) -> bool {
    let underlying = handle.underlying();
    match underlying.kind() {
        TypeKind::Slice | TypeKind::Map | TypeKind::Signature => false,
        TypeKind::Struct => underlying.fields().iter().all(|f| comparable_handle(&f.ty)),
        _ => true,
    }
}
