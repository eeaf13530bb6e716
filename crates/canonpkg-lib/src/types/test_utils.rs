//! Hand-built packages for tests that don't go through the frontend.

use canonpkg_core::{BasicKind, ImportKey};
use indexmap::IndexMap;

use super::{
    DeclData, DeclKind, FieldData, MethodData, PackageData, TypeData, TypeHandle, TypeId,
    TypedPackage,
};

pub(crate) struct Fixture {
    key: ImportKey,
    name: String,
    types: Vec<TypeData>,
    decls: IndexMap<String, DeclData>,
    imports: Vec<TypedPackage>,
}

impl Fixture {
    pub fn new(path: &str) -> Self {
        let key = ImportKey::path(path).expect("valid fixture path");
        let name = canonpkg_core::utils::last_segment(path).to_string();
        Self {
            key,
            name,
            types: Vec::new(),
            decls: IndexMap::new(),
            imports: Vec::new(),
        }
    }

    pub fn push(&mut self, data: TypeData) -> TypeId {
        self.types.push(data);
        TypeId(self.types.len() as u32 - 1)
    }

    pub fn basic(&mut self, kind: BasicKind) -> TypeId {
        self.push(TypeData::Basic(kind))
    }

    /// Declare `type name <underlying>`.
    pub fn named(&mut self, name: &str, underlying: TypeId) -> TypeId {
        let id = self.push(TypeData::Named {
            name: name.to_string(),
            underlying,
            methods: IndexMap::new(),
        });
        self.declare(name, DeclKind::Type, id);
        id
    }

    pub fn method(&mut self, on: TypeId, name: &str, signature: TypeId) {
        let TypeData::Named { methods, .. } = &mut self.types[on.index()] else {
            panic!("methods attach to named types");
        };
        methods.insert(
            name.to_string(),
            MethodData {
                signature,
                pointer_receiver: true,
            },
        );
    }

    pub fn var(&mut self, name: &str, ty: TypeId) {
        self.declare(name, DeclKind::Var, ty);
    }

    pub fn field(name: &str, ty: TypeId) -> FieldData {
        FieldData {
            name: name.to_string(),
            ty,
            embedded: false,
        }
    }

    /// Link to a type of another package.
    pub fn import(&mut self, handle: &TypeHandle) -> TypeId {
        let owner = handle.canonical().package().clone();
        if !self.imports.iter().any(|p| TypedPackage::ptr_eq(p, &owner)) {
            self.imports.push(owner);
        }
        self.push(TypeData::Imported(handle.canonical()))
    }

    fn declare(&mut self, name: &str, kind: DeclKind, ty: TypeId) {
        self.decls.insert(
            name.to_string(),
            DeclData {
                kind,
                ty,
                untyped: false,
            },
        );
    }

    pub fn build(self) -> TypedPackage {
        let files = vec![format!("{}.go", self.name)];
        TypedPackage::new(PackageData {
            key: self.key,
            name: self.name,
            files,
            imports: self.imports,
            types: self.types,
            decls: self.decls,
        })
    }
}

/// A `sync`-like package: `type Mutex struct{ state int32; sema uint32 }`
/// with `func (m *Mutex) Lock()`.
pub(crate) fn sync_like() -> TypedPackage {
    let mut f = Fixture::new("sync");
    let int32 = f.basic(BasicKind::Int32);
    let uint32 = f.basic(BasicKind::Uint32);
    let body = f.push(TypeData::Struct(vec![
        Fixture::field("state", int32),
        Fixture::field("sema", uint32),
    ]));
    let mutex = f.named("Mutex", body);
    let lock = f.push(TypeData::Signature {
        params: vec![],
        results: vec![],
        variadic: false,
    });
    f.method(mutex, "Lock", lock);
    f.build()
}
