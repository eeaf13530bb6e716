//! Type identity.
//!
//! Named types compare by provenance: the same slot of the same package
//! instance. Everything else compares structurally, bottoming out at named
//! or basic types, so the recursion always terminates.

use canonpkg_core::utils::is_exported;

use super::handle::resolve;
use super::{TypeData, TypeHandle, TypeId, TypedPackage};

/// Whether `a` and `b` denote the identical type.
///
/// Two loads of one package that produced different instances yield
/// non-identical named types even when their declarations are equal.
pub fn identical(a: &TypeHandle, b: &TypeHandle) -> bool {
    let (pa, ia) = a.resolved();
    let (pb, ib) = b.resolved();
    identical_in(pa, ia, pb, ib)
}

fn identical_in(pa: &TypedPackage, ia: TypeId, pb: &TypedPackage, ib: TypeId) -> bool {
    let (pa, ia) = resolve(pa, ia);
    let (pb, ib) = resolve(pb, ib);

    match (pa.data(ia), pb.data(ib)) {
        (TypeData::Basic(x), TypeData::Basic(y)) => x == y,
        (TypeData::Named { .. }, TypeData::Named { .. }) => {
            TypedPackage::ptr_eq(pa, pb) && ia == ib
        }
        (TypeData::Pointer(x), TypeData::Pointer(y))
        | (TypeData::Slice(x), TypeData::Slice(y)) => identical_in(pa, *x, pb, *y),
        (TypeData::Map(kx, vx), TypeData::Map(ky, vy)) => {
            identical_in(pa, *kx, pb, *ky) && identical_in(pa, *vx, pb, *vy)
        }
        (TypeData::Struct(fx), TypeData::Struct(fy)) => {
            fx.len() == fy.len()
                && fx.iter().zip(fy).all(|(x, y)| {
                    x.name == y.name
                        && x.embedded == y.embedded
                        && (is_exported(&x.name) || TypedPackage::ptr_eq(pa, pb))
                        && identical_in(pa, x.ty, pb, y.ty)
                })
        }
        (
            TypeData::Signature {
                params: px,
                results: rx,
                variadic: vx,
            },
            TypeData::Signature {
                params: py,
                results: ry,
                variadic: vy,
            },
        ) => {
            vx == vy
                && all_identical(pa, px, pb, py)
                && all_identical(pa, rx, pb, ry)
        }
        _ => false,
    }
}

fn all_identical(pa: &TypedPackage, xs: &[TypeId], pb: &TypedPackage, ys: &[TypeId]) -> bool {
    xs.len() == ys.len()
        && xs
            .iter()
            .zip(ys)
            .all(|(x, y)| identical_in(pa, *x, pb, *y))
}
