use crate::{
    expr::{Expr, MemberKind, TypeTag},
    value::{HolderCell, Value},
};
use std::rc::Rc;

/// Field name of the opaque parameter holder.
pub(crate) const HOLDER_FIELD: &str = "value";

/// Wrap one concrete value so the downstream query layer treats it as an
/// external runtime parameter rather than a literal folded into the shape.
///
/// Mechanism: a fresh single-field holder typed by the element type, read
/// back through a field access. Shape fingerprinting keys on the
/// field-access node and the holder's declaring type; the payload never
/// participates, so two boxings of different values with the same element
/// type produce identical shapes.
#[must_use]
pub(crate) fn box_value(value: Value, elem_ty: TypeTag) -> Expr {
    let holder = Rc::new(HolderCell::new(value));

    Expr::Member {
        base: Box::new(Expr::Constant {
            value: Value::Holder(holder),
            ty: TypeTag::Holder(Box::new(elem_ty.clone())),
        }),
        member: HOLDER_FIELD.to_string(),
        kind: MemberKind::Field,
        ty: elem_ty,
    }
}

///
/// TESTS
///
