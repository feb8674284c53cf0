//! Deterministic shape fingerprinting for expression trees.
#![allow(clippy::cast_possible_truncation)]

use super::{BinaryOp, Expr, MemberKind, TypeTag};
use crate::value::Value;
use sha2::{Digest, Sha256};

///
/// ShapeFingerprint
///
/// Stable fingerprint of an expression tree's *shape*: node kinds,
/// declared types, member and method names, and arity. Constant payloads
/// participate, with one deliberate exception: a constant holding an
/// opaque parameter holder contributes only its declaring type. That
/// exception is what lets rewritten membership tests over equal-size,
/// equal-element-type collections share one downstream plan-cache entry.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ShapeFingerprint([u8; 32]);

impl ShapeFingerprint {
    #[must_use]
    pub fn as_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in self.0 {
            use std::fmt::Write as _;
            let _ = write!(out, "{byte:02x}");
        }
        out
    }
}

impl std::fmt::Display for ShapeFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_hex())
    }
}

impl Expr {
    /// Compute a stable shape fingerprint for this tree.
    #[must_use]
    pub fn shape_fingerprint(&self) -> ShapeFingerprint {
        let mut hasher = Sha256::new();
        hasher.update(b"exprshape:v1");
        hash_expr(&mut hasher, self);
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        ShapeFingerprint(out)
    }
}

fn hash_expr(hasher: &mut Sha256, expr: &Expr) {
    match expr {
        Expr::Constant { value, ty } => {
            write_tag(hasher, 0x01);
            hash_type(hasher, ty);
            // Holder payloads are runtime parameters; only the declaring
            // type participates in the shape.
            if !matches!(value, Value::Holder(_)) {
                hash_value(hasher, value);
            }
        }
        Expr::Member {
            base,
            member,
            kind,
            ty,
        } => {
            write_tag(hasher, 0x02);
            write_tag(hasher, member_kind_tag(*kind));
            write_str(hasher, member);
            hash_type(hasher, ty);
            hash_expr(hasher, base);
        }
        Expr::Convert { inner, target } => {
            write_tag(hasher, 0x03);
            hash_type(hasher, target);
            hash_expr(hasher, inner);
        }
        Expr::Call {
            receiver,
            method,
            type_args,
            args,
            ty,
        } => {
            write_tag(hasher, 0x04);
            write_str(hasher, method);
            match receiver {
                Some(receiver) => {
                    write_tag(hasher, 0x01);
                    hash_expr(hasher, receiver);
                }
                None => write_tag(hasher, 0x00),
            }
            write_u32(hasher, type_args.len() as u32);
            for type_arg in type_args {
                hash_type(hasher, type_arg);
            }
            write_u32(hasher, args.len() as u32);
            for arg in args {
                hash_expr(hasher, arg);
            }
            hash_type(hasher, ty);
        }
        Expr::Binary { op, left, right } => {
            write_tag(hasher, 0x05);
            write_tag(hasher, binary_op_tag(*op));
            hash_expr(hasher, left);
            hash_expr(hasher, right);
        }
        Expr::Parameter { name, ty } => {
            write_tag(hasher, 0x06);
            write_str(hasher, name);
            hash_type(hasher, ty);
        }
        Expr::Thunk { ty, .. } => {
            // Captured computations are opaque; only the declared type
            // participates.
            write_tag(hasher, 0x07);
            hash_type(hasher, ty);
        }
    }
}

fn hash_value(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Null => write_tag(hasher, 0x20),
        Value::Bool(v) => {
            write_tag(hasher, 0x21);
            write_tag(hasher, u8::from(*v));
        }
        Value::Int(v) => {
            write_tag(hasher, 0x22);
            hasher.update(v.to_be_bytes());
        }
        Value::Uint(v) => {
            write_tag(hasher, 0x23);
            hasher.update(v.to_be_bytes());
        }
        Value::Text(v) => {
            write_tag(hasher, 0x24);
            write_str(hasher, v);
        }
        Value::List(items) => {
            write_tag(hasher, 0x25);
            write_u32(hasher, items.len() as u32);
            for item in items {
                hash_value(hasher, item);
            }
        }
        Value::Record(fields) => {
            write_tag(hasher, 0x26);
            write_u32(hasher, fields.len() as u32);
            for (name, field) in fields {
                write_str(hasher, name);
                hash_value(hasher, field);
            }
        }
        // Nested holders never expose their payload either.
        Value::Holder(_) => write_tag(hasher, 0x27),
    }
}

fn hash_type(hasher: &mut Sha256, ty: &TypeTag) {
    match ty {
        TypeTag::Bool => write_tag(hasher, 0x10),
        TypeTag::Int => write_tag(hasher, 0x11),
        TypeTag::Uint => write_tag(hasher, 0x12),
        TypeTag::Text => write_tag(hasher, 0x13),
        TypeTag::Sequence(elem) => {
            write_tag(hasher, 0x14);
            hash_type(hasher, elem);
        }
        TypeTag::Record(name) => {
            write_tag(hasher, 0x15);
            write_str(hasher, name);
        }
        TypeTag::Holder(elem) => {
            write_tag(hasher, 0x16);
            hash_type(hasher, elem);
        }
        TypeTag::Opaque(name) => {
            write_tag(hasher, 0x17);
            write_str(hasher, name);
        }
    }
}

const fn member_kind_tag(kind: MemberKind) -> u8 {
    match kind {
        MemberKind::Property => 0x01,
        MemberKind::Field => 0x02,
    }
}

const fn binary_op_tag(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Eq => 0x01,
        BinaryOp::Or => 0x02,
    }
}

fn write_str(hasher: &mut Sha256, value: &str) {
    write_u32(hasher, value.len() as u32);
    hasher.update(value.as_bytes());
}

fn write_u32(hasher: &mut Sha256, value: u32) {
    hasher.update(value.to_be_bytes());
}

fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}
