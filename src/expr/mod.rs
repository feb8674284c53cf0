mod shape;

pub use shape::ShapeFingerprint;

use crate::value::Value;
use std::{fmt, rc::Rc};

///
/// Expression AST
///
/// Pure, owned representation of the host's predicate expressions.
/// The engine consumes one tree and produces a new or identical tree;
/// no node is mutated in place. This layer carries no execution
/// semantics — interpretation belongs to the downstream query engine.
///

///
/// TypeTag
///
/// Declared static type of an expression node. `Sequence` is the only
/// shape that carries an element-type argument; receivers declared as
/// `Opaque` expose no type arguments and are passed through unrewritten.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeTag {
    Bool,
    Int,
    Uint,
    Text,
    Sequence(Box<Self>),
    Record(String),
    /// Declaring type of a boxed parameter holder, keyed by element type.
    Holder(Box<Self>),
    /// Named type with zero type arguments.
    Opaque(String),
}

impl TypeTag {
    /// Element type argument, if this type carries one.
    #[must_use]
    pub fn element(&self) -> Option<&Self> {
        match self {
            Self::Sequence(elem) => Some(elem),
            _ => None,
        }
    }

    #[must_use]
    pub fn sequence_of(elem: Self) -> Self {
        Self::Sequence(Box::new(elem))
    }
}

///
/// MemberKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemberKind {
    Property,
    Field,
}

///
/// BinaryOp
///
/// Boolean combinators used only in trees the engine constructs.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinaryOp {
    Eq,
    Or,
}

///
/// ThunkFn
///
/// Host-captured computation over values the tree cannot express
/// structurally (captured variables, indexing, anything else). The
/// partial evaluator's slow path invokes it; no other pass inspects it.
///

#[derive(Clone)]
pub struct ThunkFn(Rc<dyn Fn() -> Value>);

impl ThunkFn {
    pub fn new(f: impl Fn() -> Value + 'static) -> Self {
        Self(Rc::new(f))
    }

    #[must_use]
    pub fn invoke(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for ThunkFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ThunkFn")
    }
}

// Thunks compare by identity: two closures are the same expression only
// if they are the same allocation.
impl PartialEq for ThunkFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ThunkFn {}

///
/// Expr
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expr {
    Constant {
        value: Value,
        ty: TypeTag,
    },
    Member {
        base: Box<Self>,
        member: String,
        kind: MemberKind,
        ty: TypeTag,
    },
    Convert {
        inner: Box<Self>,
        target: TypeTag,
    },
    Call {
        receiver: Option<Box<Self>>,
        method: String,
        type_args: Vec<TypeTag>,
        args: Vec<Self>,
        ty: TypeTag,
    },
    Binary {
        op: BinaryOp,
        left: Box<Self>,
        right: Box<Self>,
    },
    /// Free placeholder bound by the downstream engine (query parameter,
    /// current-row reference). Never evaluated by the rewrite engine.
    Parameter {
        name: String,
        ty: TypeTag,
    },
    Thunk {
        f: ThunkFn,
        ty: TypeTag,
    },
}

impl Expr {
    /// Declared type of this node.
    #[must_use]
    pub fn ty(&self) -> TypeTag {
        match self {
            Self::Constant { ty, .. }
            | Self::Member { ty, .. }
            | Self::Call { ty, .. }
            | Self::Parameter { ty, .. }
            | Self::Thunk { ty, .. } => ty.clone(),
            Self::Convert { target, .. } => target.clone(),
            Self::Binary { .. } => TypeTag::Bool,
        }
    }

    #[must_use]
    pub const fn constant(value: Value, ty: TypeTag) -> Self {
        Self::Constant { value, ty }
    }

    #[must_use]
    pub const fn bool_constant(value: bool) -> Self {
        Self::Constant {
            value: Value::Bool(value),
            ty: TypeTag::Bool,
        }
    }

    /// Collection literal with a known element type.
    #[must_use]
    pub fn sequence_constant(items: Vec<Value>, elem: TypeTag) -> Self {
        Self::Constant {
            value: Value::List(items),
            ty: TypeTag::sequence_of(elem),
        }
    }

    #[must_use]
    pub fn property(base: Self, member: impl Into<String>, ty: TypeTag) -> Self {
        Self::Member {
            base: Box::new(base),
            member: member.into(),
            kind: MemberKind::Property,
            ty,
        }
    }

    #[must_use]
    pub fn field(base: Self, member: impl Into<String>, ty: TypeTag) -> Self {
        Self::Member {
            base: Box::new(base),
            member: member.into(),
            kind: MemberKind::Field,
            ty,
        }
    }

    #[must_use]
    pub fn convert(inner: Self, target: TypeTag) -> Self {
        Self::Convert {
            inner: Box::new(inner),
            target,
        }
    }

    #[must_use]
    pub fn call(
        receiver: Option<Self>,
        method: impl Into<String>,
        type_args: Vec<TypeTag>,
        args: Vec<Self>,
        ty: TypeTag,
    ) -> Self {
        Self::Call {
            receiver: receiver.map(Box::new),
            method: method.into(),
            type_args,
            args,
            ty,
        }
    }

    /// Instance-form membership test: `receiver.Contains(probed)`.
    #[must_use]
    pub fn contains(receiver: Self, probed: Self) -> Self {
        Self::call(Some(receiver), "Contains", vec![], vec![probed], TypeTag::Bool)
    }

    /// Extension-form membership test: `Contains(collection, probed)`.
    #[must_use]
    pub fn contains_extension(collection: Self, probed: Self) -> Self {
        let type_args = collection.ty().element().cloned().into_iter().collect();
        Self::call(None, "Contains", type_args, vec![collection, probed], TypeTag::Bool)
    }

    #[must_use]
    pub fn binary(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn parameter(name: impl Into<String>, ty: TypeTag) -> Self {
        Self::Parameter {
            name: name.into(),
            ty,
        }
    }

    #[must_use]
    pub fn thunk(f: impl Fn() -> Value + 'static, ty: TypeTag) -> Self {
        Self::Thunk {
            f: ThunkFn::new(f),
            ty,
        }
    }
}

///
/// TESTS
///
