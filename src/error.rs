use crate::expr::TypeTag;
use thiserror::Error as ThisError;

///
/// RewriteError
///
/// Fatal engine errors. Conservative pass-through outcomes (receivers
/// without element-type information, oversized collections) are not
/// errors; every variant here indicates a configuration defect or a host
/// integration defect. The engine never emits a replacement it cannot
/// prove equivalent to the original call.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RewriteError {
    #[error("elements_to_cache must be non-negative, got {bound}")]
    NegativeBound { bound: i64 },

    #[error("cannot evaluate {kind} node; the host handed the engine a receiver shape it does not understand")]
    Unevaluable { kind: &'static str },

    #[error("member '{member}' not found on evaluated record")]
    MemberNotFound { member: String },

    #[error("member '{member}' read off a non-record value")]
    MemberOnScalar { member: String },

    #[error("membership receiver declared {ty:?} but evaluated to a non-sequence value")]
    ReceiverNotSequence { ty: TypeTag },
}
