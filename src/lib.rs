//! Bounded membership rewrite engine: finds `Contains` membership tests
//! over small, eagerly evaluable collections and replaces them with
//! equality/OR chains whose literals are boxed as opaque runtime
//! parameters, keeping the rewritten tree's shape stable across
//! different collection values.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod error;
pub mod expr;
pub mod obs;
pub mod rewrite;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Default inclusive bound on collection sizes eligible for rewriting.
///
/// Collections larger than this would expand into OR chains whose size
/// tracks the collection, reintroducing the shape instability the
/// rewrite exists to remove.
pub const DEFAULT_ELEMENTS_TO_CACHE: usize = 5;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, counters, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        expr::{BinaryOp, Expr, MemberKind, TypeTag},
        rewrite::RewriteEngine,
        value::Value,
    };
}
