//! Bounded membership rewrite: tree walking, the count-bounded rewrite
//! policy, partial evaluation of receivers, and opaque-value boxing.

mod boxing;
mod eval;
mod policy;
mod walker;

#[cfg(test)]
mod tests;

use crate::{DEFAULT_ELEMENTS_TO_CACHE, error::RewriteError, expr::Expr, obs::RewriteStats};
use std::sync::Arc;

///
/// RewriteEngine
///
/// Synchronous, single-pass rewriter. The bound is immutable per engine;
/// the counters handle may be shared across engines and threads. Each
/// invocation's evaluated values and constructed nodes are local to that
/// invocation.
///

#[derive(Clone, Debug)]
pub struct RewriteEngine {
    elements_to_cache: usize,
    stats: Arc<RewriteStats>,
}

impl RewriteEngine {
    #[must_use]
    pub fn new(elements_to_cache: usize) -> Self {
        Self::with_stats(elements_to_cache, Arc::new(RewriteStats::new()))
    }

    /// Boundary constructor for hosts carrying signed configuration
    /// values. Rejects negative bounds eagerly.
    pub fn try_new(elements_to_cache: i64) -> Result<Self, RewriteError> {
        let bound = usize::try_from(elements_to_cache).map_err(|_| RewriteError::NegativeBound {
            bound: elements_to_cache,
        })?;

        Ok(Self::new(bound))
    }

    /// Construct an engine around an injected counters handle, so hosts
    /// can aggregate across engine instances.
    #[must_use]
    pub const fn with_stats(elements_to_cache: usize, stats: Arc<RewriteStats>) -> Self {
        Self {
            elements_to_cache,
            stats,
        }
    }

    #[must_use]
    pub const fn elements_to_cache(&self) -> usize {
        self.elements_to_cache
    }

    #[must_use]
    pub fn stats(&self) -> &RewriteStats {
        &self.stats
    }

    /// Rewrite every recognized membership test in `expr`, returning a
    /// new tree (possibly structurally identical to the input).
    ///
    /// Errors indicate host integration defects only; unrecognized
    /// receiver shapes and oversized collections pass through unchanged.
    pub fn rewrite(&self, expr: &Expr) -> Result<Expr, RewriteError> {
        walker::visit(expr, self.elements_to_cache, &self.stats)
    }
}

impl Default for RewriteEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ELEMENTS_TO_CACHE)
    }
}
