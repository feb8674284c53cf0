//! Observability: rewrite telemetry counters.
//!
//! Counters are diagnostics only. The rewrite policy never consults them
//! and no correctness property depends on their values.

pub(crate) mod metrics;

// re-exports
pub use metrics::{RewriteStats, StatsSnapshot};
