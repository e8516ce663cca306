#![warn(missing_docs)]
//! Lapbench Statistical Engine
//!
//! Pure post-processing over finished runs:
//! - Per-iteration times and per-second counter rates derived from a stored
//!   `RunResult` (idempotent, no hidden state)
//! - Least-squares asymptotic complexity fitting with best-fit selection
//!   over {O(1), O(log n), O(n), O(n log n), O(n²)}
//!
//! Nothing in this crate measures anything; it only derives.

mod complexity;
mod metrics;

pub use complexity::{fit, Complexity, ComplexityClass, FitError, FittedComplexity};
pub use metrics::{derive_metrics, RunMetrics};
