#![warn(missing_docs)]
//! # Lapbench
//!
//! Micro-benchmark execution engine for Rust:
//! - **Adaptive timing**: each run grows its iteration count geometrically
//!   until measured CPU time dominates clock resolution and scheduler
//!   jitter; the converging probe is the reported sample
//! - **Suspension-free control object**: bodies loop on
//!   `Bencher::keep_running`, an O(1) predicate that never blocks
//! - **Throughput counters**: whole-run items/bytes/custom accumulators
//!   with derived per-second rates
//! - **Complexity fitting**: least-squares asymptotic curves over a case's
//!   input sizes, explicit or best-fit
//! - **Fixture lifecycle**: per-run set-up/tear-down outside the timed
//!   window, released on every exit path
//! - **Isolated failures**: a panicking body or non-converging loop marks
//!   one run and the suite continues
//!
//! ## Quick Start
//!
//! ```no_run
//! use lapbench::prelude::*;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let mut registry = Registry::new();
//!     registry.register(
//!         CaseSpec::new("vector_sum", |b| {
//!             let data: Vec<i64> = (0..b.arg(0)).collect();
//!             while b.keep_running() {
//!                 black_box(data.iter().sum::<i64>());
//!             }
//!             b.set_items_processed(b.iterations() * data.len() as u64);
//!         })
//!         .range_multiplier(2)
//!         .range(1 << 10, 1 << 16)
//!         .complexity(Complexity::Class(ComplexityClass::Linear)),
//!     )?;
//!
//!     let mut suite = registry.seal();
//!     let report = Executor::with_defaults().run(&mut suite);
//!     // Hand `report` to whatever consumes results (it is serde-ready).
//!     # let _ = report;
//!     Ok(())
//! }
//! ```

mod executor;
mod registry;

pub use executor::Executor;
pub use registry::{Case, CaseSpec, ConfigError, Registry, Suite};

// Re-export the engine surface
pub use lapbench_core::{
    black_box, run_adaptive, run_caught, run_fixture_case, Args, Bencher, EngineConfig,
    FixtureCase, RunError, RunResult, COUNTER_BYTES, COUNTER_ITEMS, HAS_CPU_CLOCK,
};

// Re-export derivations and fitting
pub use lapbench_stats::{
    derive_metrics, fit, Complexity, ComplexityClass, FitError, FittedComplexity, RunMetrics,
};

// Re-export the reporting interface
pub use lapbench_report::{
    ComplexityReport, Diagnostic, ReportMeta, ReportedMetrics, RunReport, RunStatus, SuiteReport,
    SuiteSummary,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        black_box, Bencher, CaseSpec, Complexity, ComplexityClass, ConfigError, EngineConfig,
        Executor, FixtureCase, Registry,
    };
}
