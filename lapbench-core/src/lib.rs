#![warn(missing_docs)]
//! Lapbench Core - Timing Engine
//!
//! This crate provides the execution environment for benchmark runs:
//! - `Bencher` control object with a suspension-free `keep_running` predicate
//! - Adaptive iteration control converging on a minimum CPU run time
//! - Wall + per-thread CPU timing with an Instant fallback off Unix
//! - Fixture lifecycle with guaranteed tear-down on every exit path
//!
//! The engine is payload-agnostic: it only ever sees a callable that drains
//! the control object. Heterogeneous benchmarked bodies are plain closures
//! or [`FixtureCase`] implementations, never a type hierarchy.

mod bencher;
mod engine;
mod fixture;
mod measure;

pub use bencher::{Args, Bencher, RunResult, COUNTER_BYTES, COUNTER_ITEMS};
pub use engine::{run_adaptive, run_caught, EngineConfig, RunError};
pub use fixture::{run_fixture_case, FixtureCase};
pub use measure::{Elapsed, Timer, HAS_CPU_CLOCK};

/// Opaque value barrier for benchmarked expressions.
///
/// Wrap the result of the measured expression so the optimizer must
/// actually compute it: `black_box(s1.cmp(&s2))`. Re-exported from
/// `std::hint` as the documented no-optimization boundary.
pub use std::hint::black_box;
