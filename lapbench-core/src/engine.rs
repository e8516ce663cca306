//! Adaptive Timing Engine
//!
//! Probes a benchmarked body with a growing iteration count until the
//! measured CPU time of one probe reaches the minimum run time. The
//! converging probe itself is the reported run; it is never re-measured.
//!
//! Growth per probe is proportional to the shortfall
//! (`min_run_time * 1.4 / measured`), clamped to [2, 10] so convergence is
//! geometric without overshooting on the last probe. A body that never
//! accumulates CPU time (no work, or one that ignores the control object)
//! exhausts the probe budget and fails with
//! [`RunError::DidNotConverge`].

use crate::bencher::{Args, Bencher, RunResult};
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

/// Smallest per-probe growth; guarantees geometric convergence.
const MIN_GROWTH: u64 = 2;

/// Largest per-probe growth; bounds overshoot past the threshold.
const MAX_GROWTH: u64 = 10;

/// Aim 40% past the threshold so the next probe usually converges.
const OVERSHOOT: f64 = 1.4;

/// Errors isolated to a single run. A failed run never aborts sibling
/// argument tuples or other cases.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunError {
    /// Fixture set-up failed before the timed window opened.
    #[error("fixture set-up failed: {0}")]
    SetUp(String),

    /// The body panicked inside the timed window.
    #[error("benchmark body panicked: {0}")]
    Panic(String),

    /// The probe budget was exhausted without reaching the minimum run
    /// time. Distinct from [`RunError::Panic`]: it signals a no-op body or
    /// one that never consults the control object.
    #[error(
        "timing loop did not reach the minimum run time after {probes} probes \
         (last iteration count {iterations})"
    )]
    DidNotConverge {
        /// Probes executed before giving up.
        probes: u32,
        /// Iteration count of the final probe.
        iterations: u64,
    },
}

/// Tuning knobs of the adaptive loop.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum CPU time one probe must accumulate to count as the run.
    pub min_run_time_ns: u64,
    /// Iteration count of the first probe.
    pub seed_iterations: u64,
    /// Probe budget before the run fails as non-converging.
    pub max_probes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_run_time_ns: 50_000_000, // 50ms: dominates clock resolution and scheduler jitter
            seed_iterations: 1,
            max_probes: 64, // growth >= 2 per probe; 2^64 iterations exceeds any real body
        }
    }
}

/// Per-probe growth for a probe that measured `measured_ns` of CPU time.
///
/// Proportional to the remaining shortfall, clamped to `[MIN_GROWTH,
/// MAX_GROWTH]`. An unmeasurably fast probe gets the full clamp.
pub(crate) fn growth_factor(measured_ns: u64, min_run_time_ns: u64) -> u64 {
    if measured_ns == 0 {
        return MAX_GROWTH;
    }
    let wanted = (min_run_time_ns as f64 * OVERSHOOT) / measured_ns as f64;
    (wanted as u64).clamp(MIN_GROWTH, MAX_GROWTH)
}

/// Run the adaptive loop for one body at one argument tuple.
///
/// The body is called once per probe and must drain
/// [`Bencher::keep_running`]; the timed window is the predicate loop
/// itself, so body-local preparation outside the loop is not measured.
/// The probe that first meets the minimum run time is returned as the
/// run's [`RunResult`]; a body whose single iteration already exceeds the
/// threshold therefore reports exactly one iteration from one probe.
///
/// Panics from the body propagate; callers that need a failed-run record
/// instead use [`run_caught`].
pub fn run_adaptive<F>(mut body: F, args: &Args, config: &EngineConfig) -> Result<RunResult, RunError>
where
    F: FnMut(&mut Bencher),
{
    let mut iterations = config.seed_iterations.max(1);

    for probe in 0..config.max_probes {
        let mut bencher = Bencher::new(iterations, args.clone());
        body(&mut bencher);
        let result = bencher.finish();

        if result.cpu_time_ns >= config.min_run_time_ns {
            tracing::debug!(
                probe,
                iterations,
                cpu_ns = result.cpu_time_ns,
                wall_ns = result.wall_time_ns,
                "probe converged"
            );
            return Ok(result);
        }

        let growth = growth_factor(result.cpu_time_ns, config.min_run_time_ns);
        tracing::trace!(
            probe,
            iterations,
            cpu_ns = result.cpu_time_ns,
            growth,
            "probe below threshold"
        );
        iterations = iterations.saturating_mul(growth);
    }

    Err(RunError::DidNotConverge {
        probes: config.max_probes,
        iterations,
    })
}

/// [`run_adaptive`] with body panics converted into [`RunError::Panic`].
pub fn run_caught<F>(mut body: F, args: &Args, config: &EngineConfig) -> Result<RunResult, RunError>
where
    F: FnMut(&mut Bencher),
{
    match catch_unwind(AssertUnwindSafe(|| run_adaptive(&mut body, args, config))) {
        Ok(outcome) => outcome,
        Err(panic) => Err(RunError::Panic(panic_message(panic))),
    }
}

/// Extract a readable message from a caught panic payload.
pub(crate) fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
