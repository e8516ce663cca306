//! Fixture Lifecycle
//!
//! A fixture owns mutable state scoped to one run: `set_up` executes once
//! before the timed loop, `tear_down` once after it, on every exit path.
//! Neither is ever inside the measured window, so data construction and
//! container reservation belong here rather than in the body.

use crate::bencher::{Args, Bencher, RunResult};
use crate::engine::{panic_message, run_adaptive, EngineConfig, RunError};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// A benchmark case with per-run state.
///
/// The engine guarantees `set_up` happens-before the timed loop and
/// `tear_down` happens-after it, once each per argument tuple. `tear_down`
/// also runs when `set_up` fails or the body panics, releasing whatever
/// partial state exists.
pub trait FixtureCase {
    /// Build per-run state for one argument tuple.
    fn set_up(&mut self, args: &Args) -> Result<(), String>;

    /// The measured body; loops on [`Bencher::keep_running`].
    fn bench(&mut self, b: &mut Bencher);

    /// Release per-run state. Default: nothing to release.
    fn tear_down(&mut self) {}
}

/// Run a fixture case at one argument tuple.
///
/// Set-up and body panics are converted into [`RunError`]s; `tear_down`
/// is invoked on every path out of this function.
pub fn run_fixture_case(
    fixture: &mut dyn FixtureCase,
    args: &Args,
    config: &EngineConfig,
) -> Result<RunResult, RunError> {
    let outcome = set_up_and_run(fixture, args, config);
    fixture.tear_down();
    outcome
}

fn set_up_and_run(
    fixture: &mut dyn FixtureCase,
    args: &Args,
    config: &EngineConfig,
) -> Result<RunResult, RunError> {
    match catch_unwind(AssertUnwindSafe(|| fixture.set_up(args))) {
        Ok(Ok(())) => {}
        Ok(Err(message)) => return Err(RunError::SetUp(message)),
        Err(panic) => return Err(RunError::SetUp(panic_message(panic))),
    }

    match catch_unwind(AssertUnwindSafe(|| {
        run_adaptive(|b| fixture.bench(b), args, config)
    })) {
        Ok(outcome) => outcome,
        Err(panic) => Err(RunError::Panic(panic_message(panic))),
    }
}
