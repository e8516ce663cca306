//! Bencher - The Benchmark Control Object
//!
//! The benchmarked body receives a `&mut Bencher` and loops on
//! [`Bencher::keep_running`], which returns `true` exactly as many times as
//! the engine budgeted for the current probe. The timed window opens at the
//! first `keep_running` call and closes on the call that returns `false`:
//! body-local preparation before the loop and counter registration after it
//! are never measured.

use crate::measure::{Elapsed, Timer};
use std::collections::BTreeMap;

/// Well-known counter name for items processed across the whole run.
pub const COUNTER_ITEMS: &str = "items";

/// Well-known counter name for bytes processed across the whole run.
pub const COUNTER_BYTES: &str = "bytes";

/// One concrete argument tuple a case is run against.
///
/// Most cases carry a single input size; multi-dimensional cases carry one
/// integer per declared dimension. A size-less case runs against the empty
/// tuple.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(Vec<i64>);

impl Args {
    /// Build a tuple from dimension values.
    pub fn new(values: Vec<i64>) -> Self {
        Self(values)
    }

    /// The implicit tuple of a case declared without argument dimensions.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Value of one dimension, if declared.
    pub fn get(&self, dim: usize) -> Option<i64> {
        self.0.get(dim).copied()
    }

    /// Number of declared dimensions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` for the implicit empty tuple.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All dimension values in declaration order.
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}

impl From<&[i64]> for Args {
    fn from(values: &[i64]) -> Self {
        Self(values.to_vec())
    }
}

/// Outcome of one completed run: the converging probe's measurements.
///
/// Owned by the engine while the run executes, then handed off immutably.
/// Every derived statistic is recomputable from this record alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Iterations executed inside the measured window.
    pub iterations: u64,
    /// Total wall-clock nanoseconds of the measured window.
    pub wall_time_ns: u64,
    /// Total CPU nanoseconds of the measured window.
    pub cpu_time_ns: u64,
    /// Whole-run counters registered by the body.
    pub counters: BTreeMap<String, u64>,
    /// Input size declared by the body for complexity fitting.
    pub input_size: Option<u64>,
}

/// Iteration control handed to the benchmarked body.
pub struct Bencher {
    remaining: u64,
    budget: u64,
    started: Option<Timer>,
    elapsed: Option<Elapsed>,
    args: Args,
    counters: BTreeMap<String, u64>,
    input_size: Option<u64>,
}

impl Bencher {
    /// Create a control object budgeted for `budget` iterations.
    pub(crate) fn new(budget: u64, args: Args) -> Self {
        Self {
            remaining: budget,
            budget,
            started: None,
            elapsed: None,
            args,
            counters: BTreeMap::new(),
            input_size: None,
        }
    }

    /// Returns `true` exactly `budget` times, then `false`.
    ///
    /// This is the loop predicate of every benchmarked body. The first call
    /// opens the timed window; the call that returns `false` closes it.
    /// In between it is a branch and a decrement; it never blocks, sleeps,
    /// or yields, so it adds no measurable overhead to the window.
    #[inline(always)]
    pub fn keep_running(&mut self) -> bool {
        if self.remaining == 0 {
            if self.elapsed.is_none() {
                if let Some(timer) = &self.started {
                    self.elapsed = Some(timer.stop());
                }
            }
            return false;
        }
        if self.remaining == self.budget {
            self.started = Some(Timer::start());
        }
        self.remaining -= 1;
        true
    }

    /// Iterations completed so far; after the loop, the full budget.
    ///
    /// Bodies typically use this to compute whole-run counters, e.g.
    /// `b.set_items_processed(b.iterations() * n)`.
    #[inline]
    pub fn iterations(&self) -> u64 {
        self.budget - self.remaining
    }

    /// The argument tuple this run executes against.
    pub fn args(&self) -> &Args {
        &self.args
    }

    /// Value of one argument dimension.
    ///
    /// # Panics
    ///
    /// Panics if the case was registered without dimension `dim`; that is a
    /// mismatch between the body and its registration, not a runtime
    /// condition.
    pub fn arg(&self, dim: usize) -> i64 {
        match self.args.get(dim) {
            Some(v) => v,
            None => panic!("benchmark body read undeclared argument dimension {dim}"),
        }
    }

    /// Declare the input size of this run for complexity fitting.
    pub fn set_input_size(&mut self, n: u64) {
        self.input_size = Some(n);
    }

    /// Set the whole-run items-processed counter.
    pub fn set_items_processed(&mut self, items: u64) {
        self.set_counter(COUNTER_ITEMS, items);
    }

    /// Set the whole-run bytes-processed counter.
    pub fn set_bytes_processed(&mut self, bytes: u64) {
        self.set_counter(COUNTER_BYTES, bytes);
    }

    /// Set a named whole-run counter.
    ///
    /// Counters accumulate over the whole run, not per iteration; setting the
    /// same name twice keeps the later value.
    pub fn set_counter(&mut self, name: &str, value: u64) {
        self.counters.insert(name.to_string(), value);
    }

    /// Measured window of this probe so far.
    ///
    /// Zero when the body never consulted the predicate; closed at body
    /// return when the body drained the budget without observing the final
    /// `false`.
    pub(crate) fn window(&self) -> Elapsed {
        match (&self.elapsed, &self.started) {
            (Some(elapsed), _) => *elapsed,
            (None, Some(timer)) => timer.stop(),
            (None, None) => Elapsed {
                wall_ns: 0,
                cpu_ns: 0,
            },
        }
    }

    /// Seal this probe into a [`RunResult`].
    pub(crate) fn finish(self) -> RunResult {
        let window = self.window();
        RunResult {
            iterations: self.budget,
            wall_time_ns: window.wall_ns,
            cpu_time_ns: window.cpu_ns,
            counters: self.counters,
            input_size: self.input_size,
        }
    }
}
