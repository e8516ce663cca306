//! Benchmark Registry
//!
//! Two-phase lifecycle: an append-only accumulation phase
//! ([`Registry::register`]) followed by a read-only execution phase
//! ([`Registry::seal`] → [`Suite`]). Cases execute in registration order,
//! so repeated runs of the same binary enumerate identically and reports
//! diff cleanly.
//!
//! Argument dimensions expand eagerly at registration: geometric ranges
//! unfold into their size sequence, multi-dimensional cases take the
//! Cartesian product with the first dimension varying slowest. Every
//! configuration problem is reported here, not at run time.

use lapbench_core::{Args, Bencher, FixtureCase};
use lapbench_stats::Complexity;
use std::collections::BTreeSet;
use thiserror::Error;

/// Default ratio between consecutive generated sizes, matching the
/// conventional power-of-eight benchmark ladder.
const DEFAULT_RANGE_MULTIPLIER: i64 = 8;

/// Configuration errors reported at registration time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Case names are unique per process; a duplicate is an unrecoverable
    /// startup error.
    #[error("duplicate benchmark name: {0}")]
    DuplicateName(String),

    /// A range whose end precedes its start.
    #[error("range end {end} is smaller than start {start}")]
    InvertedRange {
        /// Declared range start.
        start: i64,
        /// Declared range end.
        end: i64,
    },

    /// A multi-step range needs a multiplier of at least 2 to make progress.
    #[error("range multiplier must be greater than 1, got {0}")]
    BadMultiplier(i64),

    /// An explicit argument list with no values expands to zero runs.
    #[error("case `{0}` declares an empty argument list")]
    EmptyArguments(String),
}

/// One argument dimension: an explicit list or a geometric range.
#[derive(Debug, Clone)]
enum DimSpec {
    List(Vec<i64>),
    Geometric {
        start: i64,
        end: i64,
        multiplier: i64,
    },
}

/// The benchmarked work of a case: a free closure or a fixture.
pub(crate) enum CaseBody {
    Free(Box<dyn FnMut(&mut Bencher)>),
    Fixture(Box<dyn FixtureCase>),
}

/// A benchmark case under construction.
///
/// Mirrors the usual builder ladder:
///
/// ```no_run
/// # use lapbench::{Registry, CaseSpec};
/// # use lapbench::{Complexity, ComplexityClass};
/// # let mut registry = Registry::new();
/// registry.register(
///     CaseSpec::new("string_copy", |b| {
///         let s = "x".repeat(b.arg(0) as usize);
///         while b.keep_running() {
///             lapbench::black_box(s.clone());
///         }
///     })
///     .range_multiplier(2)
///     .range(1 << 10, 1 << 18)
///     .complexity(Complexity::Class(ComplexityClass::Linear)),
/// )?;
/// # Ok::<(), lapbench::ConfigError>(())
/// ```
pub struct CaseSpec {
    name: String,
    body: CaseBody,
    dims: Vec<DimSpec>,
    multiplier: i64,
    complexity: Option<Complexity>,
}

impl CaseSpec {
    /// A case whose body is a free closure.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: FnMut(&mut Bencher) + 'static,
    {
        Self {
            name: name.into(),
            body: CaseBody::Free(Box::new(body)),
            dims: Vec::new(),
            multiplier: DEFAULT_RANGE_MULTIPLIER,
            complexity: None,
        }
    }

    /// A case with per-run set-up/tear-down state.
    pub fn fixture<F>(name: impl Into<String>, fixture: F) -> Self
    where
        F: FixtureCase + 'static,
    {
        Self {
            name: name.into(),
            body: CaseBody::Fixture(Box::new(fixture)),
            dims: Vec::new(),
            multiplier: DEFAULT_RANGE_MULTIPLIER,
            complexity: None,
        }
    }

    /// Add a single-value argument dimension.
    pub fn arg(self, value: i64) -> Self {
        self.args(&[value])
    }

    /// Add an explicit-list argument dimension, preserving caller order.
    pub fn args(mut self, values: &[i64]) -> Self {
        self.dims.push(DimSpec::List(values.to_vec()));
        self
    }

    /// Ratio between consecutive generated sizes for *subsequent*
    /// [`range`](Self::range) calls (default 8).
    pub fn range_multiplier(mut self, multiplier: i64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Add a geometric argument dimension: `start, start*m, start*m², …`
    /// clamped to `end`, with `end` itself always included.
    pub fn range(mut self, start: i64, end: i64) -> Self {
        self.dims.push(DimSpec::Geometric {
            start,
            end,
            multiplier: self.multiplier,
        });
        self
    }

    /// Declare the asymptotic model fitted over this case's runs.
    pub fn complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = Some(complexity);
        self
    }
}

/// A registered, validated case. Configuration is read-only once the
/// registry seals; the body stays mutable because running it requires it.
pub struct Case {
    pub(crate) name: String,
    pub(crate) body: CaseBody,
    pub(crate) args: Vec<Args>,
    pub(crate) complexity: Option<Complexity>,
}

impl Case {
    /// Unique case name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expanded argument tuples in execution order.
    pub fn args(&self) -> &[Args] {
        &self.args
    }

    /// Declared complexity model, if any.
    pub fn complexity(&self) -> Option<Complexity> {
        self.complexity
    }
}

/// Accumulation phase of the process-wide case set.
#[derive(Default)]
pub struct Registry {
    cases: Vec<Case>,
    names: BTreeSet<String>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a case. All range expansion happens here; any
    /// configuration problem surfaces now rather than mid-suite.
    pub fn register(&mut self, spec: CaseSpec) -> Result<(), ConfigError> {
        if self.names.contains(&spec.name) {
            return Err(ConfigError::DuplicateName(spec.name));
        }

        let args = expand_dims(&spec.name, &spec.dims)?;
        self.names.insert(spec.name.clone());
        self.cases.push(Case {
            name: spec.name,
            body: spec.body,
            args,
            complexity: spec.complexity,
        });
        Ok(())
    }

    /// Number of registered cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether no case has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Close registration. The returned [`Suite`] is the read-only
    /// execution phase; nothing can be added afterwards.
    pub fn seal(self) -> Suite {
        Suite { cases: self.cases }
    }
}

/// The sealed, read-only case set in registration order.
pub struct Suite {
    pub(crate) cases: Vec<Case>,
}

impl Suite {
    /// Cases in registration order.
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }
}

/// Expand all dimensions of a case into its ordered tuple list.
fn expand_dims(name: &str, dims: &[DimSpec]) -> Result<Vec<Args>, ConfigError> {
    // A size-less case runs against the single implicit empty tuple.
    if dims.is_empty() {
        return Ok(vec![Args::none()]);
    }

    let mut per_dim: Vec<Vec<i64>> = Vec::with_capacity(dims.len());
    for dim in dims {
        let values = match dim {
            DimSpec::List(values) => {
                if values.is_empty() {
                    return Err(ConfigError::EmptyArguments(name.to_string()));
                }
                values.clone()
            }
            DimSpec::Geometric {
                start,
                end,
                multiplier,
            } => expand_range(*start, *end, *multiplier)?,
        };
        per_dim.push(values);
    }

    // Cartesian product, first dimension varying slowest.
    let mut tuples = vec![Vec::new()];
    for values in &per_dim {
        let mut next = Vec::with_capacity(tuples.len() * values.len());
        for prefix in &tuples {
            for &v in values {
                let mut tuple = prefix.clone();
                tuple.push(v);
                next.push(tuple);
            }
        }
        tuples = next;
    }

    Ok(tuples.into_iter().map(Args::new).collect())
}

/// Generate the geometric sequence `start, start*m, …` clamped to `end`,
/// appending `end` itself when the chain does not land on it exactly.
fn expand_range(start: i64, end: i64, multiplier: i64) -> Result<Vec<i64>, ConfigError> {
    if end < start {
        return Err(ConfigError::InvertedRange { start, end });
    }
    if start == end {
        return Ok(vec![start]);
    }
    if multiplier <= 1 {
        return Err(ConfigError::BadMultiplier(multiplier));
    }

    let mut values = Vec::new();
    let mut v = start;
    while v <= end {
        values.push(v);
        match v.checked_mul(multiplier) {
            // A stalled chain (start 0) or overflow ends generation; the
            // final `end` append below still closes the sequence.
            Some(next) if next > v => v = next,
            _ => break,
        }
    }
    if values.last() != Some(&end) {
        values.push(end);
    }
    Ok(values)
}
