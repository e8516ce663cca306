//! Suite Executor
//!
//! Drives a sealed [`Suite`] to a [`SuiteReport`]. Measured execution is
//! strictly sequential: one case at a time, one argument tuple at a time,
//! each run's timed loop on the calling thread, fixture state never shared
//! across runs. Only the pure post-processing (metric derivation) fans out
//! across a Rayon pool.
//!
//! Failures stay inside their run: a panicking body, a failing set-up, or a
//! non-converging loop marks that one tuple and the suite moves on.

use crate::registry::{Case, CaseBody, Suite};
use chrono::Utc;
use lapbench_core::{run_caught, run_fixture_case, Args, EngineConfig, RunError, RunResult};
use lapbench_report::{
    ComplexityReport, Diagnostic, EngineSettings, ReportMeta, ReportedMetrics, RunReport,
    RunStatus, SuiteReport, SuiteSummary,
};
use lapbench_stats::{derive_metrics, fit, FitError};
use rayon::prelude::*;
use std::time::Instant;

/// One executed (case, tuple) pair, before report assembly.
struct RunRecord {
    case: String,
    args: Args,
    outcome: Result<RunResult, RunError>,
}

/// Executes benchmark suites and assembles reports.
pub struct Executor {
    config: EngineConfig,
}

impl Executor {
    /// An executor with the given engine tuning.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// An executor with default tuning.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    /// Run every case of the suite and hand back the complete report.
    pub fn run(&self, suite: &mut Suite) -> SuiteReport {
        let started = Instant::now();

        let mut records: Vec<RunRecord> = Vec::new();
        let mut fits = Vec::new();
        let mut diagnostics = Vec::new();

        for case in &mut suite.cases {
            let first_record = records.len();
            tracing::debug!(case = %case.name, tuples = case.args.len(), "running case");

            for args in case.args.clone() {
                let outcome = execute_one(case, &args, &self.config);
                if let Err(error) = &outcome {
                    tracing::warn!(case = %case.name, args = ?args.as_slice(), %error, "run failed");
                }
                records.push(RunRecord {
                    case: case.name.clone(),
                    args,
                    outcome,
                });
            }

            if let Some(model) = case.complexity {
                match fit_case_family(&records[first_record..], model) {
                    Ok((fitted, points)) => {
                        fits.push(ComplexityReport::new(case.name.clone(), &fitted, points));
                    }
                    Err(err) => diagnostics.push(Diagnostic {
                        case: case.name.clone(),
                        message: err.to_string(),
                    }),
                }
            }
        }

        // Pure derivations fan out; measured execution above never does.
        let metrics: Vec<Option<ReportedMetrics>> = records
            .par_iter()
            .map(|record| {
                record
                    .outcome
                    .as_ref()
                    .ok()
                    .map(|result| ReportedMetrics::from(&derive_metrics(result)))
            })
            .collect();

        let runs: Vec<RunReport> = records
            .into_iter()
            .zip(metrics)
            .map(|(record, metrics)| build_run_report(record, metrics))
            .collect();

        let summary = summarize(&runs, fits.len(), diagnostics.len(), started);

        SuiteReport {
            meta: ReportMeta {
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: Utc::now(),
                config: EngineSettings::from(&self.config),
            },
            runs,
            fits,
            diagnostics,
            summary,
        }
    }
}

/// Run one case at one tuple, routing through the fixture lifecycle when
/// the case declares one.
fn execute_one(case: &mut Case, args: &Args, config: &EngineConfig) -> Result<RunResult, RunError> {
    match &mut case.body {
        CaseBody::Free(body) => run_caught(|b| body(b), args, config),
        CaseBody::Fixture(fixture) => run_fixture_case(fixture.as_mut(), args, config),
    }
}

/// Collect this family's (size, CPU ns/iter) observations and fit them.
///
/// The size of a run is what its body declared via `set_input_size`,
/// falling back to the tuple's first argument; runs with neither, and
/// failed runs, are excluded.
fn fit_case_family(
    records: &[RunRecord],
    model: lapbench_stats::Complexity,
) -> Result<(lapbench_stats::FittedComplexity, usize), FitError> {
    let points: Vec<(u64, f64)> = records
        .iter()
        .filter_map(|record| {
            let result = record.outcome.as_ref().ok()?;
            let size = result
                .input_size
                .or_else(|| record.args.get(0).and_then(|v| u64::try_from(v).ok()))?;
            let per_iter = result.cpu_time_ns as f64 / result.iterations.max(1) as f64;
            Some((size, per_iter))
        })
        .collect();

    fit(&points, model).map(|fitted| (fitted, points.len()))
}

fn build_run_report(record: RunRecord, metrics: Option<ReportedMetrics>) -> RunReport {
    let (status, iterations, wall_time_ns, cpu_time_ns, counters, error) = match &record.outcome {
        Ok(result) => (
            RunStatus::Completed,
            result.iterations,
            result.wall_time_ns,
            result.cpu_time_ns,
            result.counters.clone(),
            None,
        ),
        Err(err) => {
            let status = match err {
                RunError::DidNotConverge { .. } => RunStatus::DidNotConverge,
                RunError::SetUp(_) | RunError::Panic(_) => RunStatus::Failed,
            };
            (status, 0, 0, 0, Default::default(), Some(err.to_string()))
        }
    };

    RunReport {
        case: record.case,
        args: record.args.as_slice().to_vec(),
        status,
        iterations,
        wall_time_ns,
        cpu_time_ns,
        counters,
        metrics,
        error,
    }
}

fn summarize(
    runs: &[RunReport],
    fits: usize,
    diagnostics: usize,
    started: Instant,
) -> SuiteSummary {
    let mut summary = SuiteSummary {
        total_runs: runs.len(),
        fits,
        diagnostics,
        total_duration_ms: started.elapsed().as_secs_f64() * 1000.0,
        ..Default::default()
    };
    for run in runs {
        match run.status {
            RunStatus::Completed => summary.completed += 1,
            RunStatus::Failed => summary.failed += 1,
            RunStatus::DidNotConverge => summary.did_not_converge += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{CaseSpec, Registry};
    use lapbench_stats::{Complexity, ComplexityClass};

    fn fast_executor() -> Executor {
        Executor::new(EngineConfig {
            min_run_time_ns: 200_000, // 200µs keeps unit tests quick
            ..Default::default()
        })
    }

    fn sum_body(b: &mut lapbench_core::Bencher) {
        let mut acc = 0u64;
        while b.keep_running() {
            acc = acc.wrapping_add(lapbench_core::black_box(acc) ^ 0xdead_beef);
        }
        lapbench_core::black_box(acc);
    }

    #[test]
    fn test_runs_in_registration_order() {
        let mut registry = Registry::new();
        registry
            .register(CaseSpec::new("second_alphabetically", sum_body).args(&[1, 2]))
            .unwrap();
        registry
            .register(CaseSpec::new("a_first_alphabetically", sum_body))
            .unwrap();
        let mut suite = registry.seal();

        let report = fast_executor().run(&mut suite);

        let order: Vec<&str> = report.runs.iter().map(|r| r.case.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "second_alphabetically",
                "second_alphabetically",
                "a_first_alphabetically"
            ]
        );
        assert_eq!(report.summary.completed, 3);
    }

    #[test]
    fn test_failed_tuple_isolated_from_siblings() {
        let mut registry = Registry::new();
        registry
            .register(
                CaseSpec::new("partial", |b| {
                    if b.arg(0) == 2 {
                        panic!("tuple two is broken");
                    }
                    sum_body(b);
                })
                .args(&[1, 2, 3]),
            )
            .unwrap();
        let mut suite = registry.seal();

        let report = fast_executor().run(&mut suite);

        assert_eq!(report.summary.total_runs, 3);
        assert_eq!(report.summary.completed, 2);
        assert_eq!(report.summary.failed, 1);

        let failed = &report.runs[1];
        assert_eq!(failed.args, vec![2]);
        assert_eq!(failed.status, RunStatus::Failed);
        assert!(failed.error.as_deref().unwrap().contains("tuple two is broken"));
        assert!(failed.metrics.is_none());
    }

    #[test]
    fn test_non_converging_case_reported_distinctly() {
        let executor = Executor::new(EngineConfig {
            min_run_time_ns: 200_000,
            max_probes: 6,
            ..Default::default()
        });

        let mut registry = Registry::new();
        registry
            .register(CaseSpec::new("ignores_control", |_b| {}))
            .unwrap();
        registry.register(CaseSpec::new("fine", sum_body)).unwrap();
        let mut suite = registry.seal();

        let report = executor.run(&mut suite);

        assert_eq!(report.runs[0].status, RunStatus::DidNotConverge);
        assert_eq!(report.runs[1].status, RunStatus::Completed);
        assert_eq!(report.summary.did_not_converge, 1);
    }

    #[test]
    fn test_fit_skipped_for_single_size_is_diagnostic() {
        let mut registry = Registry::new();
        registry
            .register(
                CaseSpec::new("one_size", sum_body)
                    .arg(1024)
                    .complexity(Complexity::Auto),
            )
            .unwrap();
        let mut suite = registry.seal();

        let report = fast_executor().run(&mut suite);

        assert!(report.fits.is_empty());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].case, "one_size");
        // The failed fit never blocks the runs themselves.
        assert_eq!(report.summary.completed, 1);
    }

    #[test]
    fn test_declared_size_wins_over_tuple_argument() {
        let mut registry = Registry::new();
        registry
            .register(
                CaseSpec::new("rescaled", |b| {
                    let declared = (b.arg(0) * 100) as u64;
                    b.set_input_size(declared);
                    sum_body(b);
                })
                .args(&[1, 2, 4])
                .complexity(Complexity::Class(ComplexityClass::Constant)),
            )
            .unwrap();
        let mut suite = registry.seal();

        let report = fast_executor().run(&mut suite);
        assert_eq!(report.fits.len(), 1);
        assert_eq!(report.fits[0].points, 3);
    }

    #[test]
    fn test_metrics_present_only_for_completed_runs() {
        let mut registry = Registry::new();
        registry
            .register(CaseSpec::new("counts", |b| {
                sum_body(b);
                b.set_items_processed(b.iterations());
            }))
            .unwrap();
        let mut suite = registry.seal();

        let report = fast_executor().run(&mut suite);
        let metrics = report.runs[0].metrics.as_ref().unwrap();
        assert!(metrics.items_per_sec.is_some());
        assert!(metrics.bytes_per_sec.is_none());
        assert!(metrics.ns_per_iter > 0.0);
    }
}
