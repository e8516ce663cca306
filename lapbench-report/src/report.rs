//! Report Data Structures

use chrono::{DateTime, Utc};
use lapbench_core::EngineConfig;
use lapbench_stats::{ComplexityClass, FittedComplexity, RunMetrics};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete suite outcome handed to the external reporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub meta: ReportMeta,
    pub runs: Vec<RunReport>,
    pub fits: Vec<ComplexityReport>,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: SuiteSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub config: EngineSettings,
}

/// Engine configuration captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    pub min_run_time_ns: u64,
    pub seed_iterations: u64,
    pub max_probes: u32,
}

impl From<&EngineConfig> for EngineSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            min_run_time_ns: config.min_run_time_ns,
            seed_iterations: config.seed_iterations,
            max_probes: config.max_probes,
        }
    }
}

/// Execution status of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    /// The adaptive loop converged and produced measurements.
    Completed,
    /// Fixture set-up failed or the body panicked.
    Failed,
    /// The probe budget ran out below the minimum run time.
    DidNotConverge,
}

/// One case at one argument tuple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub case: String,
    pub args: Vec<i64>,
    pub status: RunStatus,
    pub iterations: u64,
    pub wall_time_ns: u64,
    pub cpu_time_ns: u64,
    pub counters: BTreeMap<String, u64>,
    /// Present only for completed runs.
    pub metrics: Option<ReportedMetrics>,
    /// Present only for failed / non-converging runs.
    pub error: Option<String>,
}

/// Derived statistics of one completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportedMetrics {
    pub ns_per_iter: f64,
    pub cpu_ns_per_iter: f64,
    pub items_per_sec: Option<f64>,
    pub bytes_per_sec: Option<f64>,
    pub counter_rates: BTreeMap<String, f64>,
}

impl From<&RunMetrics> for ReportedMetrics {
    fn from(metrics: &RunMetrics) -> Self {
        Self {
            ns_per_iter: metrics.ns_per_iter,
            cpu_ns_per_iter: metrics.cpu_ns_per_iter,
            items_per_sec: metrics.items_per_sec,
            bytes_per_sec: metrics.bytes_per_sec,
            counter_rates: metrics.counter_rates.clone(),
        }
    }
}

/// Fitted asymptotic complexity of one case family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityReport {
    pub case: String,
    pub class: ComplexityClass,
    /// Big-O notation of `class`, for reporters that print rather than match.
    pub notation: String,
    pub coefficient: f64,
    pub rms_error: f64,
    /// Observations the regression consumed.
    pub points: usize,
}

impl ComplexityReport {
    /// Build from a finished fit.
    pub fn new(case: impl Into<String>, fitted: &FittedComplexity, points: usize) -> Self {
        Self {
            case: case.into(),
            class: fitted.class,
            notation: fitted.class.notation().to_string(),
            coefficient: fitted.coefficient,
            rms_error: fitted.rms_error,
            points,
        }
    }
}

/// A configuration problem surfaced during execution (e.g. a complexity fit
/// skipped for lack of distinct input sizes). Never fatal to the suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub case: String,
    pub message: String,
}

/// Suite-level counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub total_runs: usize,
    pub completed: usize,
    pub failed: usize,
    pub did_not_converge: usize,
    pub fits: usize,
    pub diagnostics: usize,
    pub total_duration_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> SuiteReport {
        SuiteReport {
            meta: ReportMeta {
                version: "0.1.0".to_string(),
                timestamp: Utc::now(),
                config: EngineSettings {
                    min_run_time_ns: 50_000_000,
                    seed_iterations: 1,
                    max_probes: 64,
                },
            },
            runs: vec![RunReport {
                case: "string_copy".to_string(),
                args: vec![1024],
                status: RunStatus::Completed,
                iterations: 4_096,
                wall_time_ns: 52_000_000,
                cpu_time_ns: 51_000_000,
                counters: [("bytes".to_string(), 4_194_304u64)].into_iter().collect(),
                metrics: Some(ReportedMetrics {
                    ns_per_iter: 12_695.3,
                    cpu_ns_per_iter: 12_451.1,
                    items_per_sec: None,
                    bytes_per_sec: Some(8.06e7),
                    counter_rates: [("bytes".to_string(), 8.06e7)].into_iter().collect(),
                }),
                error: None,
            }],
            fits: vec![ComplexityReport {
                case: "string_copy".to_string(),
                class: ComplexityClass::Linear,
                notation: "O(n)".to_string(),
                coefficient: 12.4,
                rms_error: 0.03,
                points: 4,
            }],
            diagnostics: vec![],
            summary: SuiteSummary {
                total_runs: 1,
                completed: 1,
                fits: 1,
                total_duration_ms: 310.0,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_report_serde_round_trip() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        let back: SuiteReport = serde_json::from_str(&json).unwrap();

        assert_eq!(back.runs.len(), 1);
        assert_eq!(back.runs[0].status, RunStatus::Completed);
        assert_eq!(back.fits[0].class, ComplexityClass::Linear);
        assert_eq!(back.summary.completed, 1);
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_string(&RunStatus::DidNotConverge).unwrap();
        assert_eq!(json, "\"did-not-converge\"");
    }

    #[test]
    fn test_settings_capture_config() {
        let config = EngineConfig::default();
        let settings = EngineSettings::from(&config);
        assert_eq!(settings.min_run_time_ns, config.min_run_time_ns);
        assert_eq!(settings.max_probes, config.max_probes);
    }
}
