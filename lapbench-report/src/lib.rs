#![warn(missing_docs)]
//! Lapbench Report Structures
//!
//! The read-only interface handed to external reporters: per-run outcomes,
//! derived metrics, fitted complexities, diagnostics, and suite-level
//! counts, all serde-serializable. How results are printed or persisted is
//! the reporter's concern; nothing here formats anything.

mod report;

pub use report::{
    ComplexityReport, Diagnostic, EngineSettings, ReportMeta, ReportedMetrics, RunReport,
    RunStatus, SuiteReport, SuiteSummary,
};
