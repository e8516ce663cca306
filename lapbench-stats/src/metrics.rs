//! Derived Run Metrics
//!
//! Pure derivations over a stored [`RunResult`]: per-iteration times and
//! per-second counter rates. No hidden state: recomputing from the same
//! record yields identical values, so reports can be rebuilt at any time
//! without re-running anything.

use lapbench_core::{RunResult, COUNTER_BYTES, COUNTER_ITEMS};
use std::collections::BTreeMap;

/// Statistics derived from one completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetrics {
    /// Wall nanoseconds per iteration.
    pub ns_per_iter: f64,
    /// CPU nanoseconds per iteration.
    pub cpu_ns_per_iter: f64,
    /// Items processed per wall second, when the body registered the
    /// items counter.
    pub items_per_sec: Option<f64>,
    /// Bytes processed per wall second, when the body registered the
    /// bytes counter.
    pub bytes_per_sec: Option<f64>,
    /// Per-wall-second rate of every registered counter, keyed by name.
    pub counter_rates: BTreeMap<String, f64>,
}

/// Derive per-iteration and per-second statistics from a run.
pub fn derive_metrics(result: &RunResult) -> RunMetrics {
    let iterations = result.iterations.max(1) as f64;
    let wall_secs = result.wall_time_ns as f64 / 1e9;

    let counter_rates: BTreeMap<String, f64> = if result.wall_time_ns == 0 {
        BTreeMap::new()
    } else {
        result
            .counters
            .iter()
            .map(|(name, &value)| (name.clone(), value as f64 / wall_secs))
            .collect()
    };

    RunMetrics {
        ns_per_iter: result.wall_time_ns as f64 / iterations,
        cpu_ns_per_iter: result.cpu_time_ns as f64 / iterations,
        items_per_sec: counter_rates.get(COUNTER_ITEMS).copied(),
        bytes_per_sec: counter_rates.get(COUNTER_BYTES).copied(),
        counter_rates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(counters: &[(&str, u64)]) -> RunResult {
        RunResult {
            iterations: 1_000,
            wall_time_ns: 2_000_000, // 2ms
            cpu_time_ns: 1_500_000,
            counters: counters
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            input_size: None,
        }
    }

    #[test]
    fn test_per_iteration_times() {
        let metrics = derive_metrics(&result_with(&[]));
        assert!((metrics.ns_per_iter - 2_000.0).abs() < f64::EPSILON);
        assert!((metrics.cpu_ns_per_iter - 1_500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rates_only_when_registered() {
        let bare = derive_metrics(&result_with(&[]));
        assert!(bare.items_per_sec.is_none());
        assert!(bare.bytes_per_sec.is_none());

        let counted = derive_metrics(&result_with(&[("items", 4_000), ("bytes", 16_000)]));
        // 4000 items over 2ms = 2M items/sec
        assert!((counted.items_per_sec.unwrap() - 2e6).abs() < 1.0);
        assert!((counted.bytes_per_sec.unwrap() - 8e6).abs() < 1.0);
    }

    #[test]
    fn test_custom_counter_rate() {
        let metrics = derive_metrics(&result_with(&[("lookups", 1_000)]));
        assert!((metrics.counter_rates["lookups"] - 5e5).abs() < 1.0);
        assert!(metrics.items_per_sec.is_none());
    }

    #[test]
    fn test_idempotent_over_stored_result() {
        let result = result_with(&[("items", 123)]);
        let first = derive_metrics(&result);
        let second = derive_metrics(&result);
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_wall_time_yields_no_rates() {
        let mut result = result_with(&[("items", 10)]);
        result.wall_time_ns = 0;
        let metrics = derive_metrics(&result);
        assert!(metrics.counter_rates.is_empty());
        assert!(metrics.items_per_sec.is_none());
    }
}
