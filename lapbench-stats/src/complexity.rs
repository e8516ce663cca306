//! Asymptotic Complexity Fitting
//!
//! Fits (input size, time-per-iteration) observations of one case family to
//! an asymptotic curve. Each candidate class has a single free parameter,
//! the leading coefficient, so the fit is one least-squares regression
//! through the origin per candidate:
//!
//! ```text
//! k = Σ t·f(n) / Σ f(n)²
//! ```
//!
//! Fit quality is the root-mean-square residual normalized by the mean
//! measured time, making errors comparable across classes and cases.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Asymptotic curve shapes, ordered from simplest upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplexityClass {
    /// O(1)
    Constant,
    /// O(log n)
    Logarithmic,
    /// O(n)
    Linear,
    /// O(n log n)
    Linearithmic,
    /// O(n²)
    Quadratic,
}

impl ComplexityClass {
    /// All candidate classes, simplest first. Best-fit selection scans in
    /// this order so error ties resolve toward the simpler class.
    pub const ALL: [ComplexityClass; 5] = [
        ComplexityClass::Constant,
        ComplexityClass::Logarithmic,
        ComplexityClass::Linear,
        ComplexityClass::Linearithmic,
        ComplexityClass::Quadratic,
    ];

    /// Evaluate the curve shape at input size `n`.
    ///
    /// Logarithms clamp `n` to 2 so degenerate sizes (0 and 1) contribute a
    /// finite, nonzero point instead of poisoning the regression.
    pub fn curve(self, n: u64) -> f64 {
        let x = n as f64;
        match self {
            ComplexityClass::Constant => 1.0,
            ComplexityClass::Logarithmic => (x.max(2.0)).log2(),
            ComplexityClass::Linear => x,
            ComplexityClass::Linearithmic => x * (x.max(2.0)).log2(),
            ComplexityClass::Quadratic => x * x,
        }
    }

    /// Big-O notation for reports.
    pub fn notation(self) -> &'static str {
        match self {
            ComplexityClass::Constant => "O(1)",
            ComplexityClass::Logarithmic => "O(log n)",
            ComplexityClass::Linear => "O(n)",
            ComplexityClass::Linearithmic => "O(n log n)",
            ComplexityClass::Quadratic => "O(n^2)",
        }
    }
}

/// A case's declared complexity model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    /// Fit exactly this class.
    Class(ComplexityClass),
    /// Fit every candidate and keep the lowest-error one.
    Auto,
}

/// Outcome of fitting one case family. Derived, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedComplexity {
    /// The chosen asymptotic class.
    pub class: ComplexityClass,
    /// Least-squares leading coefficient (nanoseconds per curve unit).
    pub coefficient: f64,
    /// RMS residual normalized by the mean measured time.
    pub rms_error: f64,
}

/// Configuration errors surfaced by the fitter. These skip only the fit in
/// question; the rest of the suite is unaffected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FitError {
    /// Fitting needs observations at two or more distinct input sizes.
    #[error("complexity fitting needs at least two distinct input sizes, got {0}")]
    TooFewSizes(usize),
}

/// Fit a family of `(input size, time-per-iteration)` observations.
///
/// Points arrive in run order; only the multiset of values matters. With an
/// explicit class exactly one regression is computed; with
/// [`Complexity::Auto`] every candidate is fitted and the lowest normalized
/// error wins, ties resolving toward the simpler class.
pub fn fit(points: &[(u64, f64)], model: Complexity) -> Result<FittedComplexity, FitError> {
    let mut sizes: Vec<u64> = points.iter().map(|&(n, _)| n).collect();
    sizes.sort_unstable();
    sizes.dedup();
    if sizes.len() < 2 {
        return Err(FitError::TooFewSizes(sizes.len()));
    }

    match model {
        Complexity::Class(class) => Ok(fit_class(points, class)),
        Complexity::Auto => {
            let mut best: Option<FittedComplexity> = None;
            for class in ComplexityClass::ALL {
                let candidate = fit_class(points, class);
                let better = match &best {
                    // Strict comparison: an equal-error later (more complex)
                    // class never displaces an earlier one.
                    Some(current) => candidate.rms_error < current.rms_error,
                    None => true,
                };
                if better {
                    best = Some(candidate);
                }
            }
            // ALL is non-empty, so best is always set by the first pass.
            Ok(best.unwrap_or(FittedComplexity {
                class: ComplexityClass::Constant,
                coefficient: 0.0,
                rms_error: 0.0,
            }))
        }
    }
}

/// Single least-squares regression through the origin for one class.
fn fit_class(points: &[(u64, f64)], class: ComplexityClass) -> FittedComplexity {
    let mut sum_tf = 0.0;
    let mut sum_ff = 0.0;
    for &(n, t) in points {
        let f = class.curve(n);
        sum_tf += t * f;
        sum_ff += f * f;
    }
    let coefficient = if sum_ff > 0.0 { sum_tf / sum_ff } else { 0.0 };

    let mean_time = points.iter().map(|&(_, t)| t).sum::<f64>() / points.len() as f64;
    let residual_sq: f64 = points
        .iter()
        .map(|&(n, t)| {
            let r = t - coefficient * class.curve(n);
            r * r
        })
        .sum();
    let rms = (residual_sq / points.len() as f64).sqrt();
    let rms_error = if mean_time > 0.0 { rms / mean_time } else { rms };

    FittedComplexity {
        class,
        coefficient,
        rms_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_round_trip() {
        // t = 3n over doubling sizes: best fit must pick linear with k ~= 3.
        let points: Vec<(u64, f64)> = [1_000u64, 2_000, 4_000, 8_000]
            .iter()
            .map(|&n| (n, 3.0 * n as f64))
            .collect();

        let fitted = fit(&points, Complexity::Auto).unwrap();
        assert_eq!(fitted.class, ComplexityClass::Linear);
        assert!((fitted.coefficient - 3.0).abs() < 1e-9);
        assert!(fitted.rms_error < 1e-9);
    }

    #[test]
    fn test_constant_round_trip() {
        let points = [(1u64, 42.0), (2, 42.0), (4, 42.0), (8, 42.0)];
        let fitted = fit(&points, Complexity::Class(ComplexityClass::Constant)).unwrap();

        assert_eq!(fitted.class, ComplexityClass::Constant);
        assert!((fitted.coefficient - 42.0).abs() < 1e-9);
        assert!(fitted.rms_error < 1e-9);
    }

    #[test]
    fn test_auto_prefers_simpler_on_flat_data() {
        // Flat data fits constant exactly; no heavier class may win the tie.
        let points = [(10u64, 5.0), (100, 5.0), (1_000, 5.0)];
        let fitted = fit(&points, Complexity::Auto).unwrap();
        assert_eq!(fitted.class, ComplexityClass::Constant);
    }

    #[test]
    fn test_linearithmic_synthetic() {
        let points: Vec<(u64, f64)> = [1_024u64, 4_096, 16_384, 65_536]
            .iter()
            .map(|&n| (n, 2.0 * n as f64 * (n as f64).log2()))
            .collect();

        let fitted = fit(&points, Complexity::Auto).unwrap();
        assert_eq!(fitted.class, ComplexityClass::Linearithmic);
        assert!((fitted.coefficient - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_quadratic_synthetic() {
        let points: Vec<(u64, f64)> = [100u64, 200, 400, 800]
            .iter()
            .map(|&n| (n, 0.5 * (n as f64) * (n as f64)))
            .collect();

        let fitted = fit(&points, Complexity::Auto).unwrap();
        assert_eq!(fitted.class, ComplexityClass::Quadratic);
        assert!((fitted.coefficient - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_class_is_the_only_fit() {
        // Linear data, constant requested: the fitter must not second-guess.
        let points = [(1_000u64, 3_000.0), (2_000, 6_000.0), (4_000, 12_000.0)];
        let fitted = fit(&points, Complexity::Class(ComplexityClass::Constant)).unwrap();

        assert_eq!(fitted.class, ComplexityClass::Constant);
        assert!(fitted.rms_error > 0.1, "a wrong declared class shows up as error");
    }

    #[test]
    fn test_too_few_distinct_sizes() {
        let same_size = [(4_096u64, 10.0), (4_096, 11.0), (4_096, 12.0)];
        assert_eq!(
            fit(&same_size, Complexity::Auto).unwrap_err(),
            FitError::TooFewSizes(1)
        );

        let empty: [(u64, f64); 0] = [];
        assert_eq!(
            fit(&empty, Complexity::Auto).unwrap_err(),
            FitError::TooFewSizes(0)
        );
    }

    #[test]
    fn test_degenerate_sizes_stay_finite() {
        // Sizes 0 and 1 clamp inside the log curves instead of producing
        // -inf/NaN coefficients.
        let points = [(0u64, 1.0), (1, 1.0), (1_024, 1.0)];
        for class in ComplexityClass::ALL {
            let fitted = fit(&points, Complexity::Class(class)).unwrap();
            assert!(fitted.coefficient.is_finite());
            assert!(fitted.rms_error.is_finite());
        }
    }

    #[test]
    fn test_noisy_linear_still_selects_linear() {
        // ±2% deterministic ripple on t = 5n.
        let ripple = [1.02, 0.98, 1.01, 0.99, 1.02];
        let points: Vec<(u64, f64)> = [512u64, 1_024, 2_048, 4_096, 8_192]
            .iter()
            .zip(ripple.iter())
            .map(|(&n, &r)| (n, 5.0 * n as f64 * r))
            .collect();

        let fitted = fit(&points, Complexity::Auto).unwrap();
        assert_eq!(fitted.class, ComplexityClass::Linear);
        assert!((fitted.coefficient - 5.0).abs() < 0.2);
        assert!(fitted.rms_error < 0.05);
    }
}
