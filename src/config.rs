//! Solver configuration.
//!
//! By default the solvers trust the caller to supply a well-posed system: a zero pivot,
//! denominator or 2x2 determinant silently produces `inf`/`NaN`. Strict mode checks each
//! pivot against [`SolverConfig::pivot_tolerance`] and returns
//! [`LinalgError::Degenerate`](crate::LinalgError::Degenerate) instead.

use num_traits::Float;

/// Environment variable enabling strict mode (`1` or `true`).
pub const STRICT_ENV: &str = "LINSOLVE_STRICT";

/// Environment variable holding the strict-mode pivot tolerance.
pub const PIVOT_TOL_ENV: &str = "LINSOLVE_PIVOT_TOL";

/// Options shared by the dense, tridiagonal and block-tridiagonal solvers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Report degenerate pivots as errors instead of propagating `inf`/`NaN`.
    pub strict: bool,
    /// In strict mode, a pivot with `|p| <= pivot_tolerance` is degenerate.
    pub pivot_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strict: false,
            pivot_tolerance: 0.0,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the strict-mode pivot tolerance. Negative values are clamped to zero.
    pub fn pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance.max(0.0);
        self
    }

    /// Read [`STRICT_ENV`] and [`PIVOT_TOL_ENV`] from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SolverConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup(STRICT_ENV) {
            config.strict = matches!(v.trim(), "1" | "true" | "TRUE" | "True");
        }

        if let Some(v) = lookup(PIVOT_TOL_ENV) {
            match v.trim().parse::<f64>() {
                Ok(tol) if tol >= 0.0 => config.pivot_tolerance = tol,
                _ => tracing::warn!(
                    variable = PIVOT_TOL_ENV,
                    value = %v,
                    "ignoring invalid pivot tolerance"
                ),
            }
        }

        config
    }

    /// `true` when strict mode is on and `pivot` does not clear the tolerance.
    #[inline]
    pub(crate) fn is_degenerate<T: Float>(&self, pivot: T) -> bool {
        if !self.strict {
            return false;
        }
        let tol = T::from(self.pivot_tolerance).unwrap_or_else(T::zero);
        pivot.is_nan() || pivot.abs() <= tol
    }
}
