//! A reporting context around the solvers.
//!
//! The plain functions and methods of this crate return [`LinalgError`] and log nothing.
//! [`Linalg`] wraps them so that every failure is also routed, exactly once, through an
//! injected [`Reporter`], located at the caller's source line.

use crate::block::{BlockTridiagonal, Vec2};
use crate::config::SolverConfig;
use crate::dense;
use crate::diag::{Diagnostic, Reporter, TracingReporter};
use crate::matrix::{MatrixMut, MatrixRef};
use crate::tridiagonal::Tridiagonal;
use crate::view::{StridedVec, StridedVecMut};
use crate::{LinalgError, Result};
use num_traits::Float;

/// Reporter plus solver configuration.
///
/// ```rust
/// use strided_linsolve::{CaptureReporter, Linalg, Severity, Vector};
/// use strided_linsolve::ops;
///
/// let capture = CaptureReporter::new();
/// let la = Linalg::with_reporter(&capture);
///
/// let a = Vector::from_vec(vec![1.0, 2.0, 3.0]).unwrap();
/// let b = Vector::from_vec(vec![1.0, 2.0]).unwrap();
/// let mut out = Vector::zeros(3).unwrap();
///
/// let res = la.check("vec_add", ops::vec_add(&a.view(), &b.view(), &mut out.view_mut()));
/// assert!(res.is_err());
/// assert_eq!(capture.len(), 1);
/// assert_eq!(capture.diagnostics()[0].severity, Severity::Error);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Linalg<R: Reporter = TracingReporter> {
    reporter: R,
    config: SolverConfig,
}

impl Linalg<TracingReporter> {
    /// Default configuration, diagnostics sent to `tracing`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration from [`SolverConfig::from_env`], diagnostics sent to `tracing`.
    pub fn from_env() -> Self {
        Self {
            reporter: TracingReporter,
            config: SolverConfig::from_env(),
        }
    }
}

impl<R: Reporter> Linalg<R> {
    pub fn with_reporter(reporter: R) -> Self {
        Self {
            reporter,
            config: SolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    #[inline]
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Report `result` if it is an error, then hand it back unchanged.
    #[track_caller]
    pub fn check<T>(&self, op: &'static str, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.report(op, err);
        }
        result
    }

    #[track_caller]
    fn report(&self, op: &'static str, err: &LinalgError) {
        self.reporter.report(&Diagnostic::from_error(op, err));
    }

    /// [`dense::solve_dense`] with this context's configuration.
    #[track_caller]
    pub fn solve_dense<T: Float>(
        &self,
        a: &MatrixRef<'_, T>,
        x: &StridedVec<'_, T>,
        scratch: &mut MatrixMut<'_, T>,
        order: &mut [usize],
        y: &mut StridedVecMut<'_, T>,
    ) -> Result<()> {
        self.check(
            "solve_dense",
            dense::solve_dense(a, x, scratch, order, y, &self.config),
        )
    }

    /// [`Tridiagonal::solve_in_place`] with this context's configuration.
    #[track_caller]
    pub fn solve_tridiagonal<T: Float>(
        &self,
        a: &mut Tridiagonal<T>,
        x: &mut StridedVecMut<'_, T>,
    ) -> Result<()> {
        self.check("solve_tridiagonal", a.solve_in_place(x, &self.config))
    }

    /// [`BlockTridiagonal::solve_in_place`] with this context's configuration.
    #[track_caller]
    pub fn solve_block_tridiagonal<T: Float>(
        &self,
        a: &mut BlockTridiagonal<T>,
        x: &mut [Vec2<T>],
    ) -> Result<()> {
        self.check("solve_block_tridiagonal", a.solve_in_place(x, &self.config))
    }
}
