//! Strided vector views over dense matrices, and direct linear-system solvers built on them.
//!
//! The crate is organised leaf-first:
//!
//! # Core Types
//!
//! - [`StridedVec`] / [`StridedVecMut`]: Zero-copy views over a buffer with a fixed element
//!   stride. A matrix row is a stride-1 view, a matrix column is a stride-`cols` view.
//! - [`Vector`]: Owned, heap-allocated vector.
//! - [`Matrix`] / [`MatrixRef`] / [`MatrixMut`]: Row-major dense matrix, owned or borrowed.
//! - [`Block2`] / [`Vec2`]: Fixed 2x2 blocks and 2-vectors for the block solver.
//!
//! # Solvers
//!
//! - [`solve_dense`] / [`DenseSolver`]: Gaussian elimination with partial pivoting. Rows are
//!   never moved; a permutation array redirects logical rows to physical rows.
//! - [`Tridiagonal::solve_in_place`]: Thomas algorithm, O(n), destructive.
//! - [`BlockTridiagonal::solve_in_place`]: Thomas algorithm over 2x2 blocks using the
//!   closed-form 2x2 inverse.
//!
//! # Diagnostics and configuration
//!
//! - [`Reporter`]: Injected diagnostic sink. [`TracingReporter`] forwards to `tracing`,
//!   [`CaptureReporter`] records diagnostics for inspection.
//! - [`SolverConfig`]: Strict mode turns zero pivots into [`LinalgError::Degenerate`]
//!   instead of silently producing `inf`/`NaN`.
//! - [`Linalg`]: Context bundling a reporter and a config.
//!
//! # Example
//!
//! ```rust
//! use strided_linsolve::{DenseSolver, Matrix, SolverConfig, Tridiagonal, Vector};
//!
//! let a = Matrix::from_vec(vec![2.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 2.0], 3, 3).unwrap();
//! let b = Vector::from_vec(vec![3.0, 5.0, 3.0]).unwrap();
//! let mut y: Vector<f64> = Vector::zeros(3).unwrap();
//!
//! let mut solver = DenseSolver::new(3).unwrap();
//! solver.solve(&a.view(), &b.view(), &mut y.view_mut()).unwrap();
//! assert!((y[1] - 1.0).abs() < 1e-12);
//!
//! let mut t = Tridiagonal::from_bands(&[0.0, 1.0, 1.0], &[2.0, 3.0, 2.0], &[1.0, 1.0, 0.0])
//!     .unwrap();
//! let mut x: Vector<f64> = Vector::from_vec(vec![3.0, 5.0, 3.0]).unwrap();
//! t.solve_in_place(&mut x.view_mut(), &SolverConfig::default()).unwrap();
//! assert!((x[2] - 1.0).abs() < 1e-12);
//! ```

mod block;
pub mod config;
pub mod context;
pub mod dense;
pub mod diag;
mod matrix;
pub mod ops;
pub mod tridiagonal;
mod vector;
pub mod view;

use std::fmt;

// ============================================================================
// Views and owned storage
// ============================================================================
pub use matrix::{Matrix, MatrixMut, MatrixRef};
pub use vector::Vector;
pub use view::{StridedIter, StridedVec, StridedVecMut};

// ============================================================================
// Solvers
// ============================================================================
pub use block::{Block2, BlockTridiagonal, Vec2};
pub use dense::{solve_dense, DenseSolver};
pub use tridiagonal::Tridiagonal;

// ============================================================================
// Diagnostics, configuration, context
// ============================================================================
pub use config::SolverConfig;
pub use context::Linalg;
pub use diag::{CaptureReporter, Diagnostic, NullReporter, Reporter, Severity, TracingReporter};

// ============================================================================
// Error types
// ============================================================================

/// Matrix axis named in out-of-bounds errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Col,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Col => f.write_str("col"),
        }
    }
}

/// Errors that can occur during view construction, arithmetic and solves.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinalgError {
    /// Operand or output shapes disagree.
    #[error("{op}: shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        op: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Matrix is not square when a square matrix was required.
    #[error("non-square matrix: rows={rows}, cols={cols}")]
    NotSquare { rows: usize, cols: usize },

    /// Vector index exceeds the view length.
    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds { index: usize, len: usize },

    /// Matrix index exceeds the extent of one axis.
    #[error("{axis} index {index} out of bounds for {len} {axis}s")]
    MatrixOutOfBounds { axis: Axis, index: usize, len: usize },

    /// A zero-sized vector or matrix was requested.
    #[error("{op}: invalid zero-sized dimension requested")]
    ZeroDimension { op: &'static str },

    /// The operand holds no elements (freed, or a reduction over nothing).
    #[error("{op}: operand is empty")]
    Empty { op: &'static str },

    /// An argument is outside the operation's domain.
    #[error("{op}: {reason}")]
    InvalidArgument { op: &'static str, reason: String },

    /// Zero or near-zero pivot, denominator or 2x2 determinant (strict mode only).
    #[error("{op}: degenerate pivot at index {index}")]
    Degenerate { op: &'static str, index: usize },
}

impl LinalgError {
    /// Severity used when the error is routed through a [`Reporter`].
    pub fn severity(&self) -> Severity {
        match self {
            LinalgError::Empty { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub(crate) fn shape(
        op: &'static str,
        expected: impl Into<Vec<usize>>,
        found: impl Into<Vec<usize>>,
    ) -> Self {
        LinalgError::ShapeMismatch {
            op,
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Result type for linear algebra operations.
pub type Result<T> = std::result::Result<T, LinalgError>;
