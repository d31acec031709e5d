//! Dense Gaussian elimination with partial pivoting.
//!
//! The system `A y = x` is copied into an augmented `n x (n+1)` scratch matrix `[A | x]`.
//! Rows are never moved: `order[i]` names the physical scratch row that plays logical row
//! `i`, and pivoting swaps entries of `order` instead of row contents.
//!
//! [`solve_dense`] borrows the scratch and permutation buffers from the caller;
//! [`DenseSolver`] owns them and can be reused for any number of solves of the same size.

use crate::config::SolverConfig;
use crate::matrix::{Matrix, MatrixMut, MatrixRef};
use crate::vector::Vector;
use crate::view::{StridedVec, StridedVecMut};
use crate::{LinalgError, Result};
use num_traits::Float;

const OP: &str = "solve_dense";

fn validate<T>(
    a: &MatrixRef<'_, T>,
    x: &StridedVec<'_, T>,
    scratch: &MatrixMut<'_, T>,
    order: &[usize],
    y: &StridedVecMut<'_, T>,
) -> Result<usize> {
    if a.is_empty() {
        return Err(LinalgError::Empty { op: OP });
    }
    if a.rows() != a.cols() {
        return Err(LinalgError::NotSquare {
            rows: a.rows(),
            cols: a.cols(),
        });
    }
    let n = a.rows();
    if scratch.shape() != [n, n + 1] {
        return Err(LinalgError::shape(OP, [n, n + 1], scratch.shape()));
    }
    for len in [x.len(), order.len(), y.len()] {
        if len != n {
            return Err(LinalgError::shape(OP, [n], [len]));
        }
    }
    Ok(n)
}

/// Solve `A y = x` by Gaussian elimination with partial pivoting.
///
/// # Arguments
/// - `a`: Square `n x n` coefficient matrix (not modified)
/// - `x`: Right-hand side, length `n`
/// - `scratch`: Augmented working matrix of shape `n x (n+1)`, overwritten
/// - `order`: Row permutation of length `n`, overwritten; a permutation of `0..n` on return
/// - `y`: Solution output, length `n`
///
/// On each pivot column the candidate with the largest magnitude wins (the first one on
/// ties). A column whose candidates are all zero is skipped. With the default
/// configuration a singular system then yields `inf`/`NaN` in `y`.
///
/// # Errors
/// - [`LinalgError::NotSquare`] if `a` is not square
/// - [`LinalgError::ShapeMismatch`] if `scratch`, `x`, `order` or `y` have the wrong size
/// - [`LinalgError::Degenerate`] in strict mode, when a pivot column has no usable pivot or a
///   back-substitution divisor does not clear the tolerance. `y` is not written in that case.
///
/// Shape checks run before anything is written.
pub fn solve_dense<T: Float>(
    a: &MatrixRef<'_, T>,
    x: &StridedVec<'_, T>,
    scratch: &mut MatrixMut<'_, T>,
    order: &mut [usize],
    y: &mut StridedVecMut<'_, T>,
    config: &SolverConfig,
) -> Result<()> {
    let n = validate(a, x, scratch, order, y)?;
    let w = n + 1;
    let aug = scratch.as_mut_slice();

    tracing::trace!(n, strict = config.strict, "dense solve");

    for ((i, row), src) in aug
        .chunks_exact_mut(w)
        .enumerate()
        .zip(a.as_slice().chunks_exact(n))
    {
        row[..n].copy_from_slice(src);
        row[n] = x[i];
    }
    for (i, o) in order.iter_mut().enumerate() {
        *o = i;
    }

    // Forward elimination. `h` is the next logical pivot row; it lags `k` once a column
    // has been skipped.
    let mut h = 0;
    for k in 0..n {
        let mut pivot = h;
        let mut best = aug[order[h] * w + k].abs();
        for i in h + 1..n {
            let v = aug[order[i] * w + k].abs();
            if v > best {
                best = v;
                pivot = i;
            }
        }

        if config.is_degenerate(best) {
            return Err(LinalgError::Degenerate { op: OP, index: k });
        }
        if best.is_zero() {
            tracing::debug!(column = k, row = h, "no pivot in column, skipping");
            continue;
        }

        order.swap(h, pivot);
        let p = order[h] * w;
        for &r in &order[h + 1..] {
            let r = r * w;
            let f = aug[r + k] / aug[p + k];
            aug[r + k] = T::zero();
            for j in k + 1..w {
                aug[r + j] = aug[r + j] - aug[p + j] * f;
            }
        }
        h += 1;
    }

    if config.strict {
        for (i, &r) in order.iter().enumerate() {
            if config.is_degenerate(aug[r * w + i]) {
                return Err(LinalgError::Degenerate { op: OP, index: i });
            }
        }
    }

    for i in (0..n).rev() {
        let r = order[i] * w;
        let mut acc = aug[r + n];
        for j in i + 1..n {
            acc = acc - aug[r + j] * y[j];
        }
        y[i] = acc / aug[r + i];
    }

    Ok(())
}

/// Reusable dense solver owning its augmented scratch matrix and permutation.
///
/// ```rust
/// use strided_linsolve::{DenseSolver, Matrix, Vector};
///
/// let a = Matrix::from_vec(vec![0.0, 1.0, 1.0, 0.0], 2, 2).unwrap();
/// let b = Vector::from_vec(vec![2.0, 3.0]).unwrap();
///
/// let mut solver = DenseSolver::new(2).unwrap();
/// let y = solver.solve_alloc(&a.view(), &b.view()).unwrap();
/// assert_eq!(y.as_slice(), &[3.0, 2.0]);
/// assert_eq!(solver.order(), &[1, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct DenseSolver<T> {
    scratch: Matrix<T>,
    order: Vec<usize>,
    config: SolverConfig,
}

impl<T: Float> DenseSolver<T> {
    /// Allocate buffers for `n x n` systems.
    ///
    /// # Errors
    /// Returns [`LinalgError::ZeroDimension`] if `n == 0`.
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(LinalgError::ZeroDimension {
                op: "DenseSolver::new",
            });
        }
        let cols = n.checked_add(1).ok_or_else(|| LinalgError::InvalidArgument {
            op: "DenseSolver::new",
            reason: format!("system size {n} overflows usize"),
        })?;
        Ok(Self {
            scratch: Matrix::zeros(n, cols)?,
            order: (0..n).collect(),
            config: SolverConfig::default(),
        })
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// System size this solver was allocated for.
    #[inline]
    pub fn dim(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Row permutation chosen by the last solve.
    #[inline]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Solve `A y = x` into `y`. See [`solve_dense`].
    pub fn solve(
        &mut self,
        a: &MatrixRef<'_, T>,
        x: &StridedVec<'_, T>,
        y: &mut StridedVecMut<'_, T>,
    ) -> Result<()> {
        solve_dense(
            a,
            x,
            &mut self.scratch.view_mut(),
            &mut self.order,
            y,
            &self.config,
        )
    }

    /// Solve `A y = x` into a freshly allocated vector.
    pub fn solve_alloc(&mut self, a: &MatrixRef<'_, T>, x: &StridedVec<'_, T>) -> Result<Vector<T>> {
        let mut y = Vector::zeros(self.dim())?;
        self.solve(a, x, &mut y.view_mut())?;
        Ok(y)
    }
}
