//! Scalar tridiagonal matrices and the Thomas algorithm.
//!
//! A [`Tridiagonal`] of size `n` stores its three bands as length-`n` vectors. Row `i`
//! reads `sub[i] * x[i-1] + diag[i] * x[i] + sup[i] * x[i+1]`, so `sub[0]` and `sup[n-1]`
//! are padding and never read.

use crate::config::SolverConfig;
use crate::matrix::Matrix;
use crate::view::{StridedVec, StridedVecMut};
use crate::{LinalgError, Result};
use num_traits::Float;

/// Tridiagonal matrix with a scratch band for the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct Tridiagonal<T> {
    sub: Vec<T>,
    diag: Vec<T>,
    sup: Vec<T>,
    scratch: Vec<T>,
}

impl<T: Float> Tridiagonal<T> {
    /// Allocate an `n x n` tridiagonal matrix with every band entry set to `value`.
    ///
    /// # Errors
    /// Returns [`LinalgError::ZeroDimension`] if `n == 0`.
    pub fn filled(value: T, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(LinalgError::ZeroDimension {
                op: "Tridiagonal::filled",
            });
        }
        Ok(Self {
            sub: vec![value; n],
            diag: vec![value; n],
            sup: vec![value; n],
            scratch: vec![T::zero(); n],
        })
    }

    pub fn zeros(n: usize) -> Result<Self> {
        Self::filled(T::zero(), n)
    }

    /// Build from explicit bands, all of length `n`.
    ///
    /// # Errors
    /// - [`LinalgError::ZeroDimension`] if `diag` is empty
    /// - [`LinalgError::ShapeMismatch`] if `sub` or `sup` differ in length from `diag`
    pub fn from_bands(sub: &[T], diag: &[T], sup: &[T]) -> Result<Self> {
        const OP: &str = "Tridiagonal::from_bands";
        let n = diag.len();
        if n == 0 {
            return Err(LinalgError::ZeroDimension { op: OP });
        }
        for band in [sub, sup] {
            if band.len() != n {
                return Err(LinalgError::shape(OP, [n], [band.len()]));
            }
        }
        Ok(Self {
            sub: sub.to_vec(),
            diag: diag.to_vec(),
            sup: sup.to_vec(),
            scratch: vec![T::zero(); n],
        })
    }
}

impl<T> Tridiagonal<T> {
    /// Number of rows. Zero after [`Tridiagonal::free`].
    #[inline]
    pub fn len(&self) -> usize {
        self.diag.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diag.is_empty()
    }

    pub fn subdiagonal(&self) -> &[T] {
        &self.sub
    }

    pub fn diagonal(&self) -> &[T] {
        &self.diag
    }

    pub fn superdiagonal(&self) -> &[T] {
        &self.sup
    }

    pub fn subdiagonal_mut(&mut self) -> &mut [T] {
        &mut self.sub
    }

    pub fn diagonal_mut(&mut self) -> &mut [T] {
        &mut self.diag
    }

    pub fn superdiagonal_mut(&mut self) -> &mut [T] {
        &mut self.sup
    }

    /// Release all four bands. Safe to call repeatedly.
    pub fn free(&mut self) {
        self.sub = Vec::new();
        self.diag = Vec::new();
        self.sup = Vec::new();
        self.scratch = Vec::new();
    }

    fn ensure_live(&self, op: &'static str) -> Result<usize> {
        if self.is_empty() {
            return Err(LinalgError::Empty { op });
        }
        Ok(self.len())
    }

    fn ensure_same_len(&self, op: &'static str, found: usize) -> Result<()> {
        if found != self.len() {
            return Err(LinalgError::shape(op, [self.len()], [found]));
        }
        Ok(())
    }
}

impl<T: Float> Tridiagonal<T> {
    fn zip_bands_into(
        &self,
        op: &'static str,
        other: &Self,
        out: &mut Self,
        f: impl Fn(T, T) -> T,
    ) -> Result<()> {
        self.ensure_live(op)?;
        self.ensure_same_len(op, other.len())?;
        self.ensure_same_len(op, out.len())?;
        let bands = [
            (&self.sub, &other.sub, &mut out.sub),
            (&self.diag, &other.diag, &mut out.diag),
            (&self.sup, &other.sup, &mut out.sup),
        ];
        for (a, b, dst) in bands {
            for ((o, &x), &y) in dst.iter_mut().zip(a).zip(b) {
                *o = f(x, y);
            }
        }
        Ok(())
    }

    /// `out = self + other`, band by band.
    pub fn add_into(&self, other: &Self, out: &mut Self) -> Result<()> {
        self.zip_bands_into("Tridiagonal::add_into", other, out, |x, y| x + y)
    }

    /// `out = self - other`, band by band.
    pub fn sub_into(&self, other: &Self, out: &mut Self) -> Result<()> {
        self.zip_bands_into("Tridiagonal::sub_into", other, out, |x, y| x - y)
    }

    /// `out = s * self`.
    pub fn scale_into(&self, s: T, out: &mut Self) -> Result<()> {
        const OP: &str = "Tridiagonal::scale_into";
        self.ensure_live(OP)?;
        self.ensure_same_len(OP, out.len())?;
        let bands = [
            (&self.sub, &mut out.sub),
            (&self.diag, &mut out.diag),
            (&self.sup, &mut out.sup),
        ];
        for (a, dst) in bands {
            for (o, &x) in dst.iter_mut().zip(a) {
                *o = s * x;
            }
        }
        Ok(())
    }

    /// `diag[i] += d[i]`
    pub fn add_diagonal(&mut self, d: &StridedVec<'_, T>) -> Result<()> {
        self.update_diagonal("Tridiagonal::add_diagonal", d, |x, y| x + y)
    }

    /// `diag[i] -= d[i]`
    pub fn sub_diagonal(&mut self, d: &StridedVec<'_, T>) -> Result<()> {
        self.update_diagonal("Tridiagonal::sub_diagonal", d, |x, y| x - y)
    }

    fn update_diagonal(
        &mut self,
        op: &'static str,
        d: &StridedVec<'_, T>,
        f: impl Fn(T, T) -> T,
    ) -> Result<()> {
        self.ensure_live(op)?;
        self.ensure_same_len(op, d.len())?;
        for (o, &v) in self.diag.iter_mut().zip(d.iter()) {
            *o = f(*o, v);
        }
        Ok(())
    }

    /// Expand into a dense `n x n` matrix.
    pub fn to_dense(&self) -> Result<Matrix<T>> {
        let n = self.ensure_live("Tridiagonal::to_dense")?;
        Matrix::from_fn(n, n, |r, c| {
            if r == c {
                self.diag[r]
            } else if c + 1 == r {
                self.sub[r]
            } else if r + 1 == c {
                self.sup[r]
            } else {
                T::zero()
            }
        })
    }

    /// Matrix-vector product `y = A x`.
    pub fn transform(&self, x: &StridedVec<'_, T>, y: &mut StridedVecMut<'_, T>) -> Result<()> {
        const OP: &str = "Tridiagonal::transform";
        let n = self.ensure_live(OP)?;
        self.ensure_same_len(OP, x.len())?;
        self.ensure_same_len(OP, y.len())?;
        for i in 0..n {
            let mut acc = self.diag[i] * x[i];
            if i > 0 {
                acc = acc + self.sub[i] * x[i - 1];
            }
            if i + 1 < n {
                acc = acc + self.sup[i] * x[i + 1];
            }
            y[i] = acc;
        }
        Ok(())
    }

    /// Solve `A x' = x` with the Thomas algorithm, overwriting `x` with the solution.
    ///
    /// No pivoting is performed, so the matrix should be diagonally dominant or otherwise
    /// known to be stable. The bands are not modified; the scratch band is.
    ///
    /// # Errors
    /// - [`LinalgError::Empty`] on a freed matrix
    /// - [`LinalgError::ShapeMismatch`] if `x.len() != n`; `x` is untouched
    /// - [`LinalgError::Degenerate`] in strict mode when a denominator does not clear the
    ///   tolerance. `x` may then be partially overwritten.
    pub fn solve_in_place(
        &mut self,
        x: &mut StridedVecMut<'_, T>,
        config: &SolverConfig,
    ) -> Result<()> {
        const OP: &str = "Tridiagonal::solve_in_place";
        let n = self.ensure_live(OP)?;
        self.ensure_same_len(OP, x.len())?;

        tracing::trace!(n, strict = config.strict, "tridiagonal solve");

        let d0 = self.diag[0];
        if config.is_degenerate(d0) {
            return Err(LinalgError::Degenerate { op: OP, index: 0 });
        }
        self.scratch[0] = self.sup[0] / d0;
        x[0] = x[0] / d0;

        for i in 1..n {
            let denom = self.diag[i] - self.sub[i] * self.scratch[i - 1];
            if config.is_degenerate(denom) {
                return Err(LinalgError::Degenerate { op: OP, index: i });
            }
            if i + 1 < n {
                self.scratch[i] = self.sup[i] / denom;
            }
            x[i] = (x[i] - self.sub[i] * x[i - 1]) / denom;
        }

        for i in (0..n - 1).rev() {
            x[i] = x[i] - self.scratch[i] * x[i + 1];
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tri3() -> Tridiagonal<f64> {
        Tridiagonal::from_bands(&[0.0, 1.0, 1.0], &[2.0, 3.0, 2.0], &[1.0, 1.0, 0.0]).unwrap()
    }

    #[test]
    fn test_solve_known_system() {
        let mut t = tri3();
        let mut x = [3.0, 5.0, 3.0];
        t.solve_in_place(
            &mut StridedVecMut::contiguous(&mut x),
            &SolverConfig::default(),
        )
        .unwrap();
        for v in x {
            assert_relative_eq!(v, 1.0, epsilon = 1e-12);
        }
        // Bands survive the solve.
        assert_eq!(t.diagonal(), &[2.0, 3.0, 2.0]);
    }

    #[test]
    fn test_solve_single_row() {
        let mut t = Tridiagonal::filled(4.0, 1).unwrap();
        let mut x = [2.0];
        t.solve_in_place(
            &mut StridedVecMut::contiguous(&mut x),
            &SolverConfig::default(),
        )
        .unwrap();
        assert_eq!(x, [0.5]);
    }

    #[test]
    fn test_solve_into_matrix_column() {
        let mut t = tri3();
        let mut m = Matrix::from_vec(vec![3.0, 0.0, 5.0, 0.0, 3.0, 0.0], 3, 2).unwrap();
        t.solve_in_place(&mut m.col_mut(0).unwrap(), &SolverConfig::default())
            .unwrap();
        for r in 0..3 {
            assert_relative_eq!(m.get(r, 0).unwrap(), 1.0, epsilon = 1e-12);
            assert_eq!(m.get(r, 1).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_dense_round_trip() {
        let t = tri3();
        let dense = t.to_dense().unwrap();
        assert_eq!(
            dense.as_slice(),
            &[2.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 2.0]
        );

        let mut y = [0.0; 3];
        t.transform(
            &StridedVec::contiguous(&[1.0, 2.0, 3.0]),
            &mut StridedVecMut::contiguous(&mut y),
        )
        .unwrap();
        assert_eq!(y, [4.0, 10.0, 8.0]);
    }

    #[test]
    fn test_band_arithmetic() {
        let a = tri3();
        let b = Tridiagonal::filled(1.0, 3).unwrap();
        let mut out = Tridiagonal::zeros(3).unwrap();

        a.add_into(&b, &mut out).unwrap();
        assert_eq!(out.diagonal(), &[3.0, 4.0, 3.0]);
        a.sub_into(&b, &mut out).unwrap();
        assert_eq!(out.subdiagonal(), &[-1.0, 0.0, 0.0]);
        a.scale_into(2.0, &mut out).unwrap();
        assert_eq!(out.superdiagonal(), &[2.0, 2.0, 0.0]);

        out.add_diagonal(&StridedVec::contiguous(&[1.0, 1.0, 1.0]))
            .unwrap();
        assert_eq!(out.diagonal(), &[5.0, 7.0, 5.0]);
        out.sub_diagonal(&StridedVec::contiguous(&[5.0, 7.0, 5.0]))
            .unwrap();
        assert_eq!(out.diagonal(), &[0.0, 0.0, 0.0]);

        let mut small = Tridiagonal::zeros(2).unwrap();
        assert!(a.add_into(&b, &mut small).is_err());
        assert_eq!(small, Tridiagonal::zeros(2).unwrap());
    }

    #[test]
    fn test_shape_mismatch_leaves_rhs() {
        let mut t = tri3();
        let mut x = [1.0, 2.0];
        let err = t
            .solve_in_place(
                &mut StridedVecMut::contiguous(&mut x),
                &SolverConfig::default(),
            )
            .unwrap_err();
        assert_eq!(err, LinalgError::shape("Tridiagonal::solve_in_place", [3], [2]));
        assert_eq!(x, [1.0, 2.0]);
    }

    #[test]
    fn test_zero_pivot_modes() {
        let mut t = Tridiagonal::from_bands(&[0.0, 1.0], &[0.0, 1.0], &[1.0, 0.0]).unwrap();
        let mut x = [1.0, 1.0];
        t.solve_in_place(
            &mut StridedVecMut::contiguous(&mut x),
            &SolverConfig::default(),
        )
        .unwrap();
        assert!(x.iter().any(|v| !v.is_finite()));

        let mut x = [1.0, 1.0];
        let err = t
            .solve_in_place(
                &mut StridedVecMut::contiguous(&mut x),
                &SolverConfig::new().strict(true),
            )
            .unwrap_err();
        assert_eq!(
            err,
            LinalgError::Degenerate {
                op: "Tridiagonal::solve_in_place",
                index: 0
            }
        );
    }

    #[test]
    fn test_free() {
        let mut t = tri3();
        t.free();
        assert_eq!(t.len(), 0);
        t.free();
        assert!(t.is_empty());

        let mut x = [1.0];
        assert_eq!(
            t.solve_in_place(
                &mut StridedVecMut::contiguous(&mut x),
                &SolverConfig::default()
            )
            .unwrap_err(),
            LinalgError::Empty {
                op: "Tridiagonal::solve_in_place"
            }
        );
        assert!(Tridiagonal::<f64>::zeros(0).is_err());
    }
}
