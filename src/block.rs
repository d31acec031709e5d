//! 2x2 blocks and the block-tridiagonal Thomas algorithm.
//!
//! [`BlockTridiagonal`] is a tridiagonal matrix whose entries are [`Block2`] matrices, so an
//! `n`-block system has `2n` scalar unknowns grouped into [`Vec2`] pairs. Inverses use the
//! closed form `(1/det) [[m11, -m01], [-m10, m00]]`.

use crate::config::SolverConfig;
use crate::matrix::Matrix;
use crate::tridiagonal::Tridiagonal;
use crate::{LinalgError, Result};
use num_traits::Float;
use std::ops::{Add, Mul, Sub};

/// Two-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2<T>(pub [T; 2]);

/// Row-major 2x2 matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Block2<T>(pub [[T; 2]; 2]);

impl<T: Float> Vec2<T> {
    #[inline]
    pub fn new(x0: T, x1: T) -> Self {
        Self([x0, x1])
    }

    #[inline]
    pub fn zeros() -> Self {
        Self([T::zero(); 2])
    }
}

impl<T: Float> Add for Vec2<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self([self.0[0] + rhs.0[0], self.0[1] + rhs.0[1]])
    }
}

impl<T: Float> Sub for Vec2<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self([self.0[0] - rhs.0[0], self.0[1] - rhs.0[1]])
    }
}

impl<T: Float> Block2<T> {
    #[inline]
    pub fn new(m00: T, m01: T, m10: T, m11: T) -> Self {
        Self([[m00, m01], [m10, m11]])
    }

    /// Every entry set to `value`.
    #[inline]
    pub fn filled(value: T) -> Self {
        Self([[value; 2]; 2])
    }

    #[inline]
    pub fn zeros() -> Self {
        Self::filled(T::zero())
    }

    #[inline]
    pub fn identity() -> Self {
        let (o, z) = (T::one(), T::zero());
        Self([[o, z], [z, o]])
    }

    #[inline]
    pub fn determinant(&self) -> T {
        let [[a, b], [c, d]] = self.0;
        a * d - b * c
    }

    /// Closed-form inverse. A singular block yields `inf`/`NaN` entries.
    #[inline]
    pub fn inverse(&self) -> Self {
        let [[a, b], [c, d]] = self.0;
        let det = self.determinant();
        Self([[d / det, -b / det], [-c / det, a / det]])
    }

    /// `self * x`
    #[inline]
    pub fn transform(&self, x: Vec2<T>) -> Vec2<T> {
        let [[a, b], [c, d]] = self.0;
        let [x0, x1] = x.0;
        Vec2([a * x0 + b * x1, c * x0 + d * x1])
    }
}

impl<T: Float> Add for Block2<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let (a, b) = (self.0, rhs.0);
        Self([
            [a[0][0] + b[0][0], a[0][1] + b[0][1]],
            [a[1][0] + b[1][0], a[1][1] + b[1][1]],
        ])
    }
}

impl<T: Float> Sub for Block2<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let (a, b) = (self.0, rhs.0);
        Self([
            [a[0][0] - b[0][0], a[0][1] - b[0][1]],
            [a[1][0] - b[1][0], a[1][1] - b[1][1]],
        ])
    }
}

impl<T: Float> Mul for Block2<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (a, b) = (self.0, rhs.0);
        Self([
            [
                a[0][0] * b[0][0] + a[0][1] * b[1][0],
                a[0][0] * b[0][1] + a[0][1] * b[1][1],
            ],
            [
                a[1][0] * b[0][0] + a[1][1] * b[1][0],
                a[1][0] * b[0][1] + a[1][1] * b[1][1],
            ],
        ])
    }
}

impl<T: Float> Mul<Vec2<T>> for Block2<T> {
    type Output = Vec2<T>;

    #[inline]
    fn mul(self, rhs: Vec2<T>) -> Vec2<T> {
        self.transform(rhs)
    }
}

// ============================================================================
// Block-tridiagonal matrix
// ============================================================================

/// Tridiagonal matrix of 2x2 blocks.
///
/// All four block sequences have length `n`; `sub[0]` and `sup[n-1]` are padding.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockTridiagonal<T> {
    sub: Vec<Block2<T>>,
    diag: Vec<Block2<T>>,
    sup: Vec<Block2<T>>,
    scratch: Vec<Block2<T>>,
}

impl<T: Float> BlockTridiagonal<T> {
    /// `n` blocks per band, every scalar entry set to `value`.
    ///
    /// # Errors
    /// Returns [`LinalgError::ZeroDimension`] if `n == 0`.
    pub fn filled(value: T, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(LinalgError::ZeroDimension {
                op: "BlockTridiagonal::filled",
            });
        }
        let b = Block2::filled(value);
        Ok(Self {
            sub: vec![b; n],
            diag: vec![b; n],
            sup: vec![b; n],
            scratch: vec![Block2::zeros(); n],
        })
    }

    pub fn zeros(n: usize) -> Result<Self> {
        Self::filled(T::zero(), n)
    }

    /// Build from explicit block bands, all of length `n`.
    pub fn from_blocks(sub: &[Block2<T>], diag: &[Block2<T>], sup: &[Block2<T>]) -> Result<Self> {
        const OP: &str = "BlockTridiagonal::from_blocks";
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
            scratch: vec![Block2::zeros(); n],
        })
    }

    /// Group a scalar tridiagonal system of even size `2m` into `m` 2x2 blocks.
    ///
    /// Unknowns `2i` and `2i+1` form block `i`. Solving the result with right-hand side
    /// pairs `[b[2i], b[2i+1]]` gives the same solution as the scalar system.
    ///
    /// # Errors
    /// - [`LinalgError::Empty`] if `t` has been freed
    /// - [`LinalgError::InvalidArgument`] if `t.len()` is odd
    pub fn from_scalar(t: &Tridiagonal<T>) -> Result<Self> {
        const OP: &str = "BlockTridiagonal::from_scalar";
        if t.is_empty() {
            return Err(LinalgError::Empty { op: OP });
        }
        if t.len() % 2 != 0 {
            return Err(LinalgError::InvalidArgument {
                op: OP,
                reason: format!("scalar size {} is not even", t.len()),
            });
        }
        let (sub, diag, sup) = (t.subdiagonal(), t.diagonal(), t.superdiagonal());
        let z = T::zero();
        let m = t.len() / 2;

        let mut out = Self::zeros(m)?;
        for i in 0..m {
            let (r0, r1) = (2 * i, 2 * i + 1);
            out.diag[i] = Block2::new(diag[r0], sup[r0], sub[r1], diag[r1]);
            // Row 2i couples back to unknown 2i-1, the second entry of block i-1.
            out.sub[i] = Block2::new(z, sub[r0], z, z);
            // Row 2i+1 couples forward to unknown 2i+2, the first entry of block i+1.
            out.sup[i] = Block2::new(z, z, sup[r1], z);
        }
        out.sub[0] = Block2::zeros();
        out.sup[m - 1] = Block2::zeros();
        Ok(out)
    }
}

impl<T> BlockTridiagonal<T> {
    /// Number of block rows. Zero after [`BlockTridiagonal::free`].
    #[inline]
    pub fn len(&self) -> usize {
        self.diag.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diag.is_empty()
    }

    pub fn subdiagonal(&self) -> &[Block2<T>] {
        &self.sub
    }

    pub fn diagonal(&self) -> &[Block2<T>] {
        &self.diag
    }

    pub fn superdiagonal(&self) -> &[Block2<T>] {
        &self.sup
    }

    pub fn subdiagonal_mut(&mut self) -> &mut [Block2<T>] {
        &mut self.sub
    }

    pub fn diagonal_mut(&mut self) -> &mut [Block2<T>] {
        &mut self.diag
    }

    pub fn superdiagonal_mut(&mut self) -> &mut [Block2<T>] {
        &mut self.sup
    }

    /// Release all four block sequences. Safe to call repeatedly.
    pub fn free(&mut self) {
        self.sub = Vec::new();
        self.diag = Vec::new();
        self.sup = Vec::new();
        self.scratch = Vec::new();
    }

    fn check_rhs(&self, op: &'static str, len: usize) -> Result<usize> {
        if self.is_empty() {
            return Err(LinalgError::Empty { op });
        }
        if len != self.len() {
            return Err(LinalgError::shape(op, [self.len()], [len]));
        }
        Ok(self.len())
    }
}

impl<T: Float> BlockTridiagonal<T> {
    /// Block matrix-vector product `y = A x`.
    pub fn transform(&self, x: &[Vec2<T>], y: &mut [Vec2<T>]) -> Result<()> {
        const OP: &str = "BlockTridiagonal::transform";
        let n = self.check_rhs(OP, x.len())?;
        self.check_rhs(OP, y.len())?;
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

    /// Expand into a dense `2n x 2n` matrix.
    pub fn to_dense(&self) -> Result<Matrix<T>> {
        let n = self.check_rhs("BlockTridiagonal::to_dense", self.len())?;
        Matrix::from_fn(2 * n, 2 * n, |r, c| {
            let (bi, bj) = (r / 2, c / 2);
            let block = if bi == bj {
                self.diag[bi]
            } else if bj + 1 == bi {
                self.sub[bi]
            } else if bi + 1 == bj {
                self.sup[bi]
            } else {
                return T::zero();
            };
            block.0[r % 2][c % 2]
        })
    }

    /// Solve `A x' = x` with the block Thomas algorithm, overwriting `x`.
    ///
    /// # Errors
    /// - [`LinalgError::Empty`] on a freed matrix
    /// - [`LinalgError::ShapeMismatch`] if `x.len() != n`; `x` is untouched
    /// - [`LinalgError::Degenerate`] in strict mode when a diagonal factor's determinant does
    ///   not clear the tolerance. `x` may then be partially overwritten.
    pub fn solve_in_place(&mut self, x: &mut [Vec2<T>], config: &SolverConfig) -> Result<()> {
        const OP: &str = "BlockTridiagonal::solve_in_place";
        let n = self.check_rhs(OP, x.len())?;

        tracing::trace!(blocks = n, strict = config.strict, "block tridiagonal solve");

        let inverse_of = |factor: Block2<T>, index: usize| -> Result<Block2<T>> {
            if config.is_degenerate(factor.determinant()) {
                return Err(LinalgError::Degenerate { op: OP, index });
            }
            Ok(factor.inverse())
        };

        let inv = inverse_of(self.diag[0], 0)?;
        self.scratch[0] = inv * self.sup[0];
        x[0] = inv * x[0];

        for i in 1..n {
            let factor = self.diag[i] - self.sub[i] * self.scratch[i - 1];
            let inv = inverse_of(factor, i)?;
            if i + 1 < n {
                self.scratch[i] = inv * self.sup[i];
            }
            x[i] = inv * (x[i] - self.sub[i] * x[i - 1]);
        }

        for i in (0..n - 1).rev() {
            x[i] = x[i] - self.scratch[i] * x[i + 1];
        }

        Ok(())
    }
}
