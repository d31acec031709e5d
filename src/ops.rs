//! Elementwise arithmetic, reductions and products over strided vectors and matrices.
//!
//! Every operation validates operand and output shapes before touching the output, so a
//! failed call leaves the output exactly as it was. Inputs may be any strided view,
//! including a row or column of a matrix.
//!
//! Reductions over an empty view return [`LinalgError::Empty`].

use crate::matrix::{Matrix, MatrixMut, MatrixRef};
use crate::vector::Vector;
use crate::view::{StridedVec, StridedVecMut};
use crate::{LinalgError, Result};
use num_traits::Float;

// ============================================================================
// Helpers
// ============================================================================

#[inline]
fn ensure_same_len(op: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(LinalgError::shape(op, [expected], [found]));
    }
    Ok(())
}

#[inline]
fn ensure_same_shape(op: &'static str, expected: [usize; 2], found: [usize; 2]) -> Result<()> {
    if expected != found {
        return Err(LinalgError::shape(op, expected, found));
    }
    Ok(())
}

#[inline]
fn ensure_non_empty(op: &'static str, len: usize) -> Result<()> {
    if len == 0 {
        return Err(LinalgError::Empty { op });
    }
    Ok(())
}

fn map_into<T: Copy>(
    op: &'static str,
    out: &mut StridedVecMut<'_, T>,
    a: &StridedVec<'_, T>,
    f: impl Fn(T) -> T,
) -> Result<()> {
    ensure_same_len(op, a.len(), out.len())?;
    for (o, &x) in out.iter_mut().zip(a.iter()) {
        *o = f(x);
    }
    Ok(())
}

fn zip_map2_into<T: Copy>(
    op: &'static str,
    out: &mut StridedVecMut<'_, T>,
    a: &StridedVec<'_, T>,
    b: &StridedVec<'_, T>,
    f: impl Fn(T, T) -> T,
) -> Result<()> {
    ensure_same_len(op, a.len(), b.len())?;
    ensure_same_len(op, a.len(), out.len())?;
    for ((o, &x), &y) in out.iter_mut().zip(a.iter()).zip(b.iter()) {
        *o = f(x, y);
    }
    Ok(())
}

/// Fold a non-empty view starting from its first element.
fn reduce<T: Copy>(
    op: &'static str,
    a: &StridedVec<'_, T>,
    map: impl Fn(T) -> T,
    combine: impl Fn(T, T) -> T,
) -> Result<T> {
    let mut it = a.iter();
    let first = it.next().ok_or(LinalgError::Empty { op })?;
    Ok(it.fold(map(*first), |acc, &x| combine(acc, map(x))))
}

fn len_as<T: Float>(op: &'static str, len: usize) -> Result<T> {
    T::from(len).ok_or_else(|| LinalgError::InvalidArgument {
        op,
        reason: format!("length {len} is not representable"),
    })
}

#[inline]
fn larger<T: Float>(acc: T, x: T) -> T {
    if x > acc {
        x
    } else {
        acc
    }
}

#[inline]
fn smaller<T: Float>(acc: T, x: T) -> T {
    if x < acc {
        x
    } else {
        acc
    }
}

// ============================================================================
// Vector arithmetic
// ============================================================================

/// `out[i] = a[i] + b[i]`
pub fn vec_add<T: Float>(
    a: &StridedVec<'_, T>,
    b: &StridedVec<'_, T>,
    out: &mut StridedVecMut<'_, T>,
) -> Result<()> {
    zip_map2_into("vec_add", out, a, b, |x, y| x + y)
}

/// `out[i] = a[i] - b[i]`
pub fn vec_sub<T: Float>(
    a: &StridedVec<'_, T>,
    b: &StridedVec<'_, T>,
    out: &mut StridedVecMut<'_, T>,
) -> Result<()> {
    zip_map2_into("vec_sub", out, a, b, |x, y| x - y)
}

/// `out[i] = s * a[i]`
pub fn vec_scale<T: Float>(
    s: T,
    a: &StridedVec<'_, T>,
    out: &mut StridedVecMut<'_, T>,
) -> Result<()> {
    map_into("vec_scale", out, a, |x| s * x)
}

/// `out[i] = a[i] / s`
pub fn vec_rscale<T: Float>(
    s: T,
    a: &StridedVec<'_, T>,
    out: &mut StridedVecMut<'_, T>,
) -> Result<()> {
    map_into("vec_rscale", out, a, |x| x / s)
}

/// `out[i] = exp(a[i])`
pub fn vec_exp<T: Float>(a: &StridedVec<'_, T>, out: &mut StridedVecMut<'_, T>) -> Result<()> {
    map_into("vec_exp", out, a, T::exp)
}

/// Write the unit vector in the direction of `a`.
///
/// # Errors
/// A zero-magnitude input has no direction and returns [`LinalgError::InvalidArgument`].
pub fn vec_normalize<T: Float>(
    a: &StridedVec<'_, T>,
    out: &mut StridedVecMut<'_, T>,
) -> Result<()> {
    ensure_same_len("vec_normalize", a.len(), out.len())?;
    let m = magnitude(a);
    if m.is_zero() {
        return Err(LinalgError::InvalidArgument {
            op: "vec_normalize",
            reason: "zero vector has no direction".into(),
        });
    }
    map_into("vec_normalize", out, a, |x| x / m)
}

/// Dot product. The empty dot product is zero.
pub fn dot<T: Float>(a: &StridedVec<'_, T>, b: &StridedVec<'_, T>) -> Result<T> {
    ensure_same_len("dot", a.len(), b.len())?;
    Ok(a
        .iter()
        .zip(b.iter())
        .fold(T::zero(), |acc, (&x, &y)| acc + x * y))
}

/// Euclidean norm.
pub fn magnitude<T: Float>(a: &StridedVec<'_, T>) -> T {
    a.iter().fold(T::zero(), |acc, &x| acc + x * x).sqrt()
}

/// L_p norm for `p >= 1`. `p = inf` gives the maximum absolute value.
///
/// # Errors
/// Returns [`LinalgError::InvalidArgument`] if `p < 1` or `p` is NaN.
pub fn norm<T: Float>(a: &StridedVec<'_, T>, p: T) -> Result<T> {
    if p.is_nan() || p < T::one() {
        return Err(LinalgError::InvalidArgument {
            op: "norm",
            reason: format!("L_p is not a norm for p = {}", p.to_f64().unwrap_or(f64::NAN)),
        });
    }
    if a.is_empty() {
        return Ok(T::zero());
    }
    if p.is_infinite() {
        return max_abs(a);
    }
    let s = a.iter().fold(T::zero(), |acc, &x| acc + x.abs().powf(p));
    Ok(s.powf(p.recip()))
}

pub fn max<T: Float>(a: &StridedVec<'_, T>) -> Result<T> {
    reduce("max", a, |x| x, larger)
}

pub fn max_abs<T: Float>(a: &StridedVec<'_, T>) -> Result<T> {
    reduce("max_abs", a, T::abs, larger)
}

pub fn min<T: Float>(a: &StridedVec<'_, T>) -> Result<T> {
    reduce("min", a, |x| x, smaller)
}

pub fn min_abs<T: Float>(a: &StridedVec<'_, T>) -> Result<T> {
    reduce("min_abs", a, T::abs, smaller)
}

pub fn sum<T: Float>(a: &StridedVec<'_, T>) -> Result<T> {
    reduce("sum", a, |x| x, |x, y| x + y)
}

pub fn prod<T: Float>(a: &StridedVec<'_, T>) -> Result<T> {
    reduce("prod", a, |x| x, |x, y| x * y)
}

/// `max - min`
pub fn range<T: Float>(a: &StridedVec<'_, T>) -> Result<T> {
    ensure_non_empty("range", a.len())?;
    Ok(max(a)? - min(a)?)
}

/// `(max - min) / min(|max|, |min|)`
///
/// A zero extreme yields `inf` (or `NaN` when the range is also zero).
pub fn range_relative<T: Float>(a: &StridedVec<'_, T>) -> Result<T> {
    ensure_non_empty("range_relative", a.len())?;
    let hi = max(a)?;
    let lo = min(a)?;
    Ok((hi - lo) / smaller(hi.abs(), lo.abs()))
}

/// Mean absolute deviation from the mean: `sum(|a[i] - mean|) / n`.
pub fn mean_abs_deviation<T: Float>(a: &StridedVec<'_, T>) -> Result<T> {
    const OP: &str = "mean_abs_deviation";
    ensure_non_empty(OP, a.len())?;
    let n = len_as::<T>(OP, a.len())?;
    let mean = sum(a)? / n;
    let dev = a.iter().fold(T::zero(), |acc, &x| acc + (x - mean).abs());
    Ok(dev / n)
}

// ============================================================================
// Matrix arithmetic
// ============================================================================

fn zip_mat2_into<T: Copy>(
    op: &'static str,
    out: &mut MatrixMut<'_, T>,
    a: &MatrixRef<'_, T>,
    b: &MatrixRef<'_, T>,
    f: impl Fn(T, T) -> T,
) -> Result<()> {
    ensure_same_shape(op, a.shape(), b.shape())?;
    ensure_same_shape(op, a.shape(), out.shape())?;
    for ((o, &x), &y) in out
        .as_mut_slice()
        .iter_mut()
        .zip(a.as_slice())
        .zip(b.as_slice())
    {
        *o = f(x, y);
    }
    Ok(())
}

/// `out = a + b`
pub fn mat_add<T: Float>(
    a: &MatrixRef<'_, T>,
    b: &MatrixRef<'_, T>,
    out: &mut MatrixMut<'_, T>,
) -> Result<()> {
    zip_mat2_into("mat_add", out, a, b, |x, y| x + y)
}

/// `out = a - b`
pub fn mat_sub<T: Float>(
    a: &MatrixRef<'_, T>,
    b: &MatrixRef<'_, T>,
    out: &mut MatrixMut<'_, T>,
) -> Result<()> {
    zip_mat2_into("mat_sub", out, a, b, |x, y| x - y)
}

/// `out = s * a`
pub fn mat_scale<T: Float>(s: T, a: &MatrixRef<'_, T>, out: &mut MatrixMut<'_, T>) -> Result<()> {
    ensure_same_shape("mat_scale", a.shape(), out.shape())?;
    for (o, &x) in out.as_mut_slice().iter_mut().zip(a.as_slice()) {
        *o = s * x;
    }
    Ok(())
}

/// Copy `src` into `dst`, which must have the same shape.
pub fn mat_copy<T: Copy>(src: &MatrixRef<'_, T>, dst: &mut MatrixMut<'_, T>) -> Result<()> {
    ensure_same_shape("mat_copy", src.shape(), dst.shape())?;
    dst.as_mut_slice().copy_from_slice(src.as_slice());
    Ok(())
}

/// Matrix-vector product `y = a * x`.
///
/// `x` must have `a.cols()` elements and `y` must have `a.rows()`.
pub fn transform<T: Float>(
    a: &MatrixRef<'_, T>,
    x: &StridedVec<'_, T>,
    y: &mut StridedVecMut<'_, T>,
) -> Result<()> {
    ensure_non_empty("transform", a.as_slice().len())?;
    ensure_same_len("transform", a.cols(), x.len())?;
    ensure_same_len("transform", a.rows(), y.len())?;
    for (yi, row) in y.iter_mut().zip(a.as_slice().chunks_exact(a.cols())) {
        *yi = row
            .iter()
            .zip(x.iter())
            .fold(T::zero(), |acc, (&m, &v)| acc + m * v);
    }
    Ok(())
}

/// Allocating form of [`transform`].
pub fn transform_alloc<T: Float>(a: &MatrixRef<'_, T>, x: &StridedVec<'_, T>) -> Result<Vector<T>> {
    ensure_same_len("transform_alloc", a.cols(), x.len())?;
    let mut y = Vector::zeros(a.rows())?;
    transform(a, x, &mut y.view_mut())?;
    Ok(y)
}

/// Matrix product `out = a * b`.
///
/// Requires `a.cols() == b.rows()` and `out` of shape `[a.rows(), b.cols()]`.
pub fn matmul<T: Float>(
    a: &MatrixRef<'_, T>,
    b: &MatrixRef<'_, T>,
    out: &mut MatrixMut<'_, T>,
) -> Result<()> {
    if a.cols() != b.rows() {
        return Err(LinalgError::shape(
            "matmul",
            [a.cols(), b.cols()],
            b.shape(),
        ));
    }
    ensure_same_shape("matmul", [a.rows(), b.cols()], out.shape())?;
    ensure_non_empty("matmul", out.as_slice().len())?;

    let (n, m) = (a.cols(), b.cols());
    let (lhs, rhs) = (a.as_slice(), b.as_slice());
    for (i, out_row) in out.as_mut_slice().chunks_exact_mut(m).enumerate() {
        out_row.fill(T::zero());
        let a_row = &lhs[i * n..(i + 1) * n];
        for (k, &aik) in a_row.iter().enumerate() {
            let b_row = &rhs[k * m..(k + 1) * m];
            for (o, &bkj) in out_row.iter_mut().zip(b_row) {
                *o = *o + aik * bkj;
            }
        }
    }
    Ok(())
}

/// Allocating form of [`matmul`].
pub fn matmul_alloc<T: Float>(a: &MatrixRef<'_, T>, b: &MatrixRef<'_, T>) -> Result<Matrix<T>> {
    if a.cols() != b.rows() {
        return Err(LinalgError::shape(
            "matmul_alloc",
            [a.cols(), b.cols()],
            b.shape(),
        ));
    }
    let mut out = Matrix::zeros(a.rows(), b.cols())?;
    matmul(a, b, &mut out.view_mut())?;
    Ok(out)
}

/// `out = a^T`; `out` must have shape `[a.cols(), a.rows()]`.
pub fn transpose<T: Copy>(a: &MatrixRef<'_, T>, out: &mut MatrixMut<'_, T>) -> Result<()> {
    ensure_same_shape("transpose", [a.cols(), a.rows()], out.shape())?;
    let (rows, cols) = (a.rows(), a.cols());
    let src = a.as_slice();
    let dst = out.as_mut_slice();
    for r in 0..rows {
        for c in 0..cols {
            dst[c * rows + r] = src[r * cols + c];
        }
    }
    Ok(())
}

pub fn mat_max<T: Float>(a: &MatrixRef<'_, T>) -> Result<T> {
    reduce("mat_max", &StridedVec::contiguous(a.as_slice()), |x| x, larger)
}

pub fn mat_min<T: Float>(a: &MatrixRef<'_, T>) -> Result<T> {
    reduce("mat_min", &StridedVec::contiguous(a.as_slice()), |x| x, smaller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn view(data: &[f64]) -> StridedVec<'_, f64> {
        StridedVec::contiguous(data)
    }

    #[test]
    fn test_vec_arithmetic_on_strided_views() {
        let data = [1.0, -1.0, 2.0, -1.0, 3.0];
        let a = StridedVec::new(&data, 0, 3, 2).unwrap();
        let b = view(&[10.0, 20.0, 30.0]);
        let mut out = [0.0; 3];

        vec_add(&a, &b, &mut StridedVecMut::contiguous(&mut out)).unwrap();
        assert_eq!(out, [11.0, 22.0, 33.0]);

        vec_sub(&b, &a, &mut StridedVecMut::contiguous(&mut out)).unwrap();
        assert_eq!(out, [9.0, 18.0, 27.0]);

        vec_scale(2.0, &a, &mut StridedVecMut::contiguous(&mut out)).unwrap();
        assert_eq!(out, [2.0, 4.0, 6.0]);

        vec_rscale(2.0, &a, &mut StridedVecMut::contiguous(&mut out)).unwrap();
        assert_eq!(out, [0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_vec_shape_mismatch_leaves_output() {
        let a = view(&[1.0, 2.0, 3.0]);
        let b = view(&[1.0, 2.0]);
        let mut out = [7.0; 3];
        let err = vec_add(&a, &b, &mut StridedVecMut::contiguous(&mut out)).unwrap_err();
        assert_eq!(err, LinalgError::shape("vec_add", [3], [2]));
        assert_eq!(out, [7.0; 3]);

        let mut short = [7.0; 2];
        assert!(vec_exp(&a, &mut StridedVecMut::contiguous(&mut short)).is_err());
        assert_eq!(short, [7.0; 2]);
    }

    #[test]
    fn test_exp_and_normalize() {
        let a = view(&[0.0, 1.0]);
        let mut out = [0.0; 2];
        vec_exp(&a, &mut StridedVecMut::contiguous(&mut out)).unwrap();
        assert_relative_eq!(out[1], std::f64::consts::E, epsilon = 1e-12);

        let a = view(&[3.0, 4.0]);
        vec_normalize(&a, &mut StridedVecMut::contiguous(&mut out)).unwrap();
        assert_relative_eq!(out[0], 0.6, epsilon = 1e-12);
        assert_relative_eq!(out[1], 0.8, epsilon = 1e-12);

        let zero = view(&[0.0, 0.0]);
        assert!(matches!(
            vec_normalize(&zero, &mut StridedVecMut::contiguous(&mut out)),
            Err(LinalgError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_dot_norms() {
        let a = view(&[3.0, -4.0]);
        assert_eq!(dot(&a, &a).unwrap(), 25.0);
        assert_eq!(magnitude(&a), 5.0);
        assert_relative_eq!(norm(&a, 1.0).unwrap(), 7.0, epsilon = 1e-12);
        assert_relative_eq!(norm(&a, 2.0).unwrap(), 5.0, epsilon = 1e-12);
        assert_eq!(norm(&a, f64::INFINITY).unwrap(), 4.0);
        assert!(matches!(
            norm(&a, 0.5),
            Err(LinalgError::InvalidArgument { op: "norm", .. })
        ));
        assert!(dot(&a, &view(&[1.0])).is_err());
    }

    #[test]
    fn test_reductions() {
        let a = view(&[2.0, -5.0, 1.0, 4.0]);
        assert_eq!(max(&a).unwrap(), 4.0);
        assert_eq!(max_abs(&a).unwrap(), 5.0);
        assert_eq!(min(&a).unwrap(), -5.0);
        assert_eq!(min_abs(&a).unwrap(), 1.0);
        assert_eq!(sum(&a).unwrap(), 2.0);
        assert_eq!(prod(&a).unwrap(), -40.0);
        assert_eq!(range(&a).unwrap(), 9.0);
        // (4 - (-5)) / min(4, 5)
        assert_relative_eq!(range_relative(&a).unwrap(), 2.25, epsilon = 1e-12);
        // mean 0.5, deviations 1.5 5.5 0.5 3.5
        assert_relative_eq!(mean_abs_deviation(&a).unwrap(), 2.75, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_reductions() {
        let empty: [f64; 0] = [];
        let a = view(&empty);
        assert_eq!(max(&a).unwrap_err(), LinalgError::Empty { op: "max" });
        assert_eq!(sum(&a).unwrap_err(), LinalgError::Empty { op: "sum" });
        assert_eq!(
            mean_abs_deviation(&a).unwrap_err(),
            LinalgError::Empty {
                op: "mean_abs_deviation"
            }
        );
        assert_eq!(dot(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_matrix_elementwise() {
        let a = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        let b = Matrix::ones(2, 2).unwrap();
        let mut out = Matrix::zeros(2, 2).unwrap();

        mat_add(&a.view(), &b.view(), &mut out.view_mut()).unwrap();
        assert_eq!(out.as_slice(), &[2.0, 3.0, 4.0, 5.0]);
        mat_sub(&a.view(), &b.view(), &mut out.view_mut()).unwrap();
        assert_eq!(out.as_slice(), &[0.0, 1.0, 2.0, 3.0]);
        mat_scale(-1.0, &a.view(), &mut out.view_mut()).unwrap();
        assert_eq!(out.as_slice(), &[-1.0, -2.0, -3.0, -4.0]);
        mat_copy(&a.view(), &mut out.view_mut()).unwrap();
        assert_eq!(out, a);

        assert_eq!(mat_max(&a.view()).unwrap(), 4.0);
        assert_eq!(mat_min(&a.view()).unwrap(), 1.0);
    }

    #[test]
    fn test_transform() {
        let a = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        let x = view(&[1.0, 0.0, -1.0]);
        let y = transform_alloc(&a.view(), &x).unwrap();
        assert_eq!(y.as_slice(), &[-2.0, -2.0]);

        // Column of a matrix as input.
        let col = a.col(1).unwrap();
        let mut y = [0.0; 3];
        let at = Matrix::from_vec(vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0], 3, 2).unwrap();
        transform(&at.view(), &col, &mut StridedVecMut::contiguous(&mut y)).unwrap();
        assert_eq!(y, [2.0, 5.0, 7.0]);

        let mut wrong = [9.0; 3];
        assert!(transform(&a.view(), &x, &mut StridedVecMut::contiguous(&mut wrong)).is_err());
        assert_eq!(wrong, [9.0; 3]);
    }

    #[test]
    fn test_matmul() {
        let a = Matrix::<f64>::ones(2, 3).unwrap();
        let b = Matrix::<f64>::ones(3, 2).unwrap();
        let c = matmul_alloc(&a.view(), &b.view()).unwrap();
        assert_eq!(c.rows(), 2);
        assert_eq!(c.cols(), 2);
        assert!(c.as_slice().iter().all(|&v| v == 3.0));

        let a = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        let b = Matrix::from_vec(vec![0.0, 1.0, 1.0, 0.0], 2, 2).unwrap();
        let mut out = Matrix::filled(9.0, 2, 2).unwrap();
        matmul(&a.view(), &b.view(), &mut out.view_mut()).unwrap();
        assert_eq!(out.as_slice(), &[2.0, 1.0, 4.0, 3.0]);
    }

    #[test]
    fn test_matmul_shape_errors() {
        let a = Matrix::<f64>::ones(2, 3).unwrap();
        let b = Matrix::<f64>::ones(2, 2).unwrap();
        assert!(matches!(
            matmul_alloc(&a.view(), &b.view()),
            Err(LinalgError::ShapeMismatch { op: "matmul_alloc", .. })
        ));

        let b = Matrix::<f64>::ones(3, 2).unwrap();
        let mut out = Matrix::filled(5.0, 3, 3).unwrap();
        let err = matmul(&a.view(), &b.view(), &mut out.view_mut()).unwrap_err();
        assert_eq!(err, LinalgError::shape("matmul", [2, 2], [3, 3]));
        assert!(out.as_slice().iter().all(|&v| v == 5.0));
    }

    #[test]
    fn test_transpose() {
        let a = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        let mut t = Matrix::zeros(3, 2).unwrap();
        transpose(&a.view(), &mut t.view_mut()).unwrap();
        assert_eq!(t.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);

        let mut same = Matrix::filled(0.5, 2, 3).unwrap();
        assert!(transpose(&a.view(), &mut same.view_mut()).is_err());
        assert!(same.as_slice().iter().all(|&v| v == 0.5));
    }

    #[test]
    fn test_freed_matrix_reduction_is_empty() {
        let mut a = Matrix::<f64>::ones(2, 2).unwrap();
        a.free();
        assert_eq!(
            mat_max(&a.view()).unwrap_err(),
            LinalgError::Empty { op: "mat_max" }
        );
    }
}
