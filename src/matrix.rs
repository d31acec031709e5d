//! Row-major dense matrices.
//!
//! - [`Matrix`]: owns its buffer
//! - [`MatrixRef`] / [`MatrixMut`]: wrap caller-owned storage, never free it
//!
//! Element `(r, c)` lives at `data[r * cols + c]`. Rows are exposed as stride-1
//! [`StridedVec`] views and columns as stride-`cols` views, both without copying.

use crate::view::{StridedVec, StridedVecMut};
use crate::{Axis, LinalgError, Result};
use num_traits::{One, Zero};
use std::fmt;

/// Owned row-major matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

/// Immutable row-major matrix over borrowed storage.
pub struct MatrixRef<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
}

/// Mutable row-major matrix over borrowed storage.
pub struct MatrixMut<'a, T> {
    data: &'a mut [T],
    rows: usize,
    cols: usize,
}

impl<T> Clone for MatrixRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MatrixRef<'_, T> {}

impl<T> fmt::Debug for MatrixRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixRef")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish()
    }
}

impl<T> fmt::Debug for MatrixMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixMut")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish()
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

/// Validate a requested shape against a buffer length.
fn validate_shape(op: &'static str, data_len: usize, rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(LinalgError::ZeroDimension { op });
    }
    let len = rows
        .checked_mul(cols)
        .ok_or_else(|| LinalgError::InvalidArgument {
            op,
            reason: format!("{rows}x{cols} overflows usize"),
        })?;
    if len != data_len {
        return Err(LinalgError::shape(op, [len], [data_len]));
    }
    Ok(())
}

/// Check `(row, col)` against the shape, one axis at a time.
#[inline]
fn checked_index(row: usize, col: usize, rows: usize, cols: usize) -> Result<usize> {
    if row >= rows {
        return Err(LinalgError::MatrixOutOfBounds {
            axis: Axis::Row,
            index: row,
            len: rows,
        });
    }
    if col >= cols {
        return Err(LinalgError::MatrixOutOfBounds {
            axis: Axis::Col,
            index: col,
            len: cols,
        });
    }
    Ok(row * cols + col)
}

// ============================================================================
// Matrix
// ============================================================================

impl<T: Clone> Matrix<T> {
    /// Allocate a `rows x cols` matrix filled with `value`.
    ///
    /// # Errors
    /// Returns [`LinalgError::ZeroDimension`] if either dimension is zero.
    pub fn filled(value: T, rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(LinalgError::ZeroDimension {
                op: "Matrix::filled",
            });
        }
        let len = rows
            .checked_mul(cols)
            .ok_or_else(|| LinalgError::InvalidArgument {
                op: "Matrix::filled",
                reason: format!("{rows}x{cols} overflows usize"),
            })?;
        Ok(Self {
            data: vec![value; len],
            rows,
            cols,
        })
    }
}

impl<T: Clone + Zero> Matrix<T> {
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(T::zero(), rows, cols)
    }
}

impl<T: Clone + One> Matrix<T> {
    pub fn ones(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(T::one(), rows, cols)
    }
}

impl<T> Matrix<T> {
    /// Take ownership of a row-major buffer.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        validate_shape("Matrix::from_vec", data.len(), rows, cols)?;
        Ok(Self { data, rows, cols })
    }

    /// Build a matrix by evaluating `f(row, col)` for every element.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(LinalgError::ZeroDimension {
                op: "Matrix::from_fn",
            });
        }
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Ok(Self { data, rows, cols })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `true` once the matrix has been freed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn view(&self) -> MatrixRef<'_, T> {
        MatrixRef {
            data: &self.data,
            rows: self.rows,
            cols: self.cols,
        }
    }

    #[inline]
    pub fn view_mut(&mut self) -> MatrixMut<'_, T> {
        MatrixMut {
            data: &mut self.data,
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn get_ref(&self, row: usize, col: usize) -> Result<&T> {
        let idx = checked_index(row, col, self.rows, self.cols)?;
        Ok(&self.data[idx])
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut T> {
        let idx = checked_index(row, col, self.rows, self.cols)?;
        Ok(&mut self.data[idx])
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        *self.get_mut(row, col)? = value;
        Ok(())
    }

    pub fn row(&self, row: usize) -> Result<StridedVec<'_, T>> {
        self.view().into_row(row)
    }

    pub fn col(&self, col: usize) -> Result<StridedVec<'_, T>> {
        self.view().into_col(col)
    }

    pub fn row_mut(&mut self, row: usize) -> Result<StridedVecMut<'_, T>> {
        self.view_mut().into_row_mut(row)
    }

    pub fn col_mut(&mut self, col: usize) -> Result<StridedVecMut<'_, T>> {
        self.view_mut().into_col_mut(col)
    }

    /// Release the storage and reset both dimensions to zero.
    ///
    /// Safe to call on an already freed matrix.
    pub fn free(&mut self) {
        self.data = Vec::new();
        self.rows = 0;
        self.cols = 0;
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Copy> Matrix<T> {
    /// Get element `(row, col)`.
    ///
    /// # Errors
    /// Returns [`LinalgError::MatrixOutOfBounds`] naming the offending axis.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.get_ref(row, col).copied()
    }
}

// ============================================================================
// MatrixRef
// ============================================================================

impl<'a, T> MatrixRef<'a, T> {
    /// Wrap a caller-owned row-major buffer. No allocation.
    ///
    /// # Errors
    /// Returns [`LinalgError::ZeroDimension`] for a zero shape and
    /// [`LinalgError::ShapeMismatch`] if `data.len() != rows * cols`.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Result<Self> {
        validate_shape("MatrixRef::new", data.len(), rows, cols)?;
        Ok(Self { data, rows, cols })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    pub fn get_ref(&self, row: usize, col: usize) -> Result<&'a T> {
        let idx = checked_index(row, col, self.rows, self.cols)?;
        Ok(&self.data[idx])
    }

    /// Row `row` as a stride-1 view.
    ///
    /// The view borrows the matrix storage and cannot outlive it.
    pub fn into_row(self, row: usize) -> Result<StridedVec<'a, T>> {
        if row >= self.rows {
            return Err(LinalgError::MatrixOutOfBounds {
                axis: Axis::Row,
                index: row,
                len: self.rows,
            });
        }
        Ok(StridedVec::from_parts(
            self.data,
            row * self.cols,
            self.cols,
            1,
        ))
    }

    /// Column `col` as a stride-`cols` view.
    pub fn into_col(self, col: usize) -> Result<StridedVec<'a, T>> {
        if col >= self.cols {
            return Err(LinalgError::MatrixOutOfBounds {
                axis: Axis::Col,
                index: col,
                len: self.cols,
            });
        }
        Ok(StridedVec::from_parts(self.data, col, self.rows, self.cols))
    }

    pub fn row(&self, row: usize) -> Result<StridedVec<'a, T>> {
        self.into_row(row)
    }

    pub fn col(&self, col: usize) -> Result<StridedVec<'a, T>> {
        self.into_col(col)
    }
}

impl<T: Copy> MatrixRef<'_, T> {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.get_ref(row, col).copied()
    }

    /// Allocate an owned copy of the matrix.
    pub fn to_matrix(&self) -> Matrix<T> {
        Matrix {
            data: self.data.to_vec(),
            rows: self.rows,
            cols: self.cols,
        }
    }
}

// ============================================================================
// MatrixMut
// ============================================================================

impl<'a, T> MatrixMut<'a, T> {
    /// Wrap a caller-owned mutable row-major buffer. No allocation.
    pub fn new(data: &'a mut [T], rows: usize, cols: usize) -> Result<Self> {
        validate_shape("MatrixMut::new", data.len(), rows, cols)?;
        Ok(Self { data, rows, cols })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &*self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.data
    }

    /// Reborrow as an immutable matrix.
    #[inline]
    pub fn as_view(&self) -> MatrixRef<'_, T> {
        MatrixRef {
            data: &*self.data,
            rows: self.rows,
            cols: self.cols,
        }
    }

    #[inline]
    pub fn reborrow(&mut self) -> MatrixMut<'_, T> {
        MatrixMut {
            data: &mut *self.data,
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn get_ref(&self, row: usize, col: usize) -> Result<&T> {
        let idx = checked_index(row, col, self.rows, self.cols)?;
        Ok(&self.data[idx])
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut T> {
        let idx = checked_index(row, col, self.rows, self.cols)?;
        Ok(&mut self.data[idx])
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        *self.get_mut(row, col)? = value;
        Ok(())
    }

    pub fn into_row_mut(self, row: usize) -> Result<StridedVecMut<'a, T>> {
        if row >= self.rows {
            return Err(LinalgError::MatrixOutOfBounds {
                axis: Axis::Row,
                index: row,
                len: self.rows,
            });
        }
        Ok(StridedVecMut::from_parts(
            self.data,
            row * self.cols,
            self.cols,
            1,
        ))
    }

    pub fn into_col_mut(self, col: usize) -> Result<StridedVecMut<'a, T>> {
        if col >= self.cols {
            return Err(LinalgError::MatrixOutOfBounds {
                axis: Axis::Col,
                index: col,
                len: self.cols,
            });
        }
        Ok(StridedVecMut::from_parts(
            self.data, col, self.rows, self.cols,
        ))
    }

    pub fn row_mut(&mut self, row: usize) -> Result<StridedVecMut<'_, T>> {
        self.reborrow().into_row_mut(row)
    }

    pub fn col_mut(&mut self, col: usize) -> Result<StridedVecMut<'_, T>> {
        self.reborrow().into_col_mut(col)
    }
}

impl<T: Copy> MatrixMut<'_, T> {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.get_ref(row, col).copied()
    }
}

// ============================================================================
// Formatting
// ============================================================================

impl<T: fmt::LowerExp> fmt::Display for MatrixRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[")?;
        for r in 0..self.rows {
            let row = StridedVec::from_parts(self.data, r * self.cols, self.cols, 1);
            write!(f, "  {row}")?;
            if r + 1 != self.rows {
                writeln!(f, ",")?;
            } else {
                writeln!(f)?;
            }
        }
        write!(f, "]")
    }
}

impl<T: fmt::LowerExp> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.view(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_matrix(rows: usize, cols: usize) -> Matrix<f64> {
        Matrix::from_fn(rows, cols, |r, c| (r * cols + c) as f64).unwrap()
    }

    #[test]
    fn test_row_and_col_views() {
        let m = make_matrix(3, 4);

        let row = m.row(1).unwrap();
        assert_eq!(row.stride(), 1);
        assert_eq!(row.to_vec(), vec![4.0, 5.0, 6.0, 7.0]);

        let col = m.col(2).unwrap();
        assert_eq!(col.stride(), 4);
        assert_eq!(col.to_vec(), vec![2.0, 6.0, 10.0]);
    }

    #[test]
    fn test_row_col_get_agree() {
        let m = make_matrix(4, 3);
        for r in 0..4 {
            for c in 0..3 {
                let v = m.get(r, c).unwrap();
                assert_eq!(m.row(r).unwrap().get(c).unwrap(), v);
                assert_eq!(m.col(c).unwrap().get(r).unwrap(), v);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_axis() {
        let m = make_matrix(2, 3);
        assert_eq!(
            m.get(2, 0).unwrap_err(),
            LinalgError::MatrixOutOfBounds {
                axis: Axis::Row,
                index: 2,
                len: 2
            }
        );
        assert_eq!(
            m.get(0, 3).unwrap_err(),
            LinalgError::MatrixOutOfBounds {
                axis: Axis::Col,
                index: 3,
                len: 3
            }
        );
        assert!(m.row(2).is_err());
        assert!(m.col(3).is_err());
    }

    #[test]
    fn test_zero_shape_rejected() {
        assert!(matches!(
            Matrix::<f64>::zeros(0, 3),
            Err(LinalgError::ZeroDimension { .. })
        ));
        assert!(matches!(
            Matrix::<f64>::ones(3, 0),
            Err(LinalgError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn test_wrap_caller_storage() {
        let mut data = vec![0.0; 6];
        {
            let mut m = MatrixMut::new(&mut data, 2, 3).unwrap();
            m.set(1, 2, 5.0).unwrap();
            m.col_mut(0).unwrap().fill(1.0);
        }
        assert_eq!(data, vec![1.0, 0.0, 0.0, 1.0, 0.0, 5.0]);
        assert!(MatrixRef::new(&data, 4, 2).is_err());
    }

    #[test]
    fn test_column_view_write_through() {
        let mut m = make_matrix(3, 2);
        {
            let mut col = m.col_mut(1).unwrap();
            for x in col.iter_mut() {
                *x = -1.0;
            }
        }
        assert_eq!(m.as_slice(), &[0.0, -1.0, 2.0, -1.0, 4.0, -1.0]);
    }

    #[test]
    fn test_free_twice() {
        let mut m = make_matrix(2, 2);
        m.free();
        assert_eq!((m.rows(), m.cols()), (0, 0));
        m.free();
        assert_eq!((m.rows(), m.cols()), (0, 0));
        assert!(m.is_empty());
    }

    #[test]
    fn test_display() {
        let m = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        assert_eq!(m.to_string(), "[\n  [1e0, 2e0],\n  [3e0, 4e0]\n]");
    }
}
