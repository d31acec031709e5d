//! Strided vector views.
//!
//! This module provides [`StridedVec`] and [`StridedVecMut`], non-owning one-dimensional
//! views over a contiguous buffer with a fixed element stride.
//!
//! Key features:
//! - Zero-copy views over slices, owned vectors, or matrix rows and columns
//! - Element `i` lives at `data[offset + i * stride]`
//! - Bounds-checked accessors return [`LinalgError::OutOfBounds`] instead of panicking
//!
//! A view borrows its buffer, so the borrow checker guarantees the source (a
//! [`Vector`](crate::Vector) or [`Matrix`](crate::Matrix)) outlives every view taken from it
//! and cannot be freed while a view is alive.

use crate::{LinalgError, Result};
use std::fmt;
use std::ops::{Index, IndexMut};

/// An immutable strided view over a contiguous buffer.
///
/// # Example
/// ```
/// use strided_linsolve::StridedVec;
///
/// // Every other element, starting at index 1.
/// let data = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
/// let view = StridedVec::new(&data, 1, 3, 2).unwrap();
/// assert_eq!(view.to_vec(), vec![1.0, 3.0, 5.0]);
/// assert!(view.get(3).is_err());
/// ```
pub struct StridedVec<'a, T> {
    data: &'a [T],
    offset: usize,
    len: usize,
    stride: usize,
}

/// A mutable strided view over a contiguous buffer.
///
/// Same as [`StridedVec`] but allows mutation. Holds an exclusive borrow of the buffer.
pub struct StridedVecMut<'a, T> {
    data: &'a mut [T],
    offset: usize,
    len: usize,
    stride: usize,
}

impl<T> Clone for StridedVec<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StridedVec<'_, T> {}

impl<T> fmt::Debug for StridedVec<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StridedVec")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("stride", &self.stride)
            .finish()
    }
}

impl<T> fmt::Debug for StridedVecMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StridedVecMut")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("stride", &self.stride)
            .finish()
    }
}

impl<'a, T> StridedVec<'a, T> {
    /// Create a new strided view.
    ///
    /// # Arguments
    /// - `data`: The underlying contiguous data
    /// - `offset`: Position of element 0 in `data`
    /// - `len`: Number of elements in the view
    /// - `stride`: Distance in elements between consecutive entries (at least 1)
    ///
    /// # Errors
    /// Returns an error if the stride is zero or the view would reach past `data`.
    pub fn new(data: &'a [T], offset: usize, len: usize, stride: usize) -> Result<Self> {
        validate_bounds("StridedVec::new", data.len(), offset, len, stride)?;
        Ok(Self {
            data,
            offset,
            len,
            stride,
        })
    }

    /// Build a view whose bounds the caller has already established.
    #[inline]
    pub(crate) fn from_parts(data: &'a [T], offset: usize, len: usize, stride: usize) -> Self {
        debug_assert!(
            validate_bounds("StridedVec::from_parts", data.len(), offset, len, stride).is_ok()
        );
        Self {
            data,
            offset,
            len,
            stride,
        }
    }

    /// Stride-1 view over the whole slice, without allocation.
    pub fn contiguous(data: &'a [T]) -> Self {
        Self {
            data,
            offset: 0,
            len: data.len(),
            stride: 1,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The full underlying buffer, including elements outside the view.
    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    #[inline]
    fn linear_index(&self, i: usize) -> usize {
        self.offset + i * self.stride
    }

    /// Reference to element `i`.
    pub fn get_ref(&self, i: usize) -> Result<&'a T> {
        check_index(i, self.len)?;
        Ok(&self.data[self.linear_index(i)])
    }

    /// Returns an iterator over the elements in view order.
    pub fn iter(&self) -> StridedIter<'a, T> {
        StridedIter {
            data: self.data,
            pos: self.offset,
            stride: self.stride,
            remaining: self.len,
        }
    }

    /// The viewed elements as a plain slice, when the view is contiguous.
    pub fn as_slice(&self) -> Option<&'a [T]> {
        if self.stride == 1 || self.len <= 1 {
            Some(&self.data[self.offset..self.offset + self.len])
        } else {
            None
        }
    }
}

impl<'a, T: Copy> StridedVec<'a, T> {
    /// Get element `i`.
    ///
    /// # Errors
    /// Returns [`LinalgError::OutOfBounds`] if `i >= len`.
    #[inline]
    pub fn get(&self, i: usize) -> Result<T> {
        self.get_ref(i).copied()
    }

    /// Copy the viewed elements into a new `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().copied().collect()
    }
}

impl<'a, T> StridedVecMut<'a, T> {
    /// Create a new mutable strided view.
    ///
    /// # Errors
    /// Returns an error if the stride is zero or the view would reach past `data`.
    pub fn new(data: &'a mut [T], offset: usize, len: usize, stride: usize) -> Result<Self> {
        validate_bounds("StridedVecMut::new", data.len(), offset, len, stride)?;
        Ok(Self {
            data,
            offset,
            len,
            stride,
        })
    }

    #[inline]
    pub(crate) fn from_parts(data: &'a mut [T], offset: usize, len: usize, stride: usize) -> Self {
        debug_assert!(
            validate_bounds("StridedVecMut::from_parts", data.len(), offset, len, stride).is_ok()
        );
        Self {
            data,
            offset,
            len,
            stride,
        }
    }

    /// Stride-1 view over the whole slice, without allocation.
    pub fn contiguous(data: &'a mut [T]) -> Self {
        let len = data.len();
        Self {
            data,
            offset: 0,
            len,
            stride: 1,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    fn linear_index(&self, i: usize) -> usize {
        self.offset + i * self.stride
    }

    /// Reborrow as an immutable view.
    #[inline]
    pub fn as_view(&self) -> StridedVec<'_, T> {
        StridedVec {
            data: &*self.data,
            offset: self.offset,
            len: self.len,
            stride: self.stride,
        }
    }

    /// Reborrow mutably for a shorter lifetime.
    #[inline]
    pub fn reborrow(&mut self) -> StridedVecMut<'_, T> {
        StridedVecMut {
            data: &mut *self.data,
            offset: self.offset,
            len: self.len,
            stride: self.stride,
        }
    }

    pub fn get_ref(&self, i: usize) -> Result<&T> {
        check_index(i, self.len)?;
        Ok(&self.data[self.linear_index(i)])
    }

    /// Mutable reference to element `i`.
    ///
    /// # Errors
    /// Returns [`LinalgError::OutOfBounds`] if `i >= len`.
    pub fn get_mut(&mut self, i: usize) -> Result<&mut T> {
        check_index(i, self.len)?;
        let idx = self.linear_index(i);
        Ok(&mut self.data[idx])
    }

    /// Set element `i`.
    pub fn set(&mut self, i: usize, value: T) -> Result<()> {
        *self.get_mut(i)? = value;
        Ok(())
    }

    pub fn iter(&self) -> StridedIter<'_, T> {
        self.as_view().iter()
    }

    /// Mutable iterator over the elements in view order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        let start = self.offset.min(self.data.len());
        self.data[start..]
            .iter_mut()
            .step_by(self.stride)
            .take(self.len)
    }
}

impl<'a, T: Copy> StridedVecMut<'a, T> {
    #[inline]
    pub fn get(&self, i: usize) -> Result<T> {
        self.get_ref(i).copied()
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        for x in self.iter_mut() {
            *x = value;
        }
    }

    /// Copy `src` into this view element by element.
    ///
    /// # Errors
    /// Returns [`LinalgError::ShapeMismatch`] if the lengths differ; nothing is written.
    pub fn copy_from(&mut self, src: &StridedVec<'_, T>) -> Result<()> {
        if src.len() != self.len {
            return Err(LinalgError::shape("copy_from", [self.len], [src.len()]));
        }
        for (dst, &s) in self.iter_mut().zip(src.iter()) {
            *dst = s;
        }
        Ok(())
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.as_view().to_vec()
    }
}

// Panicking indexing, like slices. Use `get` for the checked variant.
impl<T> Index<usize> for StridedVec<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        assert!(i < self.len, "index {i} out of bounds for length {}", self.len);
        &self.data[self.linear_index(i)]
    }
}

impl<T> Index<usize> for StridedVecMut<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        assert!(i < self.len, "index {i} out of bounds for length {}", self.len);
        &self.data[self.linear_index(i)]
    }
}

impl<T> IndexMut<usize> for StridedVecMut<'_, T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        assert!(i < self.len, "index {i} out of bounds for length {}", self.len);
        let idx = self.linear_index(i);
        &mut self.data[idx]
    }
}

impl<'a, T> From<&'a [T]> for StridedVec<'a, T> {
    fn from(data: &'a [T]) -> Self {
        StridedVec::contiguous(data)
    }
}

impl<'a, T> From<&'a mut [T]> for StridedVecMut<'a, T> {
    fn from(data: &'a mut [T]) -> Self {
        StridedVecMut::contiguous(data)
    }
}

impl<T: fmt::LowerExp> fmt::Display for StridedVec<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, x) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{x:e}")?;
        }
        f.write_str("]")
    }
}

// ============================================================================
// Iterator support
// ============================================================================

/// Iterator over the elements of a [`StridedVec`].
pub struct StridedIter<'a, T> {
    data: &'a [T],
    pos: usize,
    stride: usize,
    remaining: usize,
}

impl<'a, T> Iterator for StridedIter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = &self.data[self.pos];
        self.remaining -= 1;
        if self.remaining > 0 {
            self.pos += self.stride;
        }
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for StridedIter<'_, T> {}

// ============================================================================
// Helper functions
// ============================================================================

#[inline]
fn check_index(i: usize, len: usize) -> Result<()> {
    if i >= len {
        return Err(LinalgError::OutOfBounds { index: i, len });
    }
    Ok(())
}

fn validate_bounds(
    op: &'static str,
    data_len: usize,
    offset: usize,
    len: usize,
    stride: usize,
) -> Result<()> {
    if stride == 0 {
        return Err(LinalgError::InvalidArgument {
            op,
            reason: "stride must be at least 1".into(),
        });
    }
    if len == 0 {
        // Empty view, only the start position must be addressable
        if offset > data_len {
            return Err(LinalgError::OutOfBounds {
                index: offset,
                len: data_len,
            });
        }
        return Ok(());
    }

    let last = (len - 1)
        .checked_mul(stride)
        .and_then(|span| span.checked_add(offset))
        .ok_or_else(|| LinalgError::InvalidArgument {
            op,
            reason: "offset overflow while computing last element".into(),
        })?;

    if last >= data_len {
        return Err(LinalgError::OutOfBounds {
            index: last,
            len: data_len,
        });
    }
    Ok(())
}
