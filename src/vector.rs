//! Owned, heap-allocated vectors.

use crate::view::{StridedVec, StridedVecMut};
use crate::{LinalgError, Result};
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Owned vector with value, zero and one initializers.
///
/// Storage is released on drop. [`Vector::free`] releases it early and is idempotent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector<T> {
    data: Vec<T>,
}

impl<T: Clone> Vector<T> {
    /// Allocate a vector of `len` copies of `value`.
    ///
    /// # Errors
    /// Returns [`LinalgError::ZeroDimension`] if `len == 0`.
    pub fn filled(value: T, len: usize) -> Result<Self> {
        if len == 0 {
            return Err(LinalgError::ZeroDimension {
                op: "Vector::filled",
            });
        }
        Ok(Self {
            data: vec![value; len],
        })
    }

    /// Allocate a copy of the elements seen through `src`.
    pub fn copy_from_view(src: &StridedVec<'_, T>) -> Result<Self> {
        if src.is_empty() {
            return Err(LinalgError::ZeroDimension {
                op: "Vector::copy_from_view",
            });
        }
        Ok(Self {
            data: src.iter().cloned().collect(),
        })
    }
}

impl<T: Clone + Zero> Vector<T> {
    pub fn zeros(len: usize) -> Result<Self> {
        Self::filled(T::zero(), len)
    }
}

impl<T: Clone + One> Vector<T> {
    pub fn ones(len: usize) -> Result<Self> {
        Self::filled(T::one(), len)
    }
}

impl<T> Vector<T> {
    /// Take ownership of `data`.
    ///
    /// # Errors
    /// Returns [`LinalgError::ZeroDimension`] if `data` is empty.
    pub fn from_vec(data: Vec<T>) -> Result<Self> {
        if data.is_empty() {
            return Err(LinalgError::ZeroDimension {
                op: "Vector::from_vec",
            });
        }
        Ok(Self { data })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

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

    /// Stride-1 view over the whole vector.
    #[inline]
    pub fn view(&self) -> StridedVec<'_, T> {
        StridedVec::contiguous(&self.data)
    }

    #[inline]
    pub fn view_mut(&mut self) -> StridedVecMut<'_, T> {
        StridedVecMut::contiguous(&mut self.data)
    }

    /// Release the storage and reset the length to zero.
    ///
    /// Safe to call on an already freed vector.
    pub fn free(&mut self) {
        self.data = Vec::new();
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

impl<T> From<Vector<T>> for Vec<T> {
    fn from(v: Vector<T>) -> Self {
        v.data
    }
}

impl<T: fmt::LowerExp> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.view(), f)
    }
}
