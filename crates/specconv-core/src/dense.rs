//! Dense N-dimensional tensor used as contraction operand and result
//!
//! Axis conventions for spectral convolution inputs:
//!
//! - axis 0: batch
//! - axis 1: channel
//! - axes 2..: spatial / spectral modes
//!
//! # SciRS2 Integration
//!
//! Storage is `scirs2_core::ndarray_ext::Array<T, IxDyn>`. Element types only
//! need `Clone + Num`, which admits both real and complex coefficients.

use scirs2_core::ndarray_ext::{Array, ArrayView, Dimension, IxDyn};
use scirs2_core::numeric::{Float, Num};
use std::fmt;

/// Dense N-dimensional tensor backed by scirs2_core's ndarray
///
/// # Examples
///
/// ```
/// use specconv_core::DenseND;
///
/// // batch=2, channels=3, one spectral axis of 4 modes
/// let x = DenseND::<f64>::zeros(&[2, 3, 4]);
/// assert_eq!(x.order(), 3);
/// assert_eq!(x.channels(), Some(3));
/// assert_eq!(x.spatial_shape(), &[4]);
/// ```
#[derive(Clone, PartialEq)]
pub struct DenseND<T> {
    pub(crate) data: Array<T, IxDyn>,
}

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Wrap an existing dynamic-dimension array
    pub fn from_array(array: Array<T, IxDyn>) -> Self {
        Self { data: array }
    }

    /// Create a tensor from row-major data
    ///
    /// # Errors
    ///
    /// Fails if `vec.len()` differs from the product of `shape`.
    ///
    /// # Examples
    ///
    /// ```
    /// use specconv_core::DenseND;
    ///
    /// let t = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// assert_eq!(t[&[1, 0]], 4.0);
    /// ```
    pub fn from_vec(vec: Vec<T>, shape: &[usize]) -> anyhow::Result<Self> {
        let total: usize = shape.iter().product();
        if vec.len() != total {
            anyhow::bail!(
                "Shape {:?} requires {} elements, but got {}",
                shape,
                total,
                vec.len()
            );
        }
        let array = Array::from_shape_vec(IxDyn(shape), vec)?;
        Ok(Self { data: array })
    }

    /// Create a tensor by evaluating `f` at every multi-index
    ///
    /// ```
    /// use specconv_core::DenseND;
    ///
    /// let t = DenseND::<f64>::from_shape_fn(&[2, 2], |idx| (idx[0] * 10 + idx[1]) as f64);
    /// assert_eq!(t[&[1, 1]], 11.0);
    /// ```
    pub fn from_shape_fn<F>(shape: &[usize], mut f: F) -> Self
    where
        F: FnMut(&[usize]) -> T,
    {
        Self {
            data: Array::from_shape_fn(IxDyn(shape), |idx| f(idx.slice())),
        }
    }

    /// Create a tensor filled with `value`
    pub fn from_elem(shape: &[usize], value: T) -> Self {
        Self {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    /// Create a tensor of zeros
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// Create a tensor of ones
    pub fn ones(shape: &[usize]) -> Self {
        Self {
            data: Array::ones(IxDyn(shape)),
        }
    }

    /// Number of axes
    pub fn order(&self) -> usize {
        self.data.ndim()
    }

    /// Extent of every axis
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Size of the batch axis (axis 0), if present
    pub fn batch_size(&self) -> Option<usize> {
        self.shape().first().copied()
    }

    /// Size of the channel axis (axis 1), if present
    pub fn channels(&self) -> Option<usize> {
        self.shape().get(1).copied()
    }

    /// Extents of the spatial/spectral axes (axes 2..)
    pub fn spatial_shape(&self) -> &[usize] {
        self.shape().get(2..).unwrap_or(&[])
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when some axis has extent zero
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_array(&self) -> &Array<T, IxDyn> {
        &self.data
    }

    pub fn into_array(self) -> Array<T, IxDyn> {
        self.data
    }

    pub fn view(&self) -> ArrayView<'_, T, IxDyn> {
        self.data.view()
    }

    /// Bounds-checked element access
    ///
    /// Returns `None` for a wrong number of indices or an out-of-range index.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.order() {
            return None;
        }
        if index.iter().zip(self.shape()).any(|(&i, &n)| i >= n) {
            return None;
        }
        Some(&self.data[IxDyn(index)])
    }

    /// Element-wise difference of two tensors of identical shape
    pub fn try_sub(&self, other: &Self) -> anyhow::Result<Self> {
        if self.shape() != other.shape() {
            anyhow::bail!(
                "Cannot subtract tensors of shapes {:?} and {:?}",
                self.shape(),
                other.shape()
            );
        }
        Ok(Self {
            data: &self.data - &other.data,
        })
    }
}

impl<T> DenseND<T>
where
    T: Float,
{
    /// Frobenius norm: sqrt of the sum of squared entries
    pub fn frobenius_norm(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| acc + x * x)
            .sqrt()
    }

    /// Largest absolute entry-wise difference, or `None` on shape mismatch
    pub fn max_abs_diff(&self, other: &Self) -> Option<T> {
        if self.shape() != other.shape() {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(other.data.iter())
                .fold(T::zero(), |acc, (&a, &b)| acc.max((a - b).abs())),
        )
    }
}

impl<T> std::ops::Index<&[usize]> for DenseND<T> {
    type Output = T;

    fn index(&self, index: &[usize]) -> &Self::Output {
        &self.data[IxDyn(index)]
    }
}

impl<T> std::ops::IndexMut<&[usize]> for DenseND<T> {
    fn index_mut(&mut self, index: &[usize]) -> &mut Self::Output {
        &mut self.data[IxDyn(index)]
    }
}

impl<T: fmt::Debug> fmt::Debug for DenseND<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseND")
            .field("shape", &self.data.shape())
            .field("data", &self.data)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_shape_mismatch() {
        let result = DenseND::from_vec(vec![1.0, 2.0, 3.0], &[2, 2]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("requires 4 elements"));
    }

    #[test]
    fn test_axis_accessors() {
        let x = DenseND::<f64>::zeros(&[4, 8, 16, 9]);
        assert_eq!(x.batch_size(), Some(4));
        assert_eq!(x.channels(), Some(8));
        assert_eq!(x.spatial_shape(), &[16, 9]);

        let v = DenseND::<f64>::zeros(&[5]);
        assert_eq!(v.channels(), None);
        assert!(v.spatial_shape().is_empty());
    }

    #[test]
    fn test_from_shape_fn_row_major() {
        let t = DenseND::<f64>::from_shape_fn(&[2, 3], |idx| (idx[0] * 3 + idx[1]) as f64);
        let expected = DenseND::from_vec(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0], &[2, 3]).unwrap();
        assert_eq!(t, expected);
    }

    #[test]
    fn test_get_bounds() {
        let t = DenseND::from_elem(&[3, 4], 5.0);
        assert_eq!(t.get(&[2, 3]), Some(&5.0));
        assert_eq!(t.get(&[3, 0]), None);
        assert_eq!(t.get(&[0]), None);
    }

    #[test]
    fn test_max_abs_diff() {
        let a = DenseND::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        let b = DenseND::from_vec(vec![1.0, 2.5, 2.0], &[3]).unwrap();
        assert_eq!(a.max_abs_diff(&b), Some(1.0));
        assert_eq!(a.max_abs_diff(&DenseND::zeros(&[1, 3])), None);
    }

    #[test]
    fn test_frobenius_norm() {
        let t = DenseND::<f64>::ones(&[2, 3]);
        assert!((t.frobenius_norm() - 6.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_try_sub() {
        let a = DenseND::<f64>::ones(&[2, 2]);
        let b = DenseND::<f64>::ones(&[2, 2]);
        let d = a.try_sub(&b).unwrap();
        assert_eq!(d.frobenius_norm(), 0.0);
        assert!(a.try_sub(&DenseND::ones(&[4])).is_err());
    }
}
