//! # specconv-core
//!
//! Core tensor type for the spectral convolution contraction stack.
//!
//! [`DenseND`] is the operand and result type of every contraction: the input
//! activations `x`, dense spectral weights, the sub-tensors of factorized
//! weights, and the contraction output all share it.
//!
//! ## Quick Start
//!
//! ```
//! use specconv_core::DenseND;
//!
//! let x = DenseND::<f64>::from_shape_fn(&[2, 3, 4], |idx| idx.iter().sum::<usize>() as f64);
//! assert_eq!(x.shape(), &[2, 3, 4]);
//! assert_eq!(x[&[1, 2, 3]], 6.0);
//! ```

pub mod dense;

pub use dense::DenseND;
