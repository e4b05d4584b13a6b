//! # specconv-contract
//!
//! Contraction equations between a spectral convolution input and its
//! weight, for dense and factorized (CP, Tucker, Tensor-Train) weights.
//!
//! Inputs are laid out as `(batch, channels, modes...)`. Each builder turns
//! the input order, the separable flag and the [`OperatorType`] into a
//! [`ContractionLayout`], renders it as an einsum equation and evaluates it
//! on an [`EinsumExecutor`](specconv_einsum::EinsumExecutor).
//!
//! ```
//! use specconv_contract::{select_contraction_function, Implementation, OperatorType};
//! use specconv_core::DenseND;
//! use specconv_factor::Weight;
//!
//! let weight: Weight<f64> = DenseND::ones(&[3, 5, 4]).into();
//! let kind = select_contraction_function(&weight, Implementation::Factorized).unwrap();
//!
//! let x = DenseND::<f64>::ones(&[2, 3, 4]);
//! let y = kind.contract(&x, &weight, false, OperatorType::Diagonal).unwrap();
//! assert_eq!(y.shape(), &[2, 5, 4]);
//! ```
//!
//! Builders:
//!
//! - [`contract_dense`] - full weight; reconstructs factorized weights first
//! - [`contract_cp`] - rank weights and one factor per weight axis
//! - [`contract_tucker`] - core and one factor per core axis (diagonal only)
//! - [`contract_tt`] - one 3-way core per weight axis, chained by bonds

pub mod config;
pub mod cp;
pub mod dense;
pub mod dispatch;
pub mod error;
pub mod layer;
pub mod layout;
pub mod tt;
pub mod tucker;


pub use config::{ContractionConfig, Implementation, OperatorType};
pub use cp::{contract_cp, contract_cp_with, cp_layout};
pub use dense::{contract_dense, contract_dense_with, dense_layout};
pub use dispatch::{
    select_contraction_function, select_contraction_function_by_name,
    select_contraction_function_str, ContractionKind,
};
pub use error::{ContractError, ContractResult};
pub use layer::SpectralContraction;
pub use layout::ContractionLayout;
pub use tt::{contract_tt, contract_tt_with, tt_layout};
pub use tucker::{contract_tucker, contract_tucker_with, tucker_layout};
