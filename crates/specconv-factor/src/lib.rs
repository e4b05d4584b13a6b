//! # specconv-factor
//!
//! Weight representations for spectral convolutions.
//!
//! A weight is either a plain [`DenseND`](specconv_core::DenseND) or a
//! [`FactorizedWeight`]:
//!
//! - [`CpWeight`] - rank weights plus one factor matrix per axis
//! - [`TuckerWeight`] - a core tensor plus one factor matrix per axis
//! - [`TtWeight`] - a chain of 3-way cores linked by bond indices
//!
//! Every form validates its structure on construction, reports the shape of
//! the dense weight it stands for, and reconstructs that weight through the
//! einsum engine.

pub mod cp;
pub mod error;
pub mod kind;
pub mod tt;
pub mod tucker;
pub mod weight;


pub use cp::CpWeight;
pub use error::FactorError;
pub use kind::FactorizationKind;
pub use tt::TtWeight;
pub use tucker::TuckerWeight;
pub use weight::{FactorizedWeight, Weight};
