//! # specconv - Spectral Convolution Contractions
//!
//! This is the **meta crate** that re-exports all specconv components.
//!
//! A spectral convolution multiplies the retained Fourier (or spherical
//! harmonic) modes of its input by a learned weight. The weight may be a full
//! tensor or a low-rank factorization; this stack builds the matching
//! einsum contraction and evaluates it.
//!
//! ## Quick Start
//!
//! ```
//! use specconv::prelude::*;
//!
//! // in=3, out=4, 6 modes, stored as a rank-2 CP factorization
//! let weight: Weight<f64> = CpWeight::new(
//!     DenseND::ones(&[2]),
//!     vec![DenseND::ones(&[3, 2]), DenseND::ones(&[4, 2]), DenseND::ones(&[6, 2])],
//! )?
//! .into();
//!
//! let config = ContractionConfig::parse("factorized", false, "diagonal")?;
//! let mut layer = SpectralContraction::new(&weight, config)?;
//!
//! let x = DenseND::<f64>::ones(&[8, 3, 6]);
//! let y = layer.forward(&x, &weight)?;
//! assert_eq!(y.shape(), &[8, 4, 6]);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! ### Tensors ([`core`])
//!
//! `DenseND<T>`, a dense N-d tensor over real or complex coefficients.
//!
//! ### Einsum engine ([`einsum`])
//!
//! Equation parsing, index labels, pairwise contraction paths and the CPU
//! executor.
//!
//! ```
//! use specconv::einsum::einsum;
//! use specconv::core::DenseND;
//!
//! let a = DenseND::<f64>::ones(&[2, 3]);
//! let b = DenseND::<f64>::ones(&[3, 4]);
//! let c = einsum("ij,jk->ik", &[&a, &b]).unwrap();
//! assert_eq!(c[&[1, 3]], 3.0);
//! ```
//!
//! ### Weights ([`factor`])
//!
//! Dense, CP, Tucker and Tensor-Train weight representations.
//!
//! ### Contractions ([`contract`])
//!
//! Index layouts, the four contraction builders and their dispatcher.
//!
//! ```
//! use specconv::contract::{dense_layout, OperatorType};
//!
//! let layout = dense_layout(4, false, OperatorType::Diagonal).unwrap();
//! assert_eq!(layout.equation().unwrap(), "abcd,becd->aecd");
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for configuration types and layouts

pub use specconv_contract as contract;
pub use specconv_core as core;
pub use specconv_einsum as einsum;
pub use specconv_factor as factor;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use specconv::prelude::*;
    //!
    //! let layout = dense_layout(3, false, OperatorType::Diagonal).unwrap();
    //! assert_eq!(layout.equation().unwrap(), "abc,bdc->adc");
    //! ```

    // Core types
    pub use crate::core::DenseND;

    // Engine
    pub use crate::einsum::{einsum, einsum_ex, CpuExecutor, EinsumExecutor, ExecHints, PathStrategy};

    // Weights
    pub use crate::factor::{
        CpWeight, FactorizationKind, FactorizedWeight, TtWeight, TuckerWeight, Weight,
    };

    // Contractions
    pub use crate::contract::{
        contract_cp, contract_dense, contract_tt, contract_tucker, cp_layout, dense_layout,
        select_contraction_function, select_contraction_function_str, tt_layout, tucker_layout,
        ContractError, ContractionConfig, ContractionKind, ContractionLayout, Implementation,
        OperatorType, SpectralContraction,
    };
}
