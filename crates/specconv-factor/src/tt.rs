//! Tensor-Train weights
//!
//! W(i₁, ..., iₙ) = G₁\[i₁\] × G₂\[i₂\] × ... × Gₙ\[iₙ\]
//!
//! Core Gₖ has shape (rₖ₋₁, Iₖ, rₖ) with boundary bonds r₀ = rₙ = 1.

use crate::error::FactorError;
use anyhow::Result;
use scirs2_core::ndarray_ext::Array3;
use scirs2_core::numeric::Num;
use specconv_core::DenseND;
use specconv_einsum::{einsum, render, SymbolAllocator};

/// Tensor-Train-factorized weight
#[derive(Debug, Clone, PartialEq)]
pub struct TtWeight<T> {
    cores: Vec<DenseND<T>>,
}

impl<T> TtWeight<T>
where
    T: Clone + Num,
{
    /// Build a TT weight from its cores
    ///
    /// # Errors
    ///
    /// Every core must be 3-way, adjacent cores must agree on their shared
    /// bond, bonds must be positive and both boundary bonds must be 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use specconv_core::DenseND;
    /// use specconv_factor::TtWeight;
    ///
    /// let tt = TtWeight::new(vec![
    ///     DenseND::<f64>::ones(&[1, 4, 2]),
    ///     DenseND::ones(&[2, 5, 3]),
    ///     DenseND::ones(&[3, 6, 1]),
    /// ])
    /// .unwrap();
    /// assert_eq!(tt.ranks(), vec![2, 3]);
    /// assert_eq!(tt.shape(), vec![4, 5, 6]);
    /// ```
    pub fn new(cores: Vec<DenseND<T>>) -> Result<Self, FactorError> {
        if cores.is_empty() {
            return Err(FactorError::Empty("TT weight needs at least one core"));
        }

        for (k, core) in cores.iter().enumerate() {
            if core.order() != 3 {
                return Err(FactorError::ShapeMismatch(format!(
                    "TT core {} must be 3-way, got shape {:?}",
                    k,
                    core.shape()
                )));
            }
            if core.shape()[0] == 0 || core.shape()[2] == 0 {
                return Err(FactorError::RankMismatch(format!(
                    "TT core {} has a zero bond: {:?}",
                    k,
                    core.shape()
                )));
            }
        }

        for (k, pair) in cores.windows(2).enumerate() {
            let right = pair[0].shape()[2];
            let left = pair[1].shape()[0];
            if right != left {
                return Err(FactorError::RankMismatch(format!(
                    "TT cores {} and {} disagree on their bond: {} vs {}",
                    k,
                    k + 1,
                    right,
                    left
                )));
            }
        }

        let first = cores[0].shape()[0];
        let last = cores[cores.len() - 1].shape()[2];
        if first != 1 || last != 1 {
            return Err(FactorError::RankMismatch(format!(
                "TT boundary bonds must be 1, got {} and {}",
                first, last
            )));
        }

        let tt = Self { cores };
        if tt.compression_ratio() < 1.0 {
            log::warn!(
                "TT weight with ranks {:?} stores {} parameters for a dense shape {:?}",
                tt.ranks(),
                tt.num_parameters(),
                tt.shape()
            );
        }
        Ok(tt)
    }

    pub fn from_arrays(cores: Vec<Array3<T>>) -> Result<Self, FactorError> {
        Self::new(
            cores
                .into_iter()
                .map(|c| DenseND::from_array(c.into_dyn()))
                .collect(),
        )
    }

    pub fn cores(&self) -> &[DenseND<T>] {
        &self.cores
    }

    /// Interior bond dimensions [r₁, ..., rₙ₋₁]
    pub fn ranks(&self) -> Vec<usize> {
        self.cores[..self.cores.len() - 1]
            .iter()
            .map(|c| c.shape()[2])
            .collect()
    }

    /// Shape of the represented dense weight
    pub fn shape(&self) -> Vec<usize> {
        self.cores.iter().map(|c| c.shape()[1]).collect()
    }

    pub fn num_parameters(&self) -> usize {
        self.cores.iter().map(|c| c.len()).sum()
    }

    pub fn compression_ratio(&self) -> f64 {
        let full_size: usize = self.shape().iter().product();
        full_size as f64 / self.num_parameters() as f64
    }

    /// Materialize the dense weight by contracting the bond chain
    pub fn to_tensor(&self) -> Result<DenseND<T>> {
        let n = self.cores.len();
        let mut symbols = SymbolAllocator::new();
        let mode_syms = symbols.fresh_n(n);
        let bond_syms = symbols.fresh_n(n + 1);

        let operands = (0..n)
            .map(|k| render(&[bond_syms[k], mode_syms[k], bond_syms[k + 1]]))
            .collect::<Result<Vec<_>, _>>()?;
        let eq = format!("{}->{}", operands.join(","), render(&mode_syms)?);

        let inputs: Vec<&DenseND<T>> = self.cores.iter().collect();

        log::debug!("reconstructing TT weight: {}", eq);
        einsum(&eq, &inputs)
    }
}
