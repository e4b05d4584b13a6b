//! Tucker weights
//!
//! W ≈ G ×₁ U₁ ×₂ U₂ ×₃ ... ×ₙ Uₙ, with a core G of shape (R₁, ..., Rₙ) and
//! factor matrices Uₖ of shape (Iₖ, Rₖ).

use crate::error::FactorError;
use anyhow::Result;
use scirs2_core::ndarray_ext::Array2;
use scirs2_core::numeric::Num;
use specconv_core::DenseND;
use specconv_einsum::{einsum, render, SymbolAllocator};

/// Tucker-factorized weight
#[derive(Debug, Clone, PartialEq)]
pub struct TuckerWeight<T> {
    core: DenseND<T>,
    factors: Vec<DenseND<T>>,
}

impl<T> TuckerWeight<T>
where
    T: Clone + Num,
{
    /// Build a Tucker weight from its core and factor matrices
    ///
    /// The core needs one axis per factor, and factor `k` needs as many
    /// columns as core axis `k` has entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use specconv_core::DenseND;
    /// use specconv_factor::TuckerWeight;
    ///
    /// let tucker = TuckerWeight::new(
    ///     DenseND::<f64>::ones(&[2, 3]),
    ///     vec![DenseND::ones(&[5, 2]), DenseND::ones(&[6, 3])],
    /// )
    /// .unwrap();
    /// assert_eq!(tucker.ranks(), &[2, 3]);
    /// assert_eq!(tucker.shape(), vec![5, 6]);
    /// ```
    pub fn new(core: DenseND<T>, factors: Vec<DenseND<T>>) -> Result<Self, FactorError> {
        if factors.is_empty() {
            return Err(FactorError::Empty("Tucker weight needs at least one factor"));
        }
        if core.order() != factors.len() {
            return Err(FactorError::ShapeMismatch(format!(
                "Tucker core has {} axes but {} factors were given",
                core.order(),
                factors.len()
            )));
        }
        if core.shape().contains(&0) {
            return Err(FactorError::RankMismatch(format!(
                "Tucker ranks must be positive, got core shape {:?}",
                core.shape()
            )));
        }

        for (mode, (factor, &rank)) in factors.iter().zip(core.shape()).enumerate() {
            if factor.order() != 2 {
                return Err(FactorError::ShapeMismatch(format!(
                    "Tucker factor {} must be a matrix, got shape {:?}",
                    mode,
                    factor.shape()
                )));
            }
            if factor.shape()[1] != rank {
                return Err(FactorError::RankMismatch(format!(
                    "Tucker factor {} has {} columns, core axis {} has {}",
                    mode,
                    factor.shape()[1],
                    mode,
                    rank
                )));
            }
        }

        let tucker = Self { core, factors };
        if tucker.compression_ratio() < 1.0 {
            log::warn!(
                "Tucker weight with ranks {:?} stores {} parameters for a dense shape {:?}",
                tucker.ranks(),
                tucker.num_parameters(),
                tucker.shape()
            );
        }
        Ok(tucker)
    }

    /// Build a Tucker weight from a core and plain factor matrices
    pub fn from_arrays(core: DenseND<T>, factors: Vec<Array2<T>>) -> Result<Self, FactorError> {
        Self::new(
            core,
            factors
                .into_iter()
                .map(|f| DenseND::from_array(f.into_dyn()))
                .collect(),
        )
    }

    pub fn core(&self) -> &DenseND<T> {
        &self.core
    }

    pub fn factors(&self) -> &[DenseND<T>] {
        &self.factors
    }

    /// Multilinear ranks (the core shape)
    pub fn ranks(&self) -> &[usize] {
        self.core.shape()
    }

    /// Shape of the represented dense weight
    pub fn shape(&self) -> Vec<usize> {
        self.factors.iter().map(|f| f.shape()[0]).collect()
    }

    pub fn num_parameters(&self) -> usize {
        self.core.len() + self.factors.iter().map(|f| f.len()).sum::<usize>()
    }

    pub fn compression_ratio(&self) -> f64 {
        let full_size: usize = self.shape().iter().product();
        full_size as f64 / self.num_parameters() as f64
    }

    /// Materialize the dense weight by contracting every factor into the core
    pub fn to_tensor(&self) -> Result<DenseND<T>> {
        let n = self.factors.len();
        let mut symbols = SymbolAllocator::new();
        let mode_syms = symbols.fresh_n(n);
        let core_syms = symbols.fresh_n(n);

        let mut operands = vec![render(&core_syms)?];
        for (&mode, &rank) in mode_syms.iter().zip(&core_syms) {
            operands.push(render(&[mode, rank])?);
        }
        let eq = format!("{}->{}", operands.join(","), render(&mode_syms)?);

        let mut inputs = Vec::with_capacity(n + 1);
        inputs.push(&self.core);
        inputs.extend(self.factors.iter());

        log::debug!("reconstructing Tucker weight: {}", eq);
        einsum(&eq, &inputs)
    }
}
