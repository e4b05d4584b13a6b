//! CP (Canonical Polyadic) weights
//!
//! A CP weight of rank R represents
//!
//! W ≈ Σᵣ λᵣ (u₁ᵣ ⊗ u₂ᵣ ⊗ ... ⊗ uₙᵣ)
//!
//! with a rank-weight vector λ of length R and factor matrices Uₖ of shape
//! (Iₖ, R). Factor order follows the axis order of the represented weight.

use crate::error::FactorError;
use anyhow::Result;
use scirs2_core::ndarray_ext::{Array1, Array2};
use scirs2_core::numeric::Num;
use specconv_core::DenseND;
use specconv_einsum::{einsum, render, SymbolAllocator};

/// CP-factorized weight
#[derive(Debug, Clone, PartialEq)]
pub struct CpWeight<T> {
    weights: DenseND<T>,
    factors: Vec<DenseND<T>>,
}

impl<T> CpWeight<T>
where
    T: Clone + Num,
{
    /// Build a CP weight from its rank weights and factor matrices
    ///
    /// # Errors
    ///
    /// - [`FactorError::Empty`] without factors
    /// - [`FactorError::ShapeMismatch`] if `weights` is not a vector or a factor is not a matrix
    /// - [`FactorError::RankMismatch`] if the rank is zero or a factor has a different column count
    ///
    /// # Examples
    ///
    /// ```
    /// use specconv_core::DenseND;
    /// use specconv_factor::CpWeight;
    ///
    /// let cp = CpWeight::new(
    ///     DenseND::<f64>::ones(&[2]),
    ///     vec![DenseND::ones(&[3, 2]), DenseND::ones(&[4, 2])],
    /// )
    /// .unwrap();
    /// assert_eq!(cp.rank(), 2);
    /// assert_eq!(cp.shape(), vec![3, 4]);
    /// ```
    pub fn new(weights: DenseND<T>, factors: Vec<DenseND<T>>) -> Result<Self, FactorError> {
        if factors.is_empty() {
            return Err(FactorError::Empty("CP weight needs at least one factor"));
        }
        if weights.order() != 1 {
            return Err(FactorError::ShapeMismatch(format!(
                "CP rank weights must be a vector, got shape {:?}",
                weights.shape()
            )));
        }

        let rank = weights.shape()[0];
        if rank == 0 {
            return Err(FactorError::RankMismatch("CP rank must be positive".to_string()));
        }

        for (mode, factor) in factors.iter().enumerate() {
            if factor.order() != 2 {
                return Err(FactorError::ShapeMismatch(format!(
                    "CP factor {} must be a matrix, got shape {:?}",
                    mode,
                    factor.shape()
                )));
            }
            if factor.shape()[1] != rank {
                return Err(FactorError::RankMismatch(format!(
                    "CP factor {} has {} columns, expected rank {}",
                    mode,
                    factor.shape()[1],
                    rank
                )));
            }
        }

        let cp = Self { weights, factors };
        if cp.compression_ratio() < 1.0 {
            log::warn!(
                "CP weight of rank {} stores {} parameters for a dense shape {:?}",
                rank,
                cp.num_parameters(),
                cp.shape()
            );
        }
        Ok(cp)
    }

    /// Build a CP weight from plain arrays
    pub fn from_arrays(weights: Array1<T>, factors: Vec<Array2<T>>) -> Result<Self, FactorError> {
        Self::new(
            DenseND::from_array(weights.into_dyn()),
            factors
                .into_iter()
                .map(|f| DenseND::from_array(f.into_dyn()))
                .collect(),
        )
    }

    /// Rank weights λ, of length R
    pub fn weights(&self) -> &DenseND<T> {
        &self.weights
    }

    /// Factor matrices, one (Iₖ, R) matrix per axis
    pub fn factors(&self) -> &[DenseND<T>] {
        &self.factors
    }

    pub fn rank(&self) -> usize {
        self.weights.shape()[0]
    }

    /// Shape of the represented dense weight
    pub fn shape(&self) -> Vec<usize> {
        self.factors.iter().map(|f| f.shape()[0]).collect()
    }

    pub fn num_parameters(&self) -> usize {
        self.weights.len() + self.factors.iter().map(|f| f.len()).sum::<usize>()
    }

    /// Dense element count over stored parameter count
    pub fn compression_ratio(&self) -> f64 {
        let full_size: usize = self.shape().iter().product();
        full_size as f64 / self.num_parameters() as f64
    }

    /// Materialize the dense weight with `r,ar,br,...->ab...`
    ///
    /// # Errors
    ///
    /// Fails when the weight has more axes than the einsum alphabet can label.
    pub fn to_tensor(&self) -> Result<DenseND<T>> {
        let mut symbols = SymbolAllocator::new();
        let rank_sym = symbols.fresh();
        let mode_syms = symbols.fresh_n(self.factors.len());

        let mut operands = vec![render(&[rank_sym])?];
        for &mode in &mode_syms {
            operands.push(render(&[mode, rank_sym])?);
        }
        let eq = format!("{}->{}", operands.join(","), render(&mode_syms)?);

        let mut inputs = Vec::with_capacity(self.factors.len() + 1);
        inputs.push(&self.weights);
        inputs.extend(self.factors.iter());

        log::debug!("reconstructing CP weight: {}", eq);
        einsum(&eq, &inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factor(rows: usize, rank: usize, offset: f64) -> DenseND<f64> {
        DenseND::from_shape_fn(&[rows, rank], |idx| offset + (idx[0] * rank + idx[1]) as f64 * 0.5)
    }

    #[test]
    fn test_reconstruct_matches_outer_products() {
        let weights = DenseND::from_vec(vec![2.0, -1.0], &[2]).unwrap();
        let factors = vec![factor(3, 2, 1.0), factor(2, 2, 0.5), factor(4, 2, -1.0)];
        let cp = CpWeight::new(weights, factors).unwrap();
        let full = cp.to_tensor().unwrap();
        assert_eq!(full.shape(), &[3, 2, 4]);

        for i in 0..3 {
            for j in 0..2 {
                for k in 0..4 {
                    let expected: f64 = (0..2)
                        .map(|r| {
                            cp.weights()[&[r]]
                                * cp.factors()[0][&[i, r]]
                                * cp.factors()[1][&[j, r]]
                                * cp.factors()[2][&[k, r]]
                        })
                        .sum();
                    assert!((full[&[i, j, k]] - expected).abs() < 1e-10);
                }
            }
        }
    }

    #[test]
    fn test_counts() {
        let cp = CpWeight::new(
            DenseND::<f64>::ones(&[3]),
            vec![factor(10, 3, 0.0), factor(10, 3, 0.0), factor(10, 3, 0.0)],
        )
        .unwrap();
        assert_eq!(cp.num_parameters(), 3 + 90);
        assert!((cp.compression_ratio() - 1000.0 / 93.0).abs() < 1e-12);
    }

    #[test]
    fn test_rank_mismatch() {
        let err = CpWeight::new(
            DenseND::<f64>::ones(&[2]),
            vec![factor(3, 2, 0.0), factor(4, 3, 0.0)],
        )
        .unwrap_err();
        assert!(matches!(err, FactorError::RankMismatch(_)));
        assert!(err.to_string().contains("factor 1"));
    }

    #[test]
    fn test_invalid_structure() {
        assert!(matches!(
            CpWeight::<f64>::new(DenseND::ones(&[2]), vec![]),
            Err(FactorError::Empty(_))
        ));
        assert!(matches!(
            CpWeight::new(DenseND::<f64>::ones(&[2, 1]), vec![factor(3, 2, 0.0)]),
            Err(FactorError::ShapeMismatch(_))
        ));
        assert!(matches!(
            CpWeight::new(DenseND::<f64>::ones(&[2]), vec![DenseND::ones(&[3, 2, 1])]),
            Err(FactorError::ShapeMismatch(_))
        ));
        assert!(matches!(
            CpWeight::new(DenseND::<f64>::ones(&[0]), vec![DenseND::ones(&[3, 0])]),
            Err(FactorError::RankMismatch(_))
        ));
    }

    #[test]
    fn test_from_arrays() {
        let cp = CpWeight::from_arrays(
            Array1::from_vec(vec![1.0, 1.0]),
            vec![Array2::ones((3, 2)), Array2::ones((5, 2))],
        )
        .unwrap();
        assert_eq!(cp.shape(), vec![3, 5]);
        let full = cp.to_tensor().unwrap();
        assert_eq!(full[&[2, 4]], 2.0);
    }
}
