//! Weight representations handed to spectral contractions

use crate::cp::CpWeight;
use crate::kind::FactorizationKind;
use crate::tt::TtWeight;
use crate::tucker::TuckerWeight;
use anyhow::Result;
use scirs2_core::numeric::Num;
use specconv_core::DenseND;
use std::borrow::Cow;

/// A weight stored in one of the recognized factorized forms
#[derive(Debug, Clone, PartialEq)]
pub enum FactorizedWeight<T> {
    Dense(DenseND<T>),
    Cp(CpWeight<T>),
    Tucker(TuckerWeight<T>),
    Tt(TtWeight<T>),
}

impl<T> FactorizedWeight<T>
where
    T: Clone + Num,
{
    pub fn kind(&self) -> FactorizationKind {
        match self {
            FactorizedWeight::Dense(_) => FactorizationKind::Dense,
            FactorizedWeight::Cp(_) => FactorizationKind::Cp,
            FactorizedWeight::Tucker(_) => FactorizationKind::Tucker,
            FactorizedWeight::Tt(_) => FactorizationKind::Tt,
        }
    }

    /// Kind tag as a name, e.g. `"CP"`
    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Shape of the represented dense weight
    pub fn shape(&self) -> Vec<usize> {
        match self {
            FactorizedWeight::Dense(t) => t.shape().to_vec(),
            FactorizedWeight::Cp(cp) => cp.shape(),
            FactorizedWeight::Tucker(tucker) => tucker.shape(),
            FactorizedWeight::Tt(tt) => tt.shape(),
        }
    }

    pub fn num_parameters(&self) -> usize {
        match self {
            FactorizedWeight::Dense(t) => t.len(),
            FactorizedWeight::Cp(cp) => cp.num_parameters(),
            FactorizedWeight::Tucker(tucker) => tucker.num_parameters(),
            FactorizedWeight::Tt(tt) => tt.num_parameters(),
        }
    }

    pub fn compression_ratio(&self) -> f64 {
        let full_size: usize = self.shape().iter().product();
        full_size as f64 / self.num_parameters() as f64
    }

    /// Dense tensor this weight represents
    pub fn to_tensor(&self) -> Result<DenseND<T>> {
        match self {
            FactorizedWeight::Dense(t) => Ok(t.clone()),
            FactorizedWeight::Cp(cp) => cp.to_tensor(),
            FactorizedWeight::Tucker(tucker) => tucker.to_tensor(),
            FactorizedWeight::Tt(tt) => tt.to_tensor(),
        }
    }
}

/// Weight of a spectral convolution: a plain tensor or a factorized one
///
/// # Examples
///
/// ```
/// use specconv_core::DenseND;
/// use specconv_factor::{CpWeight, FactorizationKind, Weight};
///
/// let plain: Weight<f64> = DenseND::ones(&[3, 4, 5]).into();
/// assert!(plain.is_tensor());
///
/// let cp: Weight<f64> = CpWeight::new(
///     DenseND::ones(&[2]),
///     vec![DenseND::ones(&[3, 2]), DenseND::ones(&[4, 2]), DenseND::ones(&[5, 2])],
/// )
/// .unwrap()
/// .into();
/// assert_eq!(cp.kind(), Some(FactorizationKind::Cp));
/// assert_eq!(cp.materialize().unwrap().shape(), &[3, 4, 5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Weight<T> {
    Tensor(DenseND<T>),
    Factorized(FactorizedWeight<T>),
}

impl<T> Weight<T>
where
    T: Clone + Num,
{
    pub fn is_tensor(&self) -> bool {
        matches!(self, Weight::Tensor(_))
    }

    /// Factorization kind, `None` for a plain tensor
    pub fn kind(&self) -> Option<FactorizationKind> {
        match self {
            Weight::Tensor(_) => None,
            Weight::Factorized(f) => Some(f.kind()),
        }
    }

    pub fn as_factorized(&self) -> Option<&FactorizedWeight<T>> {
        match self {
            Weight::Tensor(_) => None,
            Weight::Factorized(f) => Some(f),
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        match self {
            Weight::Tensor(t) => t.shape().to_vec(),
            Weight::Factorized(f) => f.shape(),
        }
    }

    pub fn num_parameters(&self) -> usize {
        match self {
            Weight::Tensor(t) => t.len(),
            Weight::Factorized(f) => f.num_parameters(),
        }
    }

    /// Borrow a plain tensor as is, reconstruct anything else
    pub fn materialize(&self) -> Result<Cow<'_, DenseND<T>>> {
        match self {
            Weight::Tensor(t) => Ok(Cow::Borrowed(t)),
            Weight::Factorized(FactorizedWeight::Dense(t)) => Ok(Cow::Borrowed(t)),
            Weight::Factorized(f) => f.to_tensor().map(Cow::Owned),
        }
    }
}

impl<T> From<DenseND<T>> for Weight<T> {
    fn from(tensor: DenseND<T>) -> Self {
        Weight::Tensor(tensor)
    }
}

impl<T> From<FactorizedWeight<T>> for Weight<T> {
    fn from(weight: FactorizedWeight<T>) -> Self {
        Weight::Factorized(weight)
    }
}

macro_rules! impl_from_factorization {
    ($ty:ident, $variant:ident) => {
        impl<T> From<$ty<T>> for FactorizedWeight<T> {
            fn from(weight: $ty<T>) -> Self {
                FactorizedWeight::$variant(weight)
            }
        }

        impl<T> From<$ty<T>> for Weight<T> {
            fn from(weight: $ty<T>) -> Self {
                Weight::Factorized(FactorizedWeight::$variant(weight))
            }
        }
    };
}

impl_from_factorization!(CpWeight, Cp);
impl_from_factorization!(TuckerWeight, Tucker);
impl_from_factorization!(TtWeight, Tt);

#[cfg(test)]
mod tests {
    use super::*;

    fn cp() -> CpWeight<f64> {
        CpWeight::new(
            DenseND::from_vec(vec![1.0, 0.5], &[2]).unwrap(),
            vec![DenseND::ones(&[3, 2]), DenseND::ones(&[4, 2])],
        )
        .unwrap()
    }

    #[test]
    fn test_plain_tensor_is_borrowed() {
        let w: Weight<f64> = DenseND::ones(&[3, 4]).into();
        assert_eq!(w.kind(), None);
        assert!(matches!(w.materialize().unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_factorized_dense_is_borrowed() {
        let w = Weight::Factorized(FactorizedWeight::Dense(DenseND::<f64>::ones(&[2, 2])));
        assert_eq!(w.kind(), Some(FactorizationKind::Dense));
        assert!(matches!(w.materialize().unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_cp_is_reconstructed() {
        let w: Weight<f64> = cp().into();
        assert_eq!(w.as_factorized().map(|f| f.name()), Some("CP"));
        assert_eq!(w.shape(), vec![3, 4]);
        assert_eq!(w.num_parameters(), 2 + 6 + 8);

        let full = w.materialize().unwrap();
        assert!(matches!(full, Cow::Owned(_)));
        assert!((full[&[2, 3]] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_compression_ratio_of_dense_is_one() {
        let f = FactorizedWeight::Dense(DenseND::<f64>::ones(&[4, 4]));
        assert_eq!(f.compression_ratio(), 1.0);
        assert_eq!(f.to_tensor().unwrap().shape(), &[4, 4]);
    }
}
