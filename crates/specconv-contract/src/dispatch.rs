//! Selection of the contraction that matches a weight
//!
//! [`select_contraction_function`] runs once per layer; the returned
//! [`ContractionKind`] is then invoked on every forward pass.

use crate::config::{Implementation, OperatorType};
use crate::cp::{contract_cp_with, cp_layout};
use crate::dense::{contract_dense_with, dense_layout};
use crate::error::{ContractError, ContractResult};
use crate::layout::ContractionLayout;
use crate::tt::{contract_tt_with, tt_layout};
use crate::tucker::{contract_tucker_with, tucker_layout};
use scirs2_core::numeric::Num;
use specconv_core::DenseND;
use specconv_einsum::{CpuExecutor, EinsumExecutor, ExecHints};
use specconv_factor::{FactorizationKind, FactorizedWeight, Weight};
use std::fmt;

/// One of the four contraction builders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContractionKind {
    Dense,
    Cp,
    Tucker,
    Tt,
}

impl ContractionKind {
    pub fn name(self) -> &'static str {
        match self {
            ContractionKind::Dense => "dense",
            ContractionKind::Cp => "CP",
            ContractionKind::Tucker => "Tucker",
            ContractionKind::Tt => "TT",
        }
    }

    /// Builder that contracts weights of the given factorization directly
    pub fn for_factorization(kind: FactorizationKind) -> Self {
        match kind {
            FactorizationKind::Dense => ContractionKind::Dense,
            FactorizationKind::Cp => ContractionKind::Cp,
            FactorizationKind::Tucker => ContractionKind::Tucker,
            FactorizationKind::Tt => ContractionKind::Tt,
        }
    }

    /// Index layout this builder uses for an input of `order` axes
    pub fn layout(
        self,
        order: usize,
        separable: bool,
        operator_type: OperatorType,
    ) -> ContractResult<ContractionLayout> {
        match self {
            ContractionKind::Dense => dense_layout(order, separable, operator_type),
            ContractionKind::Cp => cp_layout(order, separable, operator_type),
            ContractionKind::Tucker => tucker_layout(order, separable, operator_type),
            ContractionKind::Tt => tt_layout(order, separable, operator_type),
        }
    }

    /// Contract `x` with `weight`
    ///
    /// The dense builder accepts every weight; the factorized builders need a
    /// weight stored in their own form.
    pub fn contract<T>(
        self,
        x: &DenseND<T>,
        weight: &Weight<T>,
        separable: bool,
        operator_type: OperatorType,
    ) -> ContractResult<DenseND<T>>
    where
        T: Clone + Num,
    {
        self.contract_with(
            &mut CpuExecutor::new(),
            &ExecHints::default(),
            x,
            weight,
            separable,
            operator_type,
        )
    }

    /// [`ContractionKind::contract`] on a caller-provided executor
    ///
    /// # Errors
    ///
    /// [`ContractError::UnsupportedWeightKind`] when a factorized builder
    /// receives a weight of another form.
    pub fn contract_with<T, E>(
        self,
        executor: &mut E,
        hints: &ExecHints,
        x: &DenseND<T>,
        weight: &Weight<T>,
        separable: bool,
        operator_type: OperatorType,
    ) -> ContractResult<DenseND<T>>
    where
        T: Clone + Num,
        E: EinsumExecutor<T> + ?Sized,
    {
        let factorized = weight.as_factorized();
        match (self, factorized) {
            (ContractionKind::Dense, _) => {
                contract_dense_with(executor, hints, x, weight, separable, operator_type)
            }
            (ContractionKind::Cp, Some(FactorizedWeight::Cp(cp))) => {
                contract_cp_with(executor, hints, x, cp, separable, operator_type)
            }
            (ContractionKind::Tucker, Some(FactorizedWeight::Tucker(tucker))) => {
                contract_tucker_with(executor, hints, x, tucker, separable, operator_type)
            }
            (ContractionKind::Tt, Some(FactorizedWeight::Tt(tt))) => {
                contract_tt_with(executor, hints, x, tt, separable, operator_type)
            }
            (kind, other) => Err(ContractError::UnsupportedWeightKind(format!(
                "{} contraction cannot use a {} weight",
                kind,
                other.map(|f| f.name()).unwrap_or("plain tensor")
            ))),
        }
    }
}

impl fmt::Display for ContractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pick the contraction builder for `weight`
///
/// The reconstructed implementation always uses the dense builder. The
/// factorized implementation uses the builder of the weight's own form, and
/// the dense builder for plain tensors.
///
/// # Examples
///
/// ```
/// use specconv_contract::{select_contraction_function, ContractionKind, Implementation};
/// use specconv_core::DenseND;
/// use specconv_factor::{TtWeight, Weight};
///
/// let tt: Weight<f64> = TtWeight::new(vec![DenseND::ones(&[1, 3, 1])]).unwrap().into();
/// assert_eq!(
///     select_contraction_function(&tt, Implementation::Reconstructed).unwrap(),
///     ContractionKind::Dense
/// );
/// assert_eq!(
///     select_contraction_function(&tt, Implementation::Factorized).unwrap(),
///     ContractionKind::Tt
/// );
/// ```
pub fn select_contraction_function<T>(
    weight: &Weight<T>,
    implementation: Implementation,
) -> ContractResult<ContractionKind>
where
    T: Clone + Num,
{
    let kind = match (implementation, weight.kind()) {
        (Implementation::Reconstructed, _) | (Implementation::Factorized, None) => {
            ContractionKind::Dense
        }
        (Implementation::Factorized, Some(factorization)) => {
            ContractionKind::for_factorization(factorization)
        }
    };
    log::debug!(
        "selected {} contraction for {} weight ({} implementation)",
        kind,
        weight.kind().map(|k| k.as_str()).unwrap_or("plain"),
        implementation
    );
    Ok(kind)
}

/// [`select_contraction_function`] with the implementation given by name
///
/// # Errors
///
/// [`ContractError::InvalidConfiguration`] for anything but `reconstructed`
/// or `factorized`.
pub fn select_contraction_function_str<T>(
    weight: &Weight<T>,
    implementation: &str,
) -> ContractResult<ContractionKind>
where
    T: Clone + Num,
{
    select_contraction_function(weight, implementation.parse()?)
}

/// Pick the builder from a weight's kind name, as found in layer configs
///
/// `None` stands for a plain tensor.
///
/// # Errors
///
/// [`ContractError::UnsupportedWeightKind`] for an unrecognized kind name
/// under the factorized implementation.
pub fn select_contraction_function_by_name(
    weight_kind: Option<&str>,
    implementation: Implementation,
) -> ContractResult<ContractionKind> {
    match (implementation, weight_kind) {
        (Implementation::Reconstructed, _) | (Implementation::Factorized, None) => {
            Ok(ContractionKind::Dense)
        }
        (Implementation::Factorized, Some(name)) => {
            let kind: FactorizationKind = name.parse()?;
            Ok(ContractionKind::for_factorization(kind))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specconv_factor::{CpWeight, TuckerWeight};

    fn cp_weight() -> Weight<f64> {
        CpWeight::new(
            DenseND::ones(&[2]),
            vec![DenseND::ones(&[3, 2]), DenseND::ones(&[4, 2]), DenseND::ones(&[5, 2])],
        )
        .unwrap()
        .into()
    }

    #[test]
    fn test_reconstructed_is_always_dense() {
        let plain: Weight<f64> = DenseND::ones(&[3, 4, 5]).into();
        for w in [plain, cp_weight()] {
            assert_eq!(
                select_contraction_function(&w, Implementation::Reconstructed).unwrap(),
                ContractionKind::Dense
            );
        }
    }

    #[test]
    fn test_factorized_follows_weight_form() {
        let plain: Weight<f64> = DenseND::ones(&[3, 4, 5]).into();
        let wrapped = Weight::Factorized(FactorizedWeight::Dense(DenseND::<f64>::ones(&[3, 4, 5])));
        let tucker: Weight<f64> = TuckerWeight::new(
            DenseND::ones(&[1, 1, 1]),
            vec![DenseND::ones(&[3, 1]), DenseND::ones(&[4, 1]), DenseND::ones(&[5, 1])],
        )
        .unwrap()
        .into();

        let select = |w: &Weight<f64>| select_contraction_function(w, Implementation::Factorized).unwrap();
        assert_eq!(select(&plain), ContractionKind::Dense);
        assert_eq!(select(&wrapped), ContractionKind::Dense);
        assert_eq!(select(&cp_weight()), ContractionKind::Cp);
        assert_eq!(select(&tucker), ContractionKind::Tucker);
    }

    #[test]
    fn test_invalid_implementation_string() {
        let err = select_contraction_function_str(&cp_weight(), "bogus").unwrap_err();
        assert!(matches!(err, ContractError::InvalidConfiguration(_)));
        assert_eq!(
            select_contraction_function_str(&cp_weight(), "Factorized").unwrap(),
            ContractionKind::Cp
        );
    }

    #[test]
    fn test_by_name() {
        assert_eq!(
            select_contraction_function_by_name(Some("ComplexTT"), Implementation::Factorized).unwrap(),
            ContractionKind::Tt
        );
        assert_eq!(
            select_contraction_function_by_name(Some("whatever"), Implementation::Reconstructed).unwrap(),
            ContractionKind::Dense
        );
        assert!(matches!(
            select_contraction_function_by_name(Some("ComplexBlockTT"), Implementation::Factorized),
            Err(ContractError::UnsupportedWeightKind(_))
        ));
    }

    #[test]
    fn test_kind_weight_mismatch() {
        let x = DenseND::<f64>::ones(&[1, 3, 5]);
        let plain: Weight<f64> = DenseND::ones(&[3, 4, 5]).into();
        let err = ContractionKind::Cp
            .contract(&x, &plain, false, OperatorType::Diagonal)
            .unwrap_err();
        assert!(matches!(err, ContractError::UnsupportedWeightKind(_)));
        assert!(err.to_string().contains("plain tensor"));

        let err = ContractionKind::Tt
            .contract(&x, &cp_weight(), false, OperatorType::Diagonal)
            .unwrap_err();
        assert!(err.to_string().contains("CP weight"));
    }

    #[test]
    fn test_dense_kind_accepts_factorized() {
        let x = DenseND::<f64>::ones(&[1, 3, 5]);
        let y = ContractionKind::Dense
            .contract(&x, &cp_weight(), false, OperatorType::Diagonal)
            .unwrap();
        // every reconstructed entry is 2, summed over 3 input channels
        assert_eq!(y.shape(), &[1, 4, 5]);
        assert!((y[&[0, 3, 4]] - 6.0).abs() < 1e-12);

        let z = ContractionKind::Cp
            .contract(&x, &cp_weight(), false, OperatorType::Diagonal)
            .unwrap();
        assert!(y.max_abs_diff(&z).unwrap() < 1e-12);
    }

    #[test]
    fn test_layout_dispatch() {
        assert_eq!(
            ContractionKind::Dense
                .layout(3, false, OperatorType::Diagonal)
                .unwrap()
                .equation()
                .unwrap(),
            "abc,bdc->adc"
        );
        assert!(matches!(
            ContractionKind::Tucker.layout(3, false, OperatorType::BlockDiagonal),
            Err(ContractError::NotImplemented(_))
        ));
    }
}
