//! Per-layer contraction handle

use crate::config::ContractionConfig;
use crate::dispatch::{select_contraction_function, ContractionKind};
use crate::error::ContractResult;
use crate::layout::ContractionLayout;
use scirs2_core::numeric::Num;
use specconv_core::DenseND;
use specconv_einsum::{CpuExecutor, EinsumExecutor, ExecHints};
use specconv_factor::Weight;

/// Contraction chosen once for a layer and run on every forward pass
///
/// # Examples
///
/// ```
/// use specconv_contract::{ContractionConfig, ContractionKind, Implementation, SpectralContraction};
/// use specconv_core::DenseND;
/// use specconv_factor::{CpWeight, Weight};
///
/// let weight: Weight<f64> = CpWeight::new(
///     DenseND::ones(&[2]),
///     vec![DenseND::ones(&[3, 2]), DenseND::ones(&[4, 2]), DenseND::ones(&[6, 2])],
/// )
/// .unwrap()
/// .into();
/// let config = ContractionConfig::new().with_implementation(Implementation::Factorized);
/// let mut layer = SpectralContraction::new(&weight, config).unwrap();
/// assert_eq!(layer.kind(), ContractionKind::Cp);
///
/// let x = DenseND::<f64>::ones(&[8, 3, 6]);
/// let y = layer.forward(&x, &weight).unwrap();
/// assert_eq!(y.shape(), &[8, 4, 6]);
/// ```
#[derive(Debug)]
pub struct SpectralContraction<E = CpuExecutor> {
    kind: ContractionKind,
    config: ContractionConfig,
    hints: ExecHints,
    executor: E,
}

impl SpectralContraction<CpuExecutor> {
    /// Select the contraction for `weight` under `config`
    pub fn new<T>(weight: &Weight<T>, config: ContractionConfig) -> ContractResult<Self>
    where
        T: Clone + Num,
    {
        Self::with_executor(weight, config, CpuExecutor::new())
    }
}

impl<E> SpectralContraction<E> {
    /// Select the contraction for `weight`, running it on `executor`
    pub fn with_executor<T>(
        weight: &Weight<T>,
        config: ContractionConfig,
        executor: E,
    ) -> ContractResult<Self>
    where
        T: Clone + Num,
    {
        let kind = select_contraction_function(weight, config.implementation)?;
        Ok(Self {
            kind,
            config,
            hints: ExecHints::default(),
            executor,
        })
    }

    pub fn with_hints(mut self, hints: ExecHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn kind(&self) -> ContractionKind {
        self.kind
    }

    pub fn config(&self) -> &ContractionConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Layout used for inputs of `order` axes
    pub fn layout(&self, order: usize) -> ContractResult<ContractionLayout> {
        self.kind
            .layout(order, self.config.separable, self.config.operator_type)
    }

    /// Contract one input batch with `weight`
    pub fn forward<T>(&mut self, x: &DenseND<T>, weight: &Weight<T>) -> ContractResult<DenseND<T>>
    where
        T: Clone + Num,
        E: EinsumExecutor<T>,
    {
        self.kind.contract_with(
            &mut self.executor,
            &self.hints,
            x,
            weight,
            self.config.separable,
            self.config.operator_type,
        )
    }
}
