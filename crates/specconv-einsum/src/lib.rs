//! # specconv-einsum
//!
//! Einsum engine for spectral convolution contractions.
//!
//! This crate provides:
//! - [`EinsumSpec`] - parser for equations over the 52-letter alphabet `a-zA-Z`
//! - [`Symbol`] / [`SymbolAllocator`] - integer-backed index labels
//! - [`plan_path`] - greedy or sequential pairwise contraction paths
//! - [`EinsumExecutor`] trait and the dense [`CpuExecutor`]
//! - [`einsum_ex`] - builder entry point for one-off evaluations

pub mod executor;
pub mod hints;
pub mod ops;
pub mod parser;
pub mod planner;
pub mod symbols;

pub use executor::*;
pub use hints::*;
pub use ops::execute_dense_contraction;
pub use parser::*;
pub use planner::*;
pub use symbols::*;

use scirs2_core::numeric::Num;
use specconv_core::DenseND;

/// Evaluate an einsum equation with default hints
///
/// ```
/// use specconv_core::DenseND;
///
/// let x = DenseND::<f64>::ones(&[2, 3, 4]);
/// let w = DenseND::<f64>::ones(&[3, 5, 4]);
/// let y = specconv_einsum::einsum("abc,bdc->adc", &[&x, &w]).unwrap();
/// assert_eq!(y.shape(), &[2, 5, 4]);
/// assert_eq!(y[&[0, 0, 0]], 3.0);
/// ```
pub fn einsum<T>(spec: &str, inputs: &[&DenseND<T>]) -> anyhow::Result<DenseND<T>>
where
    T: Clone + Num,
{
    CpuExecutor::new().einsum(spec, inputs, &ExecHints::default())
}

/// Execute an einsum contraction with hints
///
/// # Example
/// ```
/// use specconv_core::DenseND;
/// use specconv_einsum::{einsum_ex, ExecHints, PathStrategy};
///
/// let a = DenseND::<f64>::ones(&[2, 3]);
/// let b = DenseND::<f64>::ones(&[3, 4]);
/// let c = einsum_ex::<f64>("ij,jk->ik")
///     .inputs(&[&a, &b])
///     .hints(&ExecHints::new().with_path(PathStrategy::Direct))
///     .run()
///     .unwrap();
/// assert_eq!(c.shape(), &[2, 4]);
/// ```
pub fn einsum_ex<'a, T>(spec: &str) -> EinsumBuilder<'a, T>
where
    T: Clone + Num,
{
    EinsumBuilder::new(spec)
}

/// Builder for einsum operations
pub struct EinsumBuilder<'a, T> {
    spec: String,
    inputs: Option<&'a [&'a DenseND<T>]>,
    hints: ExecHints,
}

impl<'a, T> EinsumBuilder<'a, T>
where
    T: Clone + Num,
{
    pub fn new(spec: impl Into<String>) -> Self {
        Self {
            spec: spec.into(),
            inputs: None,
            hints: ExecHints::default(),
        }
    }

    /// Set input tensors, in equation order
    pub fn inputs(mut self, inputs: &'a [&'a DenseND<T>]) -> Self {
        self.inputs = Some(inputs);
        self
    }

    pub fn hints(mut self, hints: &ExecHints) -> Self {
        self.hints = hints.clone();
        self
    }

    /// Execute the einsum operation
    ///
    /// # Errors
    ///
    /// Returns an error if no inputs were provided, the input count doesn't
    /// match the equation, or execution fails.
    pub fn run(self) -> anyhow::Result<DenseND<T>> {
        let inputs = self
            .inputs
            .ok_or_else(|| anyhow::anyhow!("No inputs provided to einsum_ex"))?;

        CpuExecutor::new().einsum(&self.spec, inputs, &self.hints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_einsum_ex_builder_no_inputs() {
        let result = einsum_ex::<f64>("ij,jk->ik").run();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("No inputs provided"));
    }

    #[test]
    fn test_einsum_ex_three_tensors() {
        let a = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        let b = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2]).unwrap();
        let c = DenseND::from_vec(vec![1.0, 0.0, 0.0, 1.0], &[2, 2]).unwrap();

        let chained = einsum_ex::<f64>("ij,jk,kl->il")
            .inputs(&[&a, &b, &c])
            .run()
            .unwrap();
        let direct = einsum("ij,jk->ik", &[&a, &b]).unwrap();

        // c is the identity
        assert_eq!(chained, direct);
        // [1,2,3]·[1,3,5] = 22
        assert_eq!(direct[&[0, 0]], 22.0);
    }
}
