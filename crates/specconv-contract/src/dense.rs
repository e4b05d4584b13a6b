//! Contraction against a full weight tensor
//!
//! The weight carries the channel axis, the spatial axes and (unless
//! separable) an output-channel axis at position 1:
//!
//! | order | separable | operator type  | equation          |
//! |-------|-----------|----------------|-------------------|
//! | 3     | no        | diagonal       | `abc,bdc->adc`    |
//! | 3     | no        | block-diagonal | `abc,bdec->ade`   |
//! | 3     | no        | vector         | `abc,bd->adc`     |
//! | 3     | yes       | diagonal       | `abc,bc->abc`     |

use crate::config::OperatorType;
use crate::error::ContractResult;
use crate::layout::{execute, weight_symbols, ContractionLayout, WeightSymbols};
use scirs2_core::numeric::Num;
use specconv_core::DenseND;
use specconv_einsum::{CpuExecutor, EinsumExecutor, ExecHints, SymbolAllocator};
use specconv_factor::Weight;

/// Index layout of the dense contraction for an input of `order` axes
///
/// # Errors
///
/// [`ContractError::OrderTooSmall`](crate::ContractError::OrderTooSmall) below
/// order 2, or below order 3 for the block-diagonal and vector operator types.
///
/// # Examples
///
/// ```
/// use specconv_contract::{dense_layout, OperatorType};
///
/// let layout = dense_layout(3, false, OperatorType::Diagonal).unwrap();
/// assert_eq!(layout.equation().unwrap(), "abc,bdc->adc");
/// ```
pub fn dense_layout(
    order: usize,
    separable: bool,
    operator_type: OperatorType,
) -> ContractResult<ContractionLayout> {
    let mut symbols = SymbolAllocator::new();
    let WeightSymbols { x, weight, output } =
        weight_symbols(&mut symbols, order, separable, operator_type)?;
    Ok(ContractionLayout {
        operands: vec![x, weight],
        output,
    })
}

/// Contract `x` with a dense weight
///
/// A factorized `weight` is reconstructed to its dense tensor first, which
/// is how the reconstructed implementation serves every weight kind.
///
/// # Examples
///
/// ```
/// use specconv_contract::{contract_dense, OperatorType};
/// use specconv_core::DenseND;
/// use specconv_factor::Weight;
///
/// let x = DenseND::<f64>::ones(&[2, 3, 4]);
/// let w = Weight::Tensor(DenseND::ones(&[3, 5, 4]));
/// let y = contract_dense(&x, &w, false, OperatorType::Diagonal).unwrap();
/// assert_eq!(y.shape(), &[2, 5, 4]);
/// assert_eq!(y[&[1, 4, 3]], 3.0);
/// ```
pub fn contract_dense<T>(
    x: &DenseND<T>,
    weight: &Weight<T>,
    separable: bool,
    operator_type: OperatorType,
) -> ContractResult<DenseND<T>>
where
    T: Clone + Num,
{
    contract_dense_with(
        &mut CpuExecutor::new(),
        &ExecHints::default(),
        x,
        weight,
        separable,
        operator_type,
    )
}

/// [`contract_dense`] on a caller-provided executor
pub fn contract_dense_with<T, E>(
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
    let layout = dense_layout(x.order(), separable, operator_type)?;
    let weight = weight.materialize()?;
    execute(executor, hints, "dense", &layout, &[x, &*weight])
}
