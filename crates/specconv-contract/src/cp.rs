//! Contraction against a CP weight without reconstructing it
//!
//! The rank index is shared by the rank-weight vector and every factor and
//! summed away; each factor pairs one weight axis with the rank index.

use crate::config::OperatorType;
use crate::error::{ContractError, ContractResult};
use crate::layout::{check_order, execute, ContractionLayout};
use scirs2_core::numeric::Num;
use specconv_core::DenseND;
use specconv_einsum::{CpuExecutor, EinsumExecutor, ExecHints, SymbolAllocator};
use specconv_factor::CpWeight;

/// Index layout of the CP contraction
///
/// Operands are the input, the rank weights, then one factor per weight
/// axis: input channel, output channel (unless separable), then the
/// spatial axes. The block-diagonal operator type appends a factor for the
/// new output index of the last axis; the vector type drops the last factor.
///
/// ```
/// use specconv_contract::{cp_layout, OperatorType};
///
/// let layout = cp_layout(3, false, OperatorType::Diagonal).unwrap();
/// assert_eq!(layout.equation().unwrap(), "abc,d,bd,ed,cd->aec");
/// ```
pub fn cp_layout(
    order: usize,
    separable: bool,
    operator_type: OperatorType,
) -> ContractResult<ContractionLayout> {
    check_order(order, operator_type)?;

    let mut symbols = SymbolAllocator::new();
    let x = symbols.fresh_n(order);
    let rank = symbols.fresh();

    let mut output = x.clone();
    let mut factors = vec![vec![x[1], rank]];
    if !separable {
        let out_channel = symbols.fresh();
        output[1] = out_channel;
        factors.push(vec![out_channel, rank]);
    }
    factors.extend(x[2..].iter().map(|&s| vec![s, rank]));

    match operator_type {
        OperatorType::Diagonal => {}
        OperatorType::BlockDiagonal => {
            let block = symbols.fresh();
            let last = output.len() - 1;
            output[last] = block;
            factors.push(vec![block, rank]);
        }
        OperatorType::Vector => {
            factors.pop();
        }
    }

    let mut operands = vec![x, vec![rank]];
    operands.extend(factors);
    Ok(ContractionLayout { operands, output })
}

/// Contract `x` directly with the rank weights and factors of `weight`
pub fn contract_cp<T>(
    x: &DenseND<T>,
    weight: &CpWeight<T>,
    separable: bool,
    operator_type: OperatorType,
) -> ContractResult<DenseND<T>>
where
    T: Clone + Num,
{
    contract_cp_with(
        &mut CpuExecutor::new(),
        &ExecHints::default(),
        x,
        weight,
        separable,
        operator_type,
    )
}

/// [`contract_cp`] on a caller-provided executor
///
/// # Errors
///
/// [`ContractError::FactorCountMismatch`] when `weight` has a different
/// number of factors than the layout needs.
pub fn contract_cp_with<T, E>(
    executor: &mut E,
    hints: &ExecHints,
    x: &DenseND<T>,
    weight: &CpWeight<T>,
    separable: bool,
    operator_type: OperatorType,
) -> ContractResult<DenseND<T>>
where
    T: Clone + Num,
    E: EinsumExecutor<T> + ?Sized,
{
    let layout = cp_layout(x.order(), separable, operator_type)?;

    let expected = layout.operands.len() - 2;
    if weight.factors().len() != expected {
        return Err(ContractError::FactorCountMismatch {
            builder: "CP",
            expected,
            got: weight.factors().len(),
        });
    }

    let mut inputs = Vec::with_capacity(layout.operands.len());
    inputs.push(x);
    inputs.push(weight.weights());
    inputs.extend(weight.factors());

    execute(executor, hints, "CP", &layout, &inputs)
}
