//! Contraction against a tensor-train weight without reconstructing it
//!
//! Weight labels are the dense ones, operator type included. Core `i` then
//! carries `(bond i, weight label i, bond i+1)`; neighbouring cores share a
//! bond and both boundary bonds are summed with extent 1.

use crate::config::OperatorType;
use crate::error::{ContractError, ContractResult};
use crate::layout::{execute, weight_symbols, ContractionLayout, WeightSymbols};
use scirs2_core::numeric::Num;
use specconv_core::DenseND;
use specconv_einsum::{CpuExecutor, EinsumExecutor, ExecHints, SymbolAllocator};
use specconv_factor::TtWeight;

/// Index layout of the TT contraction
///
/// ```
/// use specconv_contract::{tt_layout, OperatorType};
///
/// let layout = tt_layout(3, false, OperatorType::Diagonal).unwrap();
/// assert_eq!(layout.equation().unwrap(), "abc,ebf,fdg,gch->adc");
/// ```
pub fn tt_layout(
    order: usize,
    separable: bool,
    operator_type: OperatorType,
) -> ContractResult<ContractionLayout> {
    let mut symbols = SymbolAllocator::new();
    let WeightSymbols { x, weight, output } =
        weight_symbols(&mut symbols, order, separable, operator_type)?;

    let bonds = symbols.fresh_n(weight.len() + 1);
    let mut operands = vec![x];
    operands.extend(
        weight
            .iter()
            .enumerate()
            .map(|(i, &w)| vec![bonds[i], w, bonds[i + 1]]),
    );

    Ok(ContractionLayout { operands, output })
}

/// Contract `x` directly with the cores of `weight`
pub fn contract_tt<T>(
    x: &DenseND<T>,
    weight: &TtWeight<T>,
    separable: bool,
    operator_type: OperatorType,
) -> ContractResult<DenseND<T>>
where
    T: Clone + Num,
{
    contract_tt_with(
        &mut CpuExecutor::new(),
        &ExecHints::default(),
        x,
        weight,
        separable,
        operator_type,
    )
}

/// [`contract_tt`] on a caller-provided executor
pub fn contract_tt_with<T, E>(
    executor: &mut E,
    hints: &ExecHints,
    x: &DenseND<T>,
    weight: &TtWeight<T>,
    separable: bool,
    operator_type: OperatorType,
) -> ContractResult<DenseND<T>>
where
    T: Clone + Num,
    E: EinsumExecutor<T> + ?Sized,
{
    let layout = tt_layout(x.order(), separable, operator_type)?;

    let expected = layout.operands.len() - 1;
    if weight.cores().len() != expected {
        return Err(ContractError::FactorCountMismatch {
            builder: "TT",
            expected,
            got: weight.cores().len(),
        });
    }

    let mut inputs = Vec::with_capacity(layout.operands.len());
    inputs.push(x);
    inputs.extend(weight.cores());

    execute(executor, hints, "TT", &layout, &inputs)
}
