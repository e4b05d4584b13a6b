//! Contraction against a Tucker weight without reconstructing it

use crate::config::OperatorType;
use crate::error::{ContractError, ContractResult};
use crate::layout::{check_order, execute, ContractionLayout};
use scirs2_core::numeric::Num;
use specconv_core::DenseND;
use specconv_einsum::{CpuExecutor, EinsumExecutor, ExecHints, SymbolAllocator};
use specconv_factor::TuckerWeight;

/// Index layout of the Tucker contraction
///
/// Operands are the input, the core (one label per non-batch axis, plus one
/// for the output channel unless separable) and one factor per core axis.
/// Only the diagonal operator type is supported.
///
/// ```
/// use specconv_contract::{tucker_layout, OperatorType};
///
/// let layout = tucker_layout(3, false, OperatorType::Diagonal).unwrap();
/// assert_eq!(layout.equation().unwrap(), "abc,efg,be,df,cg->adc");
/// ```
pub fn tucker_layout(
    order: usize,
    separable: bool,
    operator_type: OperatorType,
) -> ContractResult<ContractionLayout> {
    match operator_type {
        OperatorType::Diagonal => {}
        OperatorType::BlockDiagonal => {
            return Err(ContractError::NotImplemented(
                "block-diagonal operator type for Tucker contractions".to_string(),
            ))
        }
        OperatorType::Vector => {
            return Err(ContractError::UnsupportedOperatorType(format!(
                "{} (Tucker contractions are diagonal only)",
                operator_type
            )))
        }
    }
    check_order(order, operator_type)?;

    let mut symbols = SymbolAllocator::new();
    let x = symbols.fresh_n(order);
    let mut output = x.clone();

    let (core, factors) = if separable {
        let core = symbols.fresh_n(order - 1);
        let factors: Vec<_> = x[1..].iter().zip(&core).map(|(&a, &r)| vec![a, r]).collect();
        (core, factors)
    } else {
        let out_channel = symbols.fresh();
        let core = symbols.fresh_n(order);
        output[1] = out_channel;
        let mut factors = vec![vec![x[1], core[0]], vec![out_channel, core[1]]];
        factors.extend(x[2..].iter().zip(&core[2..]).map(|(&a, &r)| vec![a, r]));
        (core, factors)
    };

    let mut operands = vec![x, core];
    operands.extend(factors);
    Ok(ContractionLayout { operands, output })
}

/// Contract `x` directly with the core and factors of `weight`
pub fn contract_tucker<T>(
    x: &DenseND<T>,
    weight: &TuckerWeight<T>,
    separable: bool,
    operator_type: OperatorType,
) -> ContractResult<DenseND<T>>
where
    T: Clone + Num,
{
    contract_tucker_with(
        &mut CpuExecutor::new(),
        &ExecHints::default(),
        x,
        weight,
        separable,
        operator_type,
    )
}

/// [`contract_tucker`] on a caller-provided executor
pub fn contract_tucker_with<T, E>(
    executor: &mut E,
    hints: &ExecHints,
    x: &DenseND<T>,
    weight: &TuckerWeight<T>,
    separable: bool,
    operator_type: OperatorType,
) -> ContractResult<DenseND<T>>
where
    T: Clone + Num,
    E: EinsumExecutor<T> + ?Sized,
{
    let layout = tucker_layout(x.order(), separable, operator_type)?;

    let expected = layout.operands.len() - 2;
    if weight.factors().len() != expected {
        return Err(ContractError::FactorCountMismatch {
            builder: "Tucker",
            expected,
            got: weight.factors().len(),
        });
    }

    let mut inputs = Vec::with_capacity(layout.operands.len());
    inputs.push(x);
    inputs.push(weight.core());
    inputs.extend(weight.factors());

    execute(executor, hints, "Tucker", &layout, &inputs)
}
