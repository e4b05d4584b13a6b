//! Index layouts of spectral contractions
//!
//! A [`ContractionLayout`] lists the labels of every operand and of the
//! output. Operand 0 is always the input `x`, whose axes are labelled in
//! order (batch first). Labels are handed out by a
//! [`SymbolAllocator`](specconv_einsum::SymbolAllocator) in first-use order, so
//! the order-3 non-separable dense layout renders as `abc,bdc->adc`.

use crate::config::OperatorType;
use crate::error::{ContractError, ContractResult};
use specconv_core::DenseND;
use specconv_einsum::{render, EinsumExecutor, ExecHints, Symbol, SymbolAllocator};
use std::collections::HashSet;
use std::fmt;

/// Labels of every operand and of the output of one contraction
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContractionLayout {
    /// Operand labels; `operands[0]` belongs to the input tensor
    pub operands: Vec<Vec<Symbol>>,
    pub output: Vec<Symbol>,
}

impl ContractionLayout {
    /// Labels of the input tensor
    pub fn input(&self) -> &[Symbol] {
        self.operands.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Labels of the weight operands, in execution order
    pub fn weight_operands(&self) -> &[Vec<Symbol>] {
        self.operands.get(1..).unwrap_or(&[])
    }

    /// Number of distinct labels across operands and output
    pub fn num_symbols(&self) -> usize {
        self.operands
            .iter()
            .flatten()
            .chain(&self.output)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Labels summed away, in order of first appearance
    pub fn contracted(&self) -> Vec<Symbol> {
        let mut seen = HashSet::new();
        self.operands
            .iter()
            .flatten()
            .copied()
            .filter(|s| !self.output.contains(s) && seen.insert(*s))
            .collect()
    }

    /// Render as an einsum equation
    ///
    /// # Errors
    ///
    /// [`ContractError::IndexExhausted`] when a label lies past the 52-letter
    /// alphabet.
    pub fn equation(&self) -> ContractResult<String> {
        let operands = self
            .operands
            .iter()
            .map(|labels| render(labels))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("{}->{}", operands.join(","), render(&self.output)?))
    }
}

impl fmt::Display for ContractionLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, labels) in self.operands.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            for s in labels {
                write!(f, "{s}")?;
            }
        }
        f.write_str("->")?;
        for s in &self.output {
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

/// Reject inputs without a channel axis, or without a spatial axis when the
/// operator type reshapes the last axis
pub(crate) fn check_order(order: usize, operator_type: OperatorType) -> ContractResult<()> {
    let required = match operator_type {
        OperatorType::Diagonal => 2,
        OperatorType::BlockDiagonal | OperatorType::Vector => 3,
    };
    if order < required {
        return Err(ContractError::OrderTooSmall { order, required });
    }
    Ok(())
}

/// Labels shared by the dense and tensor-train layouts
pub(crate) struct WeightSymbols {
    pub x: Vec<Symbol>,
    pub weight: Vec<Symbol>,
    pub output: Vec<Symbol>,
}

/// Input, full-weight and output labels for a weight stored axis by axis
///
/// The weight carries every non-batch axis of the input plus, unless
/// separable, an output-channel axis at position 1.
pub(crate) fn weight_symbols(
    symbols: &mut SymbolAllocator,
    order: usize,
    separable: bool,
    operator_type: OperatorType,
) -> ContractResult<WeightSymbols> {
    check_order(order, operator_type)?;

    let x = symbols.fresh_n(order);
    let mut weight = x[1..].to_vec();
    let mut output = if separable {
        x.clone()
    } else {
        weight.insert(1, symbols.fresh());
        let mut out = weight.clone();
        out[0] = x[0];
        out
    };

    match operator_type {
        OperatorType::Diagonal => {}
        OperatorType::BlockDiagonal => {
            let block = symbols.fresh();
            weight.insert(weight.len() - 1, block);
            let last = output.len() - 1;
            output[last] = block;
        }
        OperatorType::Vector => {
            weight.pop();
        }
    }

    Ok(WeightSymbols { x, weight, output })
}

/// Render `layout` and evaluate it on `executor`
pub(crate) fn execute<T, E>(
    executor: &mut E,
    hints: &ExecHints,
    builder: &'static str,
    layout: &ContractionLayout,
    inputs: &[&DenseND<T>],
) -> ContractResult<DenseND<T>>
where
    E: EinsumExecutor<T> + ?Sized,
{
    let eq = layout.equation()?;
    log::debug!("{} contraction: {}", builder, eq);
    Ok(executor.einsum(&eq, inputs, hints)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syms(s: &str) -> Vec<Symbol> {
        s.chars().filter_map(Symbol::from_char).collect()
    }

    #[test]
    fn test_equation_and_display() {
        let layout = ContractionLayout {
            operands: vec![syms("abc"), syms("bdc")],
            output: syms("adc"),
        };
        assert_eq!(layout.equation().unwrap(), "abc,bdc->adc");
        assert_eq!(layout.to_string(), "abc,bdc->adc");
        assert_eq!(layout.num_symbols(), 4);
        assert_eq!(layout.contracted(), syms("b"));
        assert_eq!(layout.input(), syms("abc").as_slice());
        assert_eq!(layout.weight_operands().len(), 1);
    }

    #[test]
    fn test_equation_past_alphabet() {
        let layout = ContractionLayout {
            operands: vec![vec![Symbol(0), Symbol(60)]],
            output: vec![Symbol(0)],
        };
        assert!(matches!(layout.equation(), Err(ContractError::IndexExhausted(_))));
        assert_eq!(layout.to_string(), "a#60->a");
    }

    #[test]
    fn test_check_order() {
        assert!(check_order(2, OperatorType::Diagonal).is_ok());
        assert!(matches!(
            check_order(1, OperatorType::Diagonal),
            Err(ContractError::OrderTooSmall { order: 1, required: 2 })
        ));
        assert!(matches!(
            check_order(2, OperatorType::Vector),
            Err(ContractError::OrderTooSmall { order: 2, required: 3 })
        ));
        assert!(check_order(3, OperatorType::BlockDiagonal).is_ok());
    }

    #[test]
    fn test_weight_symbols_block_diagonal() {
        let mut symbols = SymbolAllocator::new();
        let w = weight_symbols(&mut symbols, 3, false, OperatorType::BlockDiagonal).unwrap();
        assert_eq!(w.x, syms("abc"));
        assert_eq!(w.weight, syms("bdec"));
        assert_eq!(w.output, syms("ade"));
        assert_eq!(symbols.allocated(), 5);
    }
}
