//! Einsum equation parsing
//!
//! Equations look like `"abc,bdc->adc"`. Labels are single letters of the
//! 52-letter alphabet `a-zA-Z`; an empty term is a scalar operand.

use crate::symbols::Symbol;
use anyhow::{bail, Result};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// Validated einsum equation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EinsumSpec {
    /// One label string per operand
    pub inputs: Vec<String>,
    /// Labels of the result, in axis order
    pub output: String,
    pub output_indices: HashSet<char>,
    /// Labels summed away
    pub contracted_indices: HashSet<char>,
}

impl EinsumSpec {
    /// Parse and validate an equation
    ///
    /// Without `->` the result keeps every label, in order of first use.
    ///
    /// # Examples
    ///
    /// ```
    /// use specconv_einsum::EinsumSpec;
    ///
    /// let spec = EinsumSpec::parse("abc,bdc->adc").unwrap();
    /// assert_eq!(spec.inputs.len(), 2);
    /// assert_eq!(spec.output, "adc");
    /// assert!(spec.is_contracted('b'));
    /// ```
    pub fn parse(equation: &str) -> Result<Self> {
        let equation = equation.trim();
        let (lhs, rhs) = match equation.split_once("->") {
            Some((_, rhs)) if rhs.contains("->") => {
                bail!("Equation '{}' has more than one '->'", equation)
            }
            Some((lhs, rhs)) => (lhs, Some(rhs)),
            None => (equation, None),
        };
        if lhs.trim().is_empty() {
            bail!("Equation '{}' has no operands", equation);
        }

        let inputs = lhs
            .split(',')
            .enumerate()
            .map(|(i, term)| check_term(term, &format!("Operand {i}")))
            .collect::<Result<Vec<_>>>()?;

        let output = match rhs {
            Some(term) => check_term(term, "Output")?,
            None => implicit_output(&inputs),
        };

        let mut output_indices = HashSet::with_capacity(output.len());
        for label in output.chars() {
            if !output_indices.insert(label) {
                bail!("Output label '{}' is repeated", label);
            }
            if !inputs.iter().any(|term| term.contains(label)) {
                bail!("Output label '{}' is not bound by any operand", label);
            }
        }

        let contracted_indices = inputs
            .iter()
            .flat_map(|term| term.chars())
            .filter(|label| !output_indices.contains(label))
            .collect();

        Ok(Self {
            inputs,
            output,
            output_indices,
            contracted_indices,
        })
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_contracted(&self, label: char) -> bool {
        self.contracted_indices.contains(&label)
    }

    /// Contracted labels in order of first use across the operands
    pub fn contracted_in_order(&self) -> Vec<char> {
        let mut seen = HashSet::new();
        self.inputs
            .iter()
            .flat_map(|term| term.chars())
            .filter(|&label| self.is_contracted(label) && seen.insert(label))
            .collect()
    }
}

impl FromStr for EinsumSpec {
    type Err = anyhow::Error;

    fn from_str(equation: &str) -> Result<Self> {
        Self::parse(equation)
    }
}

impl std::fmt::Display for EinsumSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.inputs.join(","), self.output)
    }
}

fn check_term(term: &str, what: &str) -> Result<String> {
    let term = term.trim();
    match term.chars().find(|&c| Symbol::from_char(c).is_none()) {
        Some(bad) => bail!("{} has label '{}' outside a-zA-Z", what, bad),
        None => Ok(term.to_string()),
    }
}

fn implicit_output(inputs: &[String]) -> String {
    let mut seen = HashSet::new();
    inputs
        .iter()
        .flat_map(|term| term.chars())
        .filter(|&label| seen.insert(label))
        .collect()
}

/// Bind every label of `spec` to its extent in `shapes`
///
/// # Errors
///
/// Fails on an operand count mismatch, an operand whose order differs from
/// its term, or a label bound to two different extents.
pub fn index_extents(spec: &EinsumSpec, shapes: &[Vec<usize>]) -> Result<HashMap<char, usize>> {
    if spec.num_inputs() != shapes.len() {
        bail!(
            "Equation '{}' has {} operands, got {} shapes",
            spec,
            spec.num_inputs(),
            shapes.len()
        );
    }

    let mut extents = HashMap::new();
    for (i, (term, shape)) in spec.inputs.iter().zip(shapes).enumerate() {
        if term.len() != shape.len() {
            bail!(
                "Operand {} is labelled '{}' but has shape {:?}",
                i,
                term,
                shape
            );
        }
        for (label, &extent) in term.chars().zip(shape) {
            let bound = *extents.entry(label).or_insert(extent);
            if bound != extent {
                bail!(
                    "Dimension mismatch for label '{}' in operand {}: {} vs {}",
                    label,
                    i,
                    bound,
                    extent
                );
            }
        }
    }
    Ok(extents)
}
