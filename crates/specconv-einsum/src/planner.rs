//! Pairwise contraction paths
//!
//! A multi-operand equation is executed as a sequence of pairwise steps.
//! Each step replaces two intermediates with their contraction; the
//! indices kept by a step are the ones still needed by another intermediate
//! or by the final output.

use crate::parser::{index_extents, EinsumSpec};
use anyhow::{bail, Result};
use std::collections::HashMap;

/// How pairs are chosen when building a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathStrategy {
    /// Cheapest pair first, by the size of the iteration space of the step
    #[default]
    Greedy,
    /// Running result with the next operand, left to right
    Sequential,
    /// No path: evaluate the whole equation in a single pass
    Direct,
}

/// One pairwise contraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractionStep {
    /// Positions in the intermediate list at the time of the step
    pub pair: (usize, usize),
    /// Two-operand equation for the step
    pub spec: EinsumSpec,
    /// Size of the iteration space (product of all index extents involved),
    /// saturating at `usize::MAX`
    pub cost: usize,
}

/// Ordered pairwise steps reducing all operands to the output
///
/// With [`PathStrategy::Greedy`] each result is appended to the end of the
/// intermediate list; with [`PathStrategy::Sequential`] it replaces the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractionPath {
    pub steps: Vec<ContractionStep>,
}

impl ContractionPath {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of step costs, saturating at `usize::MAX`
    pub fn total_cost(&self) -> usize {
        self.steps
            .iter()
            .fold(0usize, |acc, s| acc.saturating_add(s.cost))
    }
}

/// Build a pairwise path for `spec`
///
/// Returns an empty path for single-operand equations and for
/// [`PathStrategy::Direct`].
///
/// # Examples
///
/// ```
/// use specconv_einsum::{plan_path, EinsumSpec, PathStrategy};
///
/// let spec = EinsumSpec::parse("ab,bc,cd->ad").unwrap();
/// let shapes = vec![vec![2, 3], vec![3, 4], vec![4, 5]];
/// let path = plan_path(&spec, &shapes, PathStrategy::Sequential).unwrap();
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.steps[1].spec.output, "ad");
/// ```
pub fn plan_path(
    spec: &EinsumSpec,
    shapes: &[Vec<usize>],
    strategy: PathStrategy,
) -> Result<ContractionPath> {
    let extents = index_extents(spec, shapes)?;

    if spec.num_inputs() < 2 || strategy == PathStrategy::Direct {
        return Ok(ContractionPath::default());
    }

    let mut intermediates: Vec<Vec<char>> = spec
        .inputs
        .iter()
        .map(|s| s.chars().collect())
        .collect();
    let mut path = ContractionPath::default();

    while intermediates.len() > 1 {
        let (pair, step_spec, cost) = match strategy {
            PathStrategy::Sequential => {
                let (spec_step, cost) = pair_spec(spec, &intermediates, 0, 1, &extents)?;
                ((0, 1), spec_step, cost)
            }
            _ => {
                let mut best: Option<((usize, usize), EinsumSpec, usize)> = None;
                for i in 0..intermediates.len() {
                    for j in (i + 1)..intermediates.len() {
                        let (candidate, cost) = pair_spec(spec, &intermediates, i, j, &extents)?;
                        let better = match &best {
                            Some((_, _, best_cost)) => cost < *best_cost,
                            None => true,
                        };
                        if better {
                            best = Some(((i, j), candidate, cost));
                        }
                    }
                }
                match best {
                    Some(b) => b,
                    None => bail!("No valid contraction found"),
                }
            }
        };

        let (i, j) = pair;
        let produced: Vec<char> = step_spec.output.chars().collect();
        if strategy == PathStrategy::Sequential {
            // The running result stays in front so the chain reads left to right
            intermediates.remove(1);
            intermediates[0] = produced;
        } else {
            // Remove the higher position first
            intermediates.remove(j);
            intermediates.remove(i);
            intermediates.push(produced);
        }

        path.steps.push(ContractionStep {
            pair,
            spec: step_spec,
            cost,
        });
    }

    Ok(path)
}

/// Equation and cost for contracting intermediates `i` and `j`
fn pair_spec(
    spec: &EinsumSpec,
    intermediates: &[Vec<char>],
    i: usize,
    j: usize,
    extents: &HashMap<char, usize>,
) -> Result<(EinsumSpec, usize)> {
    let a = &intermediates[i];
    let b = &intermediates[j];

    let output: String = if intermediates.len() == 2 {
        spec.output.clone()
    } else {
        let needed_elsewhere = |c: char| {
            spec.output_indices.contains(&c)
                || intermediates
                    .iter()
                    .enumerate()
                    .any(|(k, labels)| k != i && k != j && labels.contains(&c))
        };
        let mut kept = Vec::new();
        for &c in a.iter().chain(b.iter()) {
            if needed_elsewhere(c) && !kept.contains(&c) {
                kept.push(c);
            }
        }
        kept.into_iter().collect()
    };

    let mut involved: Vec<char> = a.iter().chain(b.iter()).copied().collect();
    involved.sort_unstable();
    involved.dedup();
    let cost = involved
        .iter()
        .map(|c| extents.get(c).copied().unwrap_or(1))
        .fold(1usize, usize::saturating_mul);

    let a_str: String = a.iter().collect();
    let b_str: String = b.iter().collect();
    let step_spec = EinsumSpec::parse(&format!("{a_str},{b_str}->{output}"))?;
    Ok((step_spec, cost))
}
