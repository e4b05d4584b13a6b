//! Einsum executors
//!
//! [`EinsumExecutor`] is the seam between equation construction and numeric
//! evaluation. [`CpuExecutor`] evaluates equations on dense tensors, split
//! into pairwise steps along a planned [`ContractionPath`](crate::ContractionPath).

use crate::hints::ExecHints;
use crate::ops::execute_dense_contraction;
use crate::parser::EinsumSpec;
use crate::planner::{plan_path, PathStrategy};
use anyhow::{anyhow, Result};
use scirs2_core::numeric::Num;
use specconv_core::DenseND;

/// Evaluates einsum equations against dense operands
pub trait EinsumExecutor<T> {
    fn einsum(&mut self, spec: &str, inputs: &[&DenseND<T>], hints: &ExecHints)
        -> Result<DenseND<T>>;
}

/// Counters accumulated by a [`CpuExecutor`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecStats {
    /// Equations evaluated
    pub equations: usize,
    /// Pairwise steps executed across all equations
    pub pairwise_steps: usize,
    /// Sum of planned step costs
    pub planned_cost: usize,
}

/// Single-threaded dense executor
#[derive(Debug, Default)]
pub struct CpuExecutor {
    stats: ExecStats,
}

impl CpuExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> ExecStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = ExecStats::default();
    }

    fn execute_path<T>(
        &mut self,
        spec: &EinsumSpec,
        inputs: &[&DenseND<T>],
        strategy: PathStrategy,
    ) -> Result<DenseND<T>>
    where
        T: Clone + Num,
    {
        let shapes: Vec<Vec<usize>> = inputs.iter().map(|t| t.shape().to_vec()).collect();
        let path = plan_path(spec, &shapes, strategy)?;

        if path.is_empty() {
            return execute_dense_contraction(spec, inputs);
        }

        self.stats.planned_cost = self.stats.planned_cost.saturating_add(path.total_cost());

        let mut intermediates: Vec<DenseND<T>> = inputs.iter().map(|&t| t.clone()).collect();

        for (step_idx, step) in path.steps.iter().enumerate() {
            let (i, j) = step.pair;
            if i >= j || j >= intermediates.len() {
                return Err(anyhow!(
                    "Step {}: Invalid indices ({}, {}) for {} intermediates",
                    step_idx,
                    i,
                    j,
                    intermediates.len()
                ));
            }

            log::trace!("einsum step {}: {}", step_idx, step.spec);
            let result = execute_dense_contraction(&step.spec, &[&intermediates[i], &intermediates[j]])?;
            self.stats.pairwise_steps += 1;

            if strategy == PathStrategy::Sequential {
                intermediates.remove(1);
                intermediates[0] = result;
            } else {
                intermediates.remove(j);
                intermediates.remove(i);
                intermediates.push(result);
            }
        }

        if intermediates.len() != 1 {
            return Err(anyhow!(
                "Expected 1 final tensor, got {}",
                intermediates.len()
            ));
        }

        intermediates
            .pop()
            .ok_or_else(|| anyhow!("Contraction path produced no result"))
    }
}

impl<T> EinsumExecutor<T> for CpuExecutor
where
    T: Clone + Num,
{
    fn einsum(
        &mut self,
        spec: &str,
        inputs: &[&DenseND<T>],
        hints: &ExecHints,
    ) -> Result<DenseND<T>> {
        let parsed_spec = EinsumSpec::parse(spec)?;

        if parsed_spec.num_inputs() != inputs.len() {
            return Err(anyhow!(
                "Spec expects {} inputs, got {}",
                parsed_spec.num_inputs(),
                inputs.len()
            ));
        }

        self.stats.equations += 1;
        self.execute_path(&parsed_spec, inputs, hints.path)
    }
}
