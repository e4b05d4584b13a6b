//! Dense evaluation of einsum equations
//!
//! [`execute_dense_contraction`] evaluates any equation directly: for every
//! output position it sums the product of operand entries over all
//! contracted index assignments. Repeated indices within one operand select
//! its diagonal; scalar (order-0) operands are allowed.

use crate::parser::{index_extents, EinsumSpec};
use anyhow::{anyhow, bail, Result};
use scirs2_core::ndarray_ext::IxDyn;
use scirs2_core::numeric::Num;
use specconv_core::DenseND;

/// Evaluate `spec` against `inputs` in one pass
///
/// # Errors
///
/// Fails when the operand count, operand orders or shared index extents do
/// not agree with the equation.
///
/// # Examples
///
/// ```
/// use specconv_core::DenseND;
/// use specconv_einsum::{execute_dense_contraction, EinsumSpec};
///
/// let a = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
/// let b = DenseND::from_vec(vec![5.0, 6.0, 7.0, 8.0], &[2, 2]).unwrap();
/// let spec = EinsumSpec::parse("ij,jk->ik").unwrap();
/// let c = execute_dense_contraction(&spec, &[&a, &b]).unwrap();
/// assert_eq!(c[&[0, 0]], 19.0);
/// assert_eq!(c[&[1, 1]], 50.0);
/// ```
pub fn execute_dense_contraction<T>(spec: &EinsumSpec, inputs: &[&DenseND<T>]) -> Result<DenseND<T>>
where
    T: Clone + Num,
{
    if spec.num_inputs() != inputs.len() {
        bail!(
            "Spec expects {} inputs, got {}",
            spec.num_inputs(),
            inputs.len()
        );
    }

    let shapes: Vec<Vec<usize>> = inputs.iter().map(|t| t.shape().to_vec()).collect();
    let extents = index_extents(spec, &shapes)?;

    // Label slots: output labels first, then contracted labels
    let mut labels: Vec<char> = spec.output.chars().collect();
    let n_out = labels.len();
    labels.extend(spec.contracted_in_order());

    let dims: Vec<usize> = labels
        .iter()
        .map(|c| {
            extents
                .get(c)
                .copied()
                .ok_or_else(|| anyhow!("Index '{}' has no extent", c))
        })
        .collect::<Result<_>>()?;

    let slot_maps: Vec<Vec<usize>> = spec
        .inputs
        .iter()
        .map(|input| {
            input
                .chars()
                .map(|c| {
                    labels
                        .iter()
                        .position(|&l| l == c)
                        .ok_or_else(|| anyhow!("Index '{}' not assigned a slot", c))
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<_>>()?;

    let out_shape = &dims[..n_out];
    let sum_shape = &dims[n_out..];
    let out_len = iteration_volume(out_shape)?;
    let sum_len = iteration_volume(sum_shape)?;

    let mut assignment = vec![0usize; labels.len()];
    let mut operand_idx: Vec<Vec<usize>> = slot_maps.iter().map(|m| vec![0; m.len()]).collect();
    let mut output = Vec::with_capacity(out_len);

    for out_flat in 0..out_len {
        unravel(out_flat, out_shape, &mut assignment[..n_out]);

        let mut acc = T::zero();
        for sum_flat in 0..sum_len {
            unravel(sum_flat, sum_shape, &mut assignment[n_out..]);

            let mut term = T::one();
            for ((tensor, map), idx) in inputs.iter().zip(&slot_maps).zip(operand_idx.iter_mut()) {
                for (slot, &label_slot) in idx.iter_mut().zip(map) {
                    *slot = assignment[label_slot];
                }
                term = term * tensor.as_array()[IxDyn(idx.as_slice())].clone();
            }
            acc = acc + term;
        }
        output.push(acc);
    }

    DenseND::from_vec(output, out_shape)
}

/// Number of positions in `extents`, or an error when it does not fit in `usize`
fn iteration_volume(extents: &[usize]) -> Result<usize> {
    if extents.contains(&0) {
        return Ok(0);
    }
    extents
        .iter()
        .try_fold(1usize, |acc, &e| acc.checked_mul(e))
        .ok_or_else(|| anyhow!("Iteration space {:?} overflows usize", extents))
}

/// Row-major multi-index of `flat` within `shape`
fn unravel(mut flat: usize, shape: &[usize], out: &mut [usize]) {
    for (slot, &extent) in out.iter_mut().zip(shape).rev() {
        *slot = flat % extent;
        flat /= extent;
    }
}
