//! Integration tests for specconv-einsum

use proptest::prelude::*;
use scirs2_core::numeric::Complex;
use specconv_core::DenseND;
use specconv_einsum::{
    einsum, einsum_ex, render, CpuExecutor, EinsumExecutor, ExecHints, PathStrategy,
    SymbolAllocator,
};

fn complex_seq(shape: &[usize], phase: f64) -> DenseND<Complex<f64>> {
    let mut k: f64 = 0.0;
    DenseND::from_shape_fn(shape, |_| {
        k += 1.0;
        Complex::new(k.cos() + phase, (k * phase).sin())
    })
}

#[test]
fn test_complex_spectral_contraction() {
    let x = complex_seq(&[2, 3, 4], 0.3);
    let w = complex_seq(&[3, 5, 4], 0.7);

    let y = einsum("abc,bdc->adc", &[&x, &w]).unwrap();
    assert_eq!(y.shape(), &[2, 5, 4]);

    for b in 0..2 {
        for o in 0..5 {
            for m in 0..4 {
                let mut expected = Complex::new(0.0, 0.0);
                for i in 0..3 {
                    expected = expected + x[&[b, i, m]] * w[&[i, o, m]];
                }
                assert!((y[&[b, o, m]] - expected).norm() < 1e-10);
            }
        }
    }
}

#[test]
fn test_rendered_allocator_labels_drive_executor() {
    let mut alloc = SymbolAllocator::new();
    let x_syms = alloc.fresh_n(3);
    let out_channel = alloc.fresh();
    let w_syms = vec![x_syms[1], out_channel, x_syms[2]];
    let out_syms = vec![x_syms[0], out_channel, x_syms[2]];

    let eq = format!(
        "{},{}->{}",
        render(&x_syms).unwrap(),
        render(&w_syms).unwrap(),
        render(&out_syms).unwrap()
    );
    assert_eq!(eq, "abc,bdc->adc");

    let x = DenseND::<f64>::ones(&[1, 2, 3]);
    let w = DenseND::<f64>::from_elem(&[2, 4, 3], 0.5);
    let mut executor = CpuExecutor::new();
    let y = executor.einsum(&eq, &[&x, &w], &ExecHints::default()).unwrap();
    assert_eq!(y.shape(), &[1, 4, 3]);
    assert!((y[&[0, 3, 2]] - 1.0).abs() < 1e-12);
}

#[test]
fn test_mismatched_extent_is_an_error() {
    let x = DenseND::<f64>::ones(&[2, 3, 4]);
    let w = DenseND::<f64>::ones(&[3, 5, 7]);
    let err = einsum_ex::<f64>("abc,bdc->adc")
        .inputs(&[&x, &w])
        .run()
        .unwrap_err();
    assert!(err.to_string().contains("Dimension mismatch"));
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 16, ..ProptestConfig::default() })]

    // Pairwise paths and the single-pass kernel compute the same contraction
    #[test]
    fn paths_match_direct_evaluation(
        batch in 1usize..3,
        channels in 1usize..4,
        rank in 1usize..4,
        modes in 1usize..4,
    ) {
        let x = DenseND::<f64>::from_shape_fn(&[batch, channels, modes], |idx| {
            (idx[0] as f64 + 1.0) * 0.5 - idx[1] as f64 + idx[2] as f64 * 0.25
        });
        let weights = DenseND::<f64>::from_shape_fn(&[rank], |idx| 1.0 + idx[0] as f64);
        let u = DenseND::<f64>::from_shape_fn(&[channels, rank], |idx| (idx[0] + 2 * idx[1]) as f64 * 0.1);
        let v = DenseND::<f64>::from_shape_fn(&[modes, rank], |idx| 1.0 - (idx[0] * idx[1]) as f64 * 0.2);
        let inputs = [&x, &weights, &u, &v];
        let spec = "abc,r,br,cr->ac";

        let direct = einsum_ex::<f64>(spec)
            .inputs(&inputs)
            .hints(&ExecHints::new().with_path(PathStrategy::Direct))
            .run()
            .unwrap();
        for strategy in [PathStrategy::Greedy, PathStrategy::Sequential] {
            let planned = einsum_ex::<f64>(spec)
                .inputs(&inputs)
                .hints(&ExecHints::new().with_path(strategy))
                .run()
                .unwrap();
            prop_assert!(direct.max_abs_diff(&planned).unwrap() < 1e-9);
        }
    }
}
