//! Integration tests for specconv-factor

use scirs2_core::numeric::Complex;
use specconv_core::DenseND;
use specconv_factor::{
    CpWeight, FactorError, FactorizationKind, FactorizedWeight, TtWeight, TuckerWeight, Weight,
};

type C64 = Complex<f64>;

fn complex_tensor(shape: &[usize], seed: f64) -> DenseND<C64> {
    DenseND::from_shape_fn(shape, |idx| {
        let s: f64 = idx.iter().enumerate().map(|(k, &i)| (k + 1) as f64 * i as f64).sum();
        C64::new((s + seed).cos(), (s * seed).sin())
    })
}

#[test]
fn test_complex_cp_reconstruction() {
    let cp = CpWeight::new(
        complex_tensor(&[2], 0.3),
        vec![
            complex_tensor(&[3, 2], 0.1),
            complex_tensor(&[4, 2], 0.7),
            complex_tensor(&[2, 2], 1.3),
        ],
    )
    .unwrap();
    let full = cp.to_tensor().unwrap();
    assert_eq!(full.shape(), &[3, 4, 2]);

    let mut expected = C64::new(0.0, 0.0);
    for r in 0..2 {
        expected = expected
            + cp.weights()[&[r]]
                * cp.factors()[0][&[2, r]]
                * cp.factors()[1][&[1, r]]
                * cp.factors()[2][&[0, r]];
    }
    assert!((full[&[2, 1, 0]] - expected).norm() < 1e-12);
}

#[test]
fn test_complex_tt_reconstruction() {
    let tt = TtWeight::new(vec![
        complex_tensor(&[1, 3, 2], 0.2),
        complex_tensor(&[2, 4, 1], 0.9),
    ])
    .unwrap();
    let full = tt.to_tensor().unwrap();

    let g = tt.cores();
    let expected = g[0][&[0, 1, 0]] * g[1][&[0, 3, 0]] + g[0][&[0, 1, 1]] * g[1][&[1, 3, 0]];
    assert!((full[&[1, 3]] - expected).norm() < 1e-12);
}

#[test]
fn test_spectral_weight_shapes() {
    // (in_channels, out_channels, modes)
    let tucker = TuckerWeight::new(
        DenseND::<f64>::ones(&[2, 2, 3]),
        vec![
            DenseND::ones(&[8, 2]),
            DenseND::ones(&[16, 2]),
            DenseND::ones(&[12, 3]),
        ],
    )
    .unwrap();
    let weight: Weight<f64> = tucker.into();
    assert_eq!(weight.shape(), vec![8, 16, 12]);
    assert_eq!(weight.kind(), Some(FactorizationKind::Tucker));

    let f = weight.as_factorized().unwrap();
    assert!(f.compression_ratio() > 1.0);
    assert_eq!(f.to_tensor().unwrap()[&[7, 15, 11]], 12.0);
}

#[test]
fn test_kind_names_from_layer_configs() {
    for (name, kind) in [
        ("ComplexDense", FactorizationKind::Dense),
        ("ComplexCP", FactorizationKind::Cp),
        ("ComplexTucker", FactorizationKind::Tucker),
        ("ComplexTT", FactorizationKind::Tt),
    ] {
        assert_eq!(name.parse::<FactorizationKind>(), Ok(kind));
    }
    assert!(matches!(
        "ComplexBlockTT".parse::<FactorizationKind>(),
        Err(FactorError::UnsupportedKind(_))
    ));
}

#[test]
fn test_factorized_dense_round_trip() {
    let t = complex_tensor(&[2, 3, 4], 0.5);
    let f = FactorizedWeight::Dense(t.clone());
    assert_eq!(f.kind(), FactorizationKind::Dense);
    assert_eq!(f.to_tensor().unwrap(), t);
}
