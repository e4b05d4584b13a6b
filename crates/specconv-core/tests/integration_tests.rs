//! Integration tests for specconv-core

use scirs2_core::ndarray_ext::{Array, IxDyn};
use scirs2_core::numeric::Complex;
use specconv_core::DenseND;

#[test]
fn test_complex_coefficients() {
    let data = vec![
        Complex::new(1.0, 0.0),
        Complex::new(0.0, 1.0),
        Complex::new(-1.0, 0.5),
        Complex::new(2.0, -2.0),
    ];
    let t = DenseND::from_vec(data, &[1, 2, 2]).unwrap();
    assert_eq!(t.order(), 3);
    assert_eq!(t[&[0, 1, 1]], Complex::new(2.0, -2.0));

    let zeros = DenseND::<Complex<f64>>::zeros(&[1, 2, 2]);
    let diff = t.try_sub(&zeros).unwrap();
    assert_eq!(diff, t);
}

#[test]
fn test_array_roundtrip() {
    let array = Array::from_shape_vec(IxDyn(&[2, 3]), (0..6).map(|v| v as f64).collect()).unwrap();
    let t = DenseND::from_array(array.clone());
    assert_eq!(t.len(), 6);
    assert_eq!(t.into_array(), array);
}

#[test]
fn test_view_iteration_is_row_major() {
    let t = DenseND::<f64>::from_shape_fn(&[2, 2, 2], |idx| (idx[0] * 4 + idx[1] * 2 + idx[2]) as f64);
    let values: Vec<f64> = t.view().iter().copied().collect();
    assert_eq!(values, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
}
