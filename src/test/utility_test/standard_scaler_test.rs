use super::*;
use crate::traits::FeatureScaler;

#[test]
fn test_fit_uses_population_std() {
    let data = array![[1.0, 2.0], [3.0, 4.0], [5.0, 9.0]];
    let scaler = StandardScaler::fit(&data).unwrap();

    assert_abs_diff_eq!(scaler.get_mean()[0], 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(scaler.get_mean()[1], 5.0, epsilon = 1e-12);
    // divided by n, not n - 1
    assert_abs_diff_eq!(scaler.get_scale()[0], (8.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    assert_abs_diff_eq!(scaler.get_scale()[1], (26.0f64 / 3.0).sqrt(), epsilon = 1e-12);

    let scaled = scaler.transform(&data).unwrap();
    for column in scaled.columns() {
        assert_abs_diff_eq!(column.mean().unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(column.std(0.0), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_constant_feature_is_only_centered() {
    let data = array![[7.0, 1.0], [7.0, 2.0]];
    let scaler = StandardScaler::fit(&data).unwrap();

    assert_eq!(scaler.get_scale()[0], 1.0);
    let scaled = scaler.transform(&data).unwrap();
    assert_eq!(scaled.column(0).to_vec(), vec![0.0, 0.0]);
}

#[test]
fn test_fit_rejects_empty_and_non_finite_data() {
    assert!(matches!(
        StandardScaler::fit(&Array2::<f64>::zeros((0, 3))),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        StandardScaler::fit(&array![[1.0, f64::INFINITY]]),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_new_validates_statistics() {
    assert!(StandardScaler::new(array![0.0, 1.0], array![1.0, 2.0]).is_ok());

    for (mean, scale) in [
        (Array1::<f64>::zeros(0), Array1::<f64>::zeros(0)),
        (array![0.0, 1.0], array![1.0]),
        (array![f64::NAN], array![1.0]),
        (array![0.0], array![0.0]),
        (array![0.0], array![-1.0]),
    ] {
        assert!(matches!(
            StandardScaler::new(mean, scale),
            Err(ModelError::ConfigurationError(_))
        ));
    }
}

#[test]
fn test_transform_width_mismatch() {
    let scaler = StandardScaler::new(array![0.0, 0.0, 0.0], array![1.0, 1.0, 1.0]).unwrap();
    assert_eq!(
        scaler.transform(&Array2::<f64>::zeros((2, 2))),
        Err(ModelError::ShapeMismatch {
            layer: 0,
            expected: 3,
            actual: 2
        })
    );
}

#[test]
fn test_transform_keeps_nan_and_empty_batches() {
    let scaler = StandardScaler::new(array![1.0, 2.0], array![2.0, 4.0]).unwrap();

    let scaled = scaler.transform(&array![[f64::NAN, 6.0]]).unwrap();
    assert!(scaled[[0, 0]].is_nan());
    assert_eq!(scaled[[0, 1]], 1.0);

    let empty = scaler.transform(&Array2::<f64>::zeros((0, 2))).unwrap();
    assert_eq!(empty.dim(), (0, 2));
}

#[test]
fn test_inverse_transform_restores_raw_values() {
    let data = array![[1.5, -3.0], [2.5, 8.0], [10.0, 0.0]];
    let scaler = StandardScaler::fit(&data).unwrap();

    let restored = scaler
        .inverse_transform(&scaler.transform(&data).unwrap())
        .unwrap();
    for (a, b) in restored.iter().zip(data.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[test]
fn test_feature_scaler_impl() {
    let scaler = StandardScaler::new(array![1.0], array![2.0]).unwrap();
    let dyn_scaler: &dyn FeatureScaler = &scaler;

    assert_eq!(dyn_scaler.n_features(), 1);
    assert_eq!(
        dyn_scaler.transform(array![[5.0]].view()).unwrap(),
        array![[2.0]]
    );
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scaler.json");

    let scaler = StandardScaler::new(array![0.5, -1.0], array![2.0, 3.0]).unwrap();
    scaler.save_to_path(&path).unwrap();
    assert_eq!(StandardScaler::load_from_path(&path).unwrap(), scaler);
}
