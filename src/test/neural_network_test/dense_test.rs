use super::*;

#[test]
fn test_dense_forward_dimensions() {
    let dense = Dense::new(Array2::ones((4, 3)), Array1::zeros(3), Activation::ReLU).unwrap();
    let output = dense.forward(Array2::ones((2, 4)).view()).unwrap();

    assert_eq!(output.dim(), (2, 3));
    assert_eq!(dense.input_dim(), 4);
    assert_eq!(dense.output_dim(), 3);
    assert_eq!(dense.param_count(), 15);
}

#[test]
fn test_dense_bias_is_broadcast_per_row() {
    let dense = Dense::new(
        array![[1.0, 0.0], [0.0, 1.0]],
        array![10.0, -10.0],
        Activation::Linear,
    )
    .unwrap();

    let output = dense.forward(array![[1.0, 2.0], [3.0, 4.0]].view()).unwrap();
    assert_eq!(output, array![[11.0, -8.0], [13.0, -6.0]]);
}

#[test]
fn test_dense_does_not_touch_input() {
    let dense = Dense::new(array![[-1.0]], array![0.0], Activation::ReLU).unwrap();
    let input = array![[2.0], [-3.0]];
    let before = input.clone();

    let output = dense.forward(input.view()).unwrap();
    assert_eq!(output, array![[0.0], [3.0]]);
    assert_eq!(input, before);
}

#[test]
fn test_dense_rejects_bias_of_wrong_length() {
    let result = Dense::new(Array2::ones((3, 2)), Array1::zeros(3), Activation::Linear);
    assert_eq!(
        result,
        Err(ModelError::ShapeMismatch {
            layer: 0,
            expected: 2,
            actual: 3
        })
    );
}

#[test]
fn test_dense_rejects_degenerate_matrix() {
    let result = Dense::new(Array2::zeros((0, 2)), Array1::zeros(2), Activation::Linear);
    assert!(matches!(result, Err(ModelError::ConfigurationError(_))));
}

#[test]
fn test_dense_forward_rejects_wrong_input_width() {
    let dense = Dense::new(
        array![[1.0, 0.0], [0.0, 1.0]],
        array![0.0, 0.0],
        Activation::Linear,
    )
    .unwrap();

    let result = dense.forward(array![[1.0, 2.0, 3.0]].view());
    assert_eq!(
        result,
        Err(ModelError::ShapeMismatch {
            layer: 0,
            expected: 2,
            actual: 3
        })
    );
}
