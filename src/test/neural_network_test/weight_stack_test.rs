use super::*;

#[test]
fn test_from_arrays_builds_layers_in_order() {
    let stack = WeightStack::from_arrays(identity_then_sum_stack()).unwrap();

    assert_eq!(stack.n_layers(), 2);
    assert_eq!(stack.input_dim(), 2);
    assert_eq!(stack.output_dim(), 1);
    assert_eq!(stack.layers()[1].weights(), &array![[2.0], [2.0]]);
    assert_eq!(stack.param_count(), 6 + 3);
    assert_eq!(stack.to_arrays(), identity_then_sum_stack());
}

#[test]
fn test_empty_stack_is_rejected() {
    assert!(matches!(
        WeightStack::from_arrays(vec![]),
        Err(ModelError::ConfigurationError(_))
    ));
    assert!(matches!(
        WeightStack::from_layers(vec![]),
        Err(ModelError::ConfigurationError(_))
    ));
}

#[test]
fn test_odd_number_of_arrays_is_rejected() {
    let mut arrays = identity_then_sum_stack();
    arrays.pop();
    assert!(matches!(
        WeightStack::from_arrays(arrays),
        Err(ModelError::ConfigurationError(_))
    ));
}

#[test]
fn test_wrong_rank_is_rejected() {
    // bias given as a matrix
    let arrays = vec![Array2::<f64>::ones((2, 2)).into_dyn(), Array2::<f64>::ones((1, 2)).into_dyn()];
    assert!(matches!(
        WeightStack::from_arrays(arrays),
        Err(ModelError::ConfigurationError(_))
    ));

    // weights given as a vector
    let arrays = vec![Array1::<f64>::ones(2).into_dyn(), Array1::<f64>::ones(2).into_dyn()];
    assert!(matches!(
        WeightStack::from_arrays(arrays),
        Err(ModelError::ConfigurationError(_))
    ));
}

#[test]
fn test_chain_mismatch_reports_layer_and_dimensions() {
    let arrays = vec![
        Array2::<f64>::ones((5, 4)).into_dyn(),
        Array1::<f64>::zeros(4).into_dyn(),
        Array2::<f64>::ones((3, 2)).into_dyn(),
        Array1::<f64>::zeros(2).into_dyn(),
    ];
    assert_eq!(
        WeightStack::from_arrays(arrays),
        Err(ModelError::ShapeMismatch {
            layer: 1,
            expected: 4,
            actual: 3
        })
    );
}

#[test]
fn test_bias_mismatch_reports_its_layer() {
    let arrays = vec![
        Array2::<f64>::ones((2, 3)).into_dyn(),
        Array1::<f64>::zeros(3).into_dyn(),
        Array2::<f64>::ones((3, 2)).into_dyn(),
        Array1::<f64>::zeros(5).into_dyn(),
    ];
    assert_eq!(
        WeightStack::from_arrays(arrays),
        Err(ModelError::ShapeMismatch {
            layer: 1,
            expected: 2,
            actual: 5
        })
    );
}

#[test]
fn test_with_activations() {
    let stack = random_stack(&[4, 3, 2], 1);
    assert_eq!(stack.activations(), vec![Activation::ReLU, Activation::Linear]);

    let stack = stack
        .with_activations(&[Activation::Tanh, Activation::Sigmoid])
        .unwrap();
    assert_eq!(stack.activations(), vec![Activation::Tanh, Activation::Sigmoid]);

    assert!(matches!(
        stack.with_activations(&[Activation::ReLU]),
        Err(ModelError::ConfigurationError(_))
    ));
}
