use super::*;

fn entry(index: usize, array: SerializableArray) -> (String, SerializableArray) {
    (format!("weight_{}", index), array)
}

#[test]
fn test_keys_are_ordered_by_numeric_suffix() {
    // twelve single-element entries, listed out of order; weight_10 must follow weight_9
    let mut entries: Vec<(String, SerializableArray)> = (0..12)
        .map(|i| entry(i, SerializableArray::Vector(vec![i as f64])))
        .collect();
    entries.reverse();
    entries.swap(0, 5);

    let arrays = ordered_weight_arrays(entries).unwrap();
    let values: Vec<f64> = arrays.iter().map(|a| a[[0]]).collect();
    assert_eq!(values, (0..12).map(|i| i as f64).collect::<Vec<_>>());
}

#[test]
fn test_gap_in_keys_is_rejected() {
    let entries = vec![
        entry(0, SerializableArray::Matrix(vec![vec![1.0]])),
        entry(2, SerializableArray::Vector(vec![0.0])),
    ];
    assert!(matches!(
        ordered_weight_arrays(entries),
        Err(ModelError::ConfigurationError(_))
    ));
}

#[test]
fn test_foreign_key_is_rejected() {
    let entries = vec![
        entry(0, SerializableArray::Matrix(vec![vec![1.0]])),
        ("bias_1".to_string(), SerializableArray::Vector(vec![0.0])),
    ];
    assert!(matches!(
        ordered_weight_arrays(entries),
        Err(ModelError::ConfigurationError(_))
    ));
}

#[test]
fn test_duplicate_index_is_rejected() {
    let entries = vec![
        entry(0, SerializableArray::Matrix(vec![vec![1.0]])),
        ("weight_00".to_string(), SerializableArray::Vector(vec![0.0])),
    ];
    assert!(matches!(
        ordered_weight_arrays(entries),
        Err(ModelError::ConfigurationError(_))
    ));
}

#[test]
fn test_ragged_matrix_is_rejected() {
    let ragged = SerializableArray::Matrix(vec![vec![1.0, 2.0], vec![3.0]]);
    assert!(matches!(
        ragged.to_array(),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_matrix_is_not_transposed() {
    let stored = SerializableArray::Matrix(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    let array = stored.to_array().unwrap();

    assert_eq!(array.shape(), &[2, 3]);
    assert_eq!(array[[0, 2]], 3.0);
    assert_eq!(SerializableArray::from_array(&array).unwrap(), stored);
}

#[test]
fn test_untagged_json_shapes() {
    let matrix: SerializableArray = serde_json::from_str("[[1.0, 2.0]]").unwrap();
    let vector: SerializableArray = serde_json::from_str("[1.0, 2.0]").unwrap();
    assert!(matches!(matrix, SerializableArray::Matrix(_)));
    assert!(matches!(vector, SerializableArray::Vector(_)));
}

#[test]
fn test_three_dimensional_array_cannot_be_stored() {
    let cube = ArrayD::<f64>::zeros(IxDyn(&[2, 2, 2]));
    assert!(matches!(
        SerializableArray::from_array(&cube),
        Err(ModelError::ConfigurationError(_))
    ));
}

#[test]
fn test_non_finite_values_cannot_be_stored() {
    let matrix = array![[1.0, f64::NAN]].into_dyn();
    let vector = array![f64::INFINITY].into_dyn();

    assert!(matches!(
        SerializableArray::from_array(&matrix),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        SerializableArray::from_array(&vector),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_save_rejects_nan_weights_without_writing() {
    let stack = WeightStack::from_arrays(vec![
        array![[f64::NAN]].into_dyn(),
        array![0.0].into_dyn(),
    ])
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("encoder.json");

    let result = save_weight_stack(&stack, &path);
    assert!(matches!(
        result,
        Err(crate::IoError::Model(ModelError::InputValidationError(_)))
    ));
    assert!(!path.exists());
}

#[test]
fn test_saved_stack_loads_back_unchanged() {
    let stack = random_stack(&[3, 4, 2], 11);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("encoder.json");

    save_weight_stack(&stack, &path).unwrap();
    let loaded = load_weight_stack(&path).unwrap();

    assert_eq!(loaded.n_layers(), 2);
    for (saved, read) in stack.to_arrays().iter().zip(loaded.to_arrays().iter()) {
        assert_eq!(saved.shape(), read.shape());
        for (a, b) in saved.iter().zip(read.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }
}
