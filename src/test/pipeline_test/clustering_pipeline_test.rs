use super::*;
use crate::traits::{ClusterAssigner, FeatureScaler, LatentEncoder};
use crate::dataset::TelemetryTable;
use std::sync::Arc;

fn in_memory_pipeline() -> ClusteringPipeline {
    let scaler = StandardScaler::new(array![0.0, 0.0], array![1.0, 1.0]).unwrap();
    let encoder = ForwardEvaluator::from_arrays(vec![
        array![[1.0, 0.0], [0.0, 1.0]].into_dyn(),
        array![0.0, 0.0].into_dyn(),
        array![[2.0], [2.0]].into_dyn(),
        array![-1.0].into_dyn(),
    ])
    .unwrap();
    let kmeans = KMeans::from_centroids(array![[-1.0], [5.0]]).unwrap();

    ClusteringPipeline::new(Arc::new(scaler), Some(Arc::new(encoder)), Arc::new(kmeans)).unwrap()
}

#[test]
fn test_predict_chains_scale_encode_assign() {
    let pipeline = in_memory_pipeline();
    let raw = array![[1.0, 2.0], [-1.0, -1.0], [2.0, 2.0]];

    assert_eq!(pipeline.latent(raw.view()).unwrap(), array![[5.0], [-1.0], [7.0]]);
    assert_eq!(pipeline.predict(raw.view()).unwrap(), array![1, 0, 1]);
    assert_eq!(pipeline.n_features(), 2);
    assert_eq!(pipeline.n_clusters(), 2);
    assert!(pipeline.has_encoder());
}

#[test]
fn test_scaler_runs_before_encoder() {
    let scaler = StandardScaler::new(array![1.0, 1.0], array![2.0, 2.0]).unwrap();
    let encoder = ForwardEvaluator::from_arrays(vec![
        array![[1.0], [1.0]].into_dyn(),
        array![0.0].into_dyn(),
    ])
    .unwrap();
    let kmeans = KMeans::from_centroids(array![[0.0], [10.0]]).unwrap();
    let pipeline =
        ClusteringPipeline::new(Arc::new(scaler), Some(Arc::new(encoder)), Arc::new(kmeans))
            .unwrap();

    // (5 - 1) / 2 + (3 - 1) / 2
    assert_eq!(pipeline.latent(array![[5.0, 3.0]].view()).unwrap(), array![[3.0]]);
}

#[test]
fn test_without_encoder_assigner_sees_scaled_features() {
    let scaler = StandardScaler::new(array![10.0], array![5.0]).unwrap();
    let kmeans = KMeans::from_centroids(array![[-1.0], [1.0]]).unwrap();
    let pipeline = ClusteringPipeline::new(Arc::new(scaler), None, Arc::new(kmeans)).unwrap();

    assert!(!pipeline.has_encoder());
    assert_eq!(
        pipeline.predict(array![[4.0], [16.0]].view()).unwrap(),
        array![0, 1]
    );
}

#[test]
fn test_stage_dimensions_are_checked_on_construction() {
    let scaler = Arc::new(StandardScaler::new(array![0.0, 0.0, 0.0], array![1.0, 1.0, 1.0]).unwrap());
    let encoder: Arc<dyn LatentEncoder + Send + Sync> = Arc::new(
        ForwardEvaluator::from_arrays(vec![
            Array2::<f64>::ones((2, 1)).into_dyn(),
            Array1::<f64>::zeros(1).into_dyn(),
        ])
        .unwrap(),
    );
    let kmeans = Arc::new(KMeans::from_centroids(array![[0.0, 0.0]]).unwrap());

    let encoder_mismatch = ClusteringPipeline::new(scaler.clone(), Some(encoder), kmeans.clone());
    assert!(matches!(
        encoder_mismatch,
        Err(ModelError::ShapeMismatch {
            layer: 1,
            expected: 3,
            actual: 2
        })
    ));

    let assigner_mismatch = ClusteringPipeline::new(scaler, None, kmeans);
    assert!(matches!(
        assigner_mismatch,
        Err(ModelError::ShapeMismatch {
            layer: 2,
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn test_raw_width_mismatch_is_reported() {
    let pipeline = in_memory_pipeline();
    assert!(matches!(
        pipeline.predict(array![[1.0, 2.0, 3.0]].view()),
        Err(ModelError::ShapeMismatch { layer: 0, .. })
    ));
}

#[test]
fn test_empty_batch_gives_no_labels() {
    let labels = in_memory_pipeline()
        .predict(Array2::<f64>::zeros((0, 2)).view())
        .unwrap();
    assert!(labels.is_empty());
}

#[test]
fn test_header_only_table_gives_empty_labeled_table() {
    let table = TelemetryTable::from_reader("x,y\n".as_bytes()).unwrap();
    let columns = vec!["x".to_string(), "y".to_string()];

    let labeled = in_memory_pipeline()
        .label_table(Arc::new(table), Some(&columns))
        .unwrap();

    assert_eq!(labeled.n_rows(), 0);
    assert!(labeled.cluster_sizes().is_empty());
    assert_eq!(labeled.feature_columns(), columns.as_slice());
}

#[test]
fn test_stages_behind_trait_objects() {
    struct Doubler;

    impl FeatureScaler for Doubler {
        fn transform(&self, raw: ArrayView2<f64>) -> Result<Array2<f64>, ModelError> {
            Ok(raw.mapv(|v| v * 2.0))
        }

        fn n_features(&self) -> usize {
            1
        }
    }

    struct Sign;

    impl ClusterAssigner for Sign {
        fn predict(&self, data: ArrayView2<f64>) -> Result<Array1<usize>, ModelError> {
            Ok(data.column(0).mapv(|v| usize::from(v > 0.0)))
        }

        fn n_clusters(&self) -> usize {
            2
        }

        fn n_features(&self) -> usize {
            1
        }
    }

    let encoder = ForwardEvaluator::from_arrays(vec![
        array![[-1.0]].into_dyn(),
        array![0.5].into_dyn(),
    ])
    .unwrap();
    assert_eq!(LatentEncoder::output_dim(&encoder), 1);

    let pipeline =
        ClusteringPipeline::new(Arc::new(Doubler), Some(Arc::new(encoder)), Arc::new(Sign))
            .unwrap();
    // -2x + 0.5
    assert_eq!(
        pipeline.predict(array![[0.0], [1.0]].view()).unwrap(),
        array![1, 0]
    );
}

#[test]
fn test_loader_runs_end_to_end() {
    let (_dir, config) = write_artifacts();
    let mut loader = PipelineLoader::new();

    let labeled = loader.run(&config).unwrap();
    assert_eq!(labeled.labels(), &array![1, 0, 1, 0]);
    assert_eq!(labeled.feature_columns(), &["x", "y"]);
    assert_eq!(labeled.rows_in_cluster(0), vec![1, 3]);
    assert_eq!(labeled.cluster_sizes(), vec![(0, 2), (1, 2)]);
}

#[test]
fn test_loader_reuses_cached_artifacts() {
    let (_dir, config) = write_artifacts();
    let mut loader = PipelineLoader::new();

    loader.run(&config).unwrap();
    assert_eq!(loader.cached_artifacts(), 4);
    loader.run(&config).unwrap();
    assert_eq!(loader.cached_artifacts(), 4);

    assert!(loader.invalidate(&config.scaler_path));
    assert_eq!(loader.cached_artifacts(), 3);

    loader.clear();
    assert_eq!(loader.cached_artifacts(), 0);
}

#[test]
fn test_loader_picks_up_changed_artifacts() {
    let (_dir, config) = write_artifacts();
    let mut loader = PipelineLoader::new();
    assert_eq!(loader.run(&config).unwrap().labels(), &array![1, 0, 1, 0]);

    // swap the centroids, the file grows so the change is always detected
    KMeans::from_centroids(array![[5.0], [-1.0], [1000.0]])
        .unwrap()
        .save_to_path(&config.cluster_model_path)
        .unwrap();
    assert_eq!(loader.run(&config).unwrap().labels(), &array![0, 1, 0, 1]);
}

#[test]
fn test_loader_applies_custom_schedule() {
    let (_dir, config) = write_artifacts();
    let config = config.with_activations(vec![Activation::Linear, Activation::Linear]);
    let pipeline = PipelineLoader::new().load(&config).unwrap();

    // 2 * (-1 - 1) - 1 without the hidden ReLU
    assert_eq!(
        pipeline.latent(array![[-1.0, -1.0]].view()).unwrap(),
        array![[-5.0]]
    );
}

#[test]
fn test_loader_rejects_schedule_of_wrong_length() {
    let (_dir, config) = write_artifacts();
    let config = config.with_activations(vec![Activation::ReLU]);
    assert!(matches!(
        PipelineLoader::new().load(&config),
        Err(IoError::Model(ModelError::ConfigurationError(_)))
    ));
}

#[test]
fn test_missing_artifacts_are_listed() {
    let (dir, config) = write_artifacts();
    std::fs::remove_file(file_in(&dir, "kmeans.json")).unwrap();
    std::fs::remove_file(file_in(&dir, "encoder.json")).unwrap();

    assert_eq!(
        config.missing_artifacts(),
        vec![file_in(&dir, "kmeans.json"), file_in(&dir, "encoder.json")]
    );
    match PipelineLoader::new().run(&config) {
        Err(IoError::MissingArtifacts(paths)) => assert_eq!(paths.len(), 2),
        other => panic!("Expected MissingArtifacts, got {:?}", other.map(|t| t.n_rows())),
    }
}

#[test]
fn test_missing_feature_column_is_reported() {
    let (_dir, config) = write_artifacts();
    let config = config.with_feature_columns(vec!["x", "jitter"]);
    assert!(matches!(
        PipelineLoader::new().run(&config),
        Err(IoError::Model(ModelError::InputValidationError(_)))
    ));
}

#[test]
fn test_config_from_json_file() {
    let (dir, config) = write_artifacts();
    let path = file_in(&dir, "pipeline.json");
    std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

    assert_eq!(PipelineConfig::from_path(&path).unwrap(), config);
}

#[test]
fn test_config_defaults() {
    let config: PipelineConfig = serde_json::from_str(
        r#"{"data_path": "d.csv", "scaler_path": "s.json", "cluster_model_path": "k.json",
            "activations": ["relu", "linear"]}"#,
    )
    .unwrap();

    assert_eq!(config.weights_path, None);
    assert_eq!(config.feature_columns, None);
    assert_eq!(config.energy_column, DEFAULT_ENERGY_COLUMN);
    assert_eq!(config.split_column, DEFAULT_SPLIT_COLUMN);
    assert_eq!(
        config.activations,
        Some(vec![Activation::ReLU, Activation::Linear])
    );
    assert_eq!(config.artifact_paths().len(), 3);
}
