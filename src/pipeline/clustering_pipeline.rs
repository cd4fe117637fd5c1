use super::*;
use crate::dataset::TelemetryTable;
use crate::error::{IoError, ModelError};
use crate::machine_learning::KMeans;
use crate::neural_network::{ForwardEvaluator, load_weight_stack};
use crate::traits::{ClusterAssigner, FeatureScaler, LatentEncoder};
use crate::utility::StandardScaler;
use log::info;
use ndarray::{Array1, Array2, ArrayView2};
use std::sync::Arc;

/// A fitted scaler, an optional encoder and a cluster assigner chained together.
///
/// `predict(raw) = assigner.predict(encoder.encode(scaler.transform(raw)))`, with the
/// encode step skipped when there is no encoder. Dimensions are checked once, when
/// the pipeline is built.
#[derive(Clone)]
pub struct ClusteringPipeline {
    scaler: Arc<dyn FeatureScaler + Send + Sync>,
    encoder: Option<Arc<dyn LatentEncoder + Send + Sync>>,
    assigner: Arc<dyn ClusterAssigner + Send + Sync>,
}

impl ClusteringPipeline {
    /// Chains the three stages.
    ///
    /// # Parameters
    ///
    /// - `scaler` - Maps raw features into the standardized space
    /// - `encoder` - Optional latent encoder
    /// - `assigner` - Cluster assigner over the encoder output (or the scaled features)
    ///
    /// # Returns
    ///
    /// - `Ok(ClusteringPipeline)` - The pipeline
    /// - `Err(ModelError::ShapeMismatch)` - If adjacent stages disagree on the width of the
    ///   batch passed between them. `layer` is the index of the receiving stage: 1 for the
    ///   encoder, 2 for the assigner
    pub fn new(
        scaler: Arc<dyn FeatureScaler + Send + Sync>,
        encoder: Option<Arc<dyn LatentEncoder + Send + Sync>>,
        assigner: Arc<dyn ClusterAssigner + Send + Sync>,
    ) -> Result<Self, ModelError> {
        let mut width = scaler.n_features();

        if let Some(encoder) = &encoder {
            if encoder.input_dim() != width {
                return Err(ModelError::ShapeMismatch {
                    layer: 1,
                    expected: width,
                    actual: encoder.input_dim(),
                });
            }
            width = encoder.output_dim();
        }

        if assigner.n_features() != width {
            return Err(ModelError::ShapeMismatch {
                layer: 2,
                expected: width,
                actual: assigner.n_features(),
            });
        }

        Ok(ClusteringPipeline {
            scaler,
            encoder,
            assigner,
        })
    }

    /// Number of raw features the pipeline expects
    pub fn n_features(&self) -> usize {
        self.scaler.n_features()
    }

    /// Number of clusters the pipeline can emit
    pub fn n_clusters(&self) -> usize {
        self.assigner.n_clusters()
    }

    /// Returns `true` if an encoder runs between scaler and assigner
    pub fn has_encoder(&self) -> bool {
        self.encoder.is_some()
    }

    /// Scales and, if there is an encoder, encodes a raw batch.
    ///
    /// # Returns
    ///
    /// - `Ok(Array2<f64>)` - The batch the assigner sees
    /// - `Err(ModelError::ShapeMismatch)` - If `raw` does not have `n_features` columns
    pub fn latent(&self, raw: ArrayView2<f64>) -> Result<Array2<f64>, ModelError> {
        let scaled = self.scaler.transform(raw)?;
        match &self.encoder {
            Some(encoder) => encoder.encode(scaled.view()),
            None => Ok(scaled),
        }
    }

    /// Assigns one cluster label per row of a raw batch.
    ///
    /// # Returns
    ///
    /// - `Ok(Array1<usize>)` - Labels in row order; empty for an empty batch
    /// - `Err(ModelError)` - From any stage, unchanged
    pub fn predict(&self, raw: ArrayView2<f64>) -> Result<Array1<usize>, ModelError> {
        let latent = self.latent(raw)?;
        self.assigner.predict(latent.view())
    }

    /// Labels every row of a telemetry table.
    ///
    /// # Parameters
    ///
    /// - `table` - The table
    /// - `feature_columns` - Columns in model order; every numeric column when `None`
    ///
    /// # Returns
    ///
    /// - `Ok(LabeledTable)` - The table joined with its labels
    /// - `Err(ModelError::InputValidationError)` - If a feature column is missing or not numeric
    /// - `Err(ModelError)` - From any stage
    pub fn label_table(
        &self,
        table: Arc<TelemetryTable>,
        feature_columns: Option<&[String]>,
    ) -> Result<LabeledTable, ModelError> {
        let columns: Vec<String> = match feature_columns {
            Some(columns) => columns.to_vec(),
            None => table
                .numeric_feature_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        };

        let features = table.numeric_matrix(&columns)?;
        let labels = self.predict(features.view())?;

        LabeledTable::new(table, labels, columns)
    }
}

/// Builds pipelines from a [`PipelineConfig`], reusing artifacts that did not change on disk.
///
/// Owns one [`ArtifactCache`] per artifact kind; dropping the loader drops every cached artifact.
#[derive(Default)]
pub struct PipelineLoader {
    scalers: ArtifactCache<StandardScaler>,
    encoders: ArtifactCache<ForwardEvaluator>,
    assigners: ArtifactCache<KMeans>,
    tables: ArtifactCache<TelemetryTable>,
}

impl PipelineLoader {
    /// Creates a loader with empty caches
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads (or reuses) the scaler, encoder and assigner named by `config`.
    ///
    /// # Returns
    ///
    /// - `Ok(ClusteringPipeline)` - The pipeline
    /// - `Err(IoError::MissingArtifacts)` - If any configured file does not exist
    /// - `Err(IoError)` - On read, parse or validation errors
    pub fn load(&mut self, config: &PipelineConfig) -> Result<ClusteringPipeline, IoError> {
        config.ensure_artifacts()?;

        let scaler = self
            .scalers
            .get_or_load(&config.scaler_path, StandardScaler::load_from_path)?;
        let assigner = self
            .assigners
            .get_or_load(&config.cluster_model_path, KMeans::load_from_path)?;

        let encoder: Option<Arc<dyn LatentEncoder + Send + Sync>> = match &config.weights_path {
            Some(path) => {
                let evaluator = self.encoders.get_or_load(path, |p| {
                    Ok(ForwardEvaluator::new(load_weight_stack(p)?))
                })?;
                let evaluator = match &config.activations {
                    Some(schedule) => Arc::new((*evaluator).clone().with_activations(schedule)?),
                    None => evaluator,
                };
                Some(evaluator as Arc<dyn LatentEncoder + Send + Sync>)
            }
            None => None,
        };

        let pipeline = ClusteringPipeline::new(scaler, encoder, assigner)?;
        info!(
            "pipeline ready: {} features, {} clusters, encoder: {}",
            pipeline.n_features(),
            pipeline.n_clusters(),
            pipeline.has_encoder()
        );
        Ok(pipeline)
    }

    /// Loads (or reuses) the telemetry table named by `config`
    pub fn load_table(&mut self, config: &PipelineConfig) -> Result<Arc<TelemetryTable>, IoError> {
        self.tables
            .get_or_load(&config.data_path, TelemetryTable::from_csv_path)
    }

    /// Loads everything named by `config` and labels the table.
    ///
    /// # Returns
    ///
    /// - `Ok(LabeledTable)` - The labelled table
    /// - `Err(IoError::MissingArtifacts)` - If any configured file does not exist
    /// - `Err(IoError::Model)` - If a configured feature column is missing, or a stage fails
    pub fn run(&mut self, config: &PipelineConfig) -> Result<LabeledTable, IoError> {
        let pipeline = self.load(config)?;
        let table = self.load_table(config)?;

        if let Some(columns) = &config.feature_columns {
            table.require_columns(columns)?;
        }

        Ok(pipeline.label_table(table, config.feature_columns.as_deref())?)
    }

    /// Drops every cached artifact that was loaded from `path`. Returns `true` if any was.
    pub fn invalidate(&mut self, path: &std::path::Path) -> bool {
        let scaler = self.scalers.invalidate(path);
        let encoder = self.encoders.invalidate(path);
        let assigner = self.assigners.invalidate(path);
        let table = self.tables.invalidate(path);
        scaler || encoder || assigner || table
    }

    /// Drops every cached artifact
    pub fn clear(&mut self) {
        self.scalers.clear();
        self.encoders.clear();
        self.assigners.clear();
        self.tables.clear();
    }

    /// Number of cached artifacts across all kinds
    pub fn cached_artifacts(&self) -> usize {
        self.scalers.len() + self.encoders.len() + self.assigners.len() + self.tables.len()
    }
}
