use crate::error::IoError;
use crate::neural_network::Activation;
use crate::{Deserialize, Serialize};
use serde_json::from_reader;
use std::path::{Path, PathBuf};

/// Default name of the energy-per-unit column
pub const DEFAULT_ENERGY_COLUMN: &str = "energy_per_unit";
/// Default name of the split-type column
pub const DEFAULT_SPLIT_COLUMN: &str = "split_type";

fn default_energy_column() -> String {
    DEFAULT_ENERGY_COLUMN.to_string()
}

fn default_split_column() -> String {
    DEFAULT_SPLIT_COLUMN.to_string()
}

/// Locations of the artifacts of a clustering pipeline and the columns it works on.
///
/// # Fields
///
/// - `data_path` - Telemetry CSV
/// - `scaler_path` - Fitted [`StandardScaler`](crate::utility::StandardScaler) (JSON)
/// - `cluster_model_path` - Fitted [`KMeans`](crate::machine_learning::KMeans) (JSON)
/// - `weights_path` - Encoder weight container; without it the assigner runs on the scaled features
/// - `activations` - Per-layer activation schedule; the default is ReLU on hidden layers, linear on the last
/// - `feature_columns` - Feature columns in model order; the default is every numeric column in file order
/// - `energy_column` - Column holding energy per unit, used for reporting only
/// - `split_column` - Column holding the split type, used for reporting only
///
/// # Example
/// ```rust
/// use deepcluster::pipeline::PipelineConfig;
///
/// let config: PipelineConfig = serde_json::from_str(r#"{
///     "data_path": "data/data.csv",
///     "scaler_path": "models/scaler.json",
///     "cluster_model_path": "models/kmeans.json",
///     "weights_path": "models/encoder.json"
/// }"#).unwrap();
///
/// assert_eq!(config.energy_column, "energy_per_unit");
/// assert_eq!(config.artifact_paths().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub data_path: PathBuf,
    pub scaler_path: PathBuf,
    pub cluster_model_path: PathBuf,
    #[serde(default)]
    pub weights_path: Option<PathBuf>,
    #[serde(default)]
    pub activations: Option<Vec<Activation>>,
    #[serde(default)]
    pub feature_columns: Option<Vec<String>>,
    #[serde(default = "default_energy_column")]
    pub energy_column: String,
    #[serde(default = "default_split_column")]
    pub split_column: String,
}

impl PipelineConfig {
    /// Creates a configuration without encoder, with default columns.
    pub fn new(
        data_path: impl Into<PathBuf>,
        scaler_path: impl Into<PathBuf>,
        cluster_model_path: impl Into<PathBuf>,
    ) -> Self {
        PipelineConfig {
            data_path: data_path.into(),
            scaler_path: scaler_path.into(),
            cluster_model_path: cluster_model_path.into(),
            weights_path: None,
            activations: None,
            feature_columns: None,
            energy_column: default_energy_column(),
            split_column: default_split_column(),
        }
    }

    /// Sets the encoder weight container
    pub fn with_weights(mut self, weights_path: impl Into<PathBuf>) -> Self {
        self.weights_path = Some(weights_path.into());
        self
    }

    /// Sets a custom activation schedule
    pub fn with_activations(mut self, activations: Vec<Activation>) -> Self {
        self.activations = Some(activations);
        self
    }

    /// Sets the feature columns, in the order the scaler was fitted on
    pub fn with_feature_columns<S: Into<String>>(mut self, columns: Vec<S>) -> Self {
        self.feature_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the reporting columns
    pub fn with_report_columns(
        mut self,
        energy_column: impl Into<String>,
        split_column: impl Into<String>,
    ) -> Self {
        self.energy_column = energy_column.into();
        self.split_column = split_column.into();
        self
    }

    /// Reads a configuration from a JSON file.
    ///
    /// # Returns
    ///
    /// - `Ok(PipelineConfig)` - The configuration
    /// - `Err(IoError::StdIoError)` - File not found or read operation failed
    /// - `Err(IoError::JsonError)` - Deserialization from JSON failed
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let reader = IoError::load_in_buf_reader(path)?;
        Ok(from_reader(reader)?)
    }

    /// Every file the pipeline reads: data, scaler, cluster model and, if set, weights
    pub fn artifact_paths(&self) -> Vec<&Path> {
        let mut paths = vec![
            self.data_path.as_path(),
            self.scaler_path.as_path(),
            self.cluster_model_path.as_path(),
        ];
        if let Some(weights) = &self.weights_path {
            paths.push(weights.as_path());
        }
        paths
    }

    /// Returns the artifact files that do not exist, in [`PipelineConfig::artifact_paths`] order
    pub fn missing_artifacts(&self) -> Vec<PathBuf> {
        self.artifact_paths()
            .into_iter()
            .filter(|path| !path.is_file())
            .map(Path::to_path_buf)
            .collect()
    }

    /// Fails with `IoError::MissingArtifacts` listing every missing file
    pub fn ensure_artifacts(&self) -> Result<(), IoError> {
        let missing = self.missing_artifacts();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(IoError::MissingArtifacts(missing))
        }
    }
}
