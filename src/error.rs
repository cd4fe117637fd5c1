use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Error types that can occur during model operations
///
/// # Variants
///
/// - `ShapeMismatch` - An affine step (or a scaler/assigner input) has incompatible dimensions.
///   Carries the index of the offending layer together with the expected and actual dimension
/// - `ConfigurationError` - The weight stack or activation schedule is malformed
///   (odd number of arrays, empty stack, wrong array rank, schedule of the wrong length)
/// - `InputValidationError` - indicates the input data provided does not meet the expected format, type, or validation rules
/// - `ProcessingError` - indicates that there is something wrong while processing
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    ShapeMismatch {
        layer: usize,
        expected: usize,
        actual: usize,
    },
    ConfigurationError(String),
    InputValidationError(String),
    ProcessingError(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::ShapeMismatch {
                layer,
                expected,
                actual,
            } => write!(
                f,
                "Shape mismatch at layer {}: expected dimension {}, got {}",
                layer, expected, actual
            ),
            ModelError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            ModelError::InputValidationError(msg) => write!(f, "Input validation error: {}", msg),
            ModelError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}

/// Input/Output error types that can occur while loading or saving artifacts
///
/// # Variants
///
/// - `StdIoError` - Wraps standard I/O errors from file system operations (reading, writing, file access)
/// - `JsonError` - Wraps JSON serialization/deserialization errors for weight, scaler, model and config files
/// - `CsvError` - Wraps CSV parsing errors raised while reading telemetry tables
/// - `MissingArtifacts` - One or more artifact files required by a pipeline do not exist
/// - `Model` - The artifact was read successfully but its content is invalid
#[derive(Debug)]
pub enum IoError {
    StdIoError(std::io::Error),
    JsonError(serde_json::Error),
    #[cfg(feature = "dataset")]
    CsvError(csv::Error),
    MissingArtifacts(Vec<PathBuf>),
    Model(ModelError),
}

impl IoError {
    pub fn load_in_buf_reader(path: &Path) -> Result<BufReader<File>, IoError> {
        let file = File::open(path).map_err(IoError::StdIoError)?;
        Ok(BufReader::new(file))
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::StdIoError(e) => write!(f, "IO error: {}", e),
            IoError::JsonError(e) => write!(f, "JSON error: {}", e),
            #[cfg(feature = "dataset")]
            IoError::CsvError(e) => write!(f, "CSV error: {}", e),
            IoError::MissingArtifacts(paths) => {
                let listed: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
                write!(f, "Missing artifact files: {}", listed.join(", "))
            }
            IoError::Model(e) => write!(f, "Invalid artifact: {}", e),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::StdIoError(e) => Some(e),
            IoError::JsonError(e) => Some(e),
            #[cfg(feature = "dataset")]
            IoError::CsvError(e) => Some(e),
            IoError::MissingArtifacts(_) => None,
            IoError::Model(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::StdIoError(e)
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::JsonError(e)
    }
}

#[cfg(feature = "dataset")]
impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::CsvError(e)
    }
}

impl From<ModelError> for IoError {
    fn from(e: ModelError) -> Self {
        IoError::Model(e)
    }
}
