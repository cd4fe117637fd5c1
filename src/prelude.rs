/// Prelude module for the forward evaluator and its weight containers.
pub mod neural_network_prelude;
/// Prelude module for cluster assignment.
pub mod machine_learning_prelude;
/// Prelude module for feature scaling.
pub mod utility_prelude;
/// Prelude module for telemetry tables, pipelines and reports.
#[cfg(feature = "dataset")]
pub mod dataset_prelude;

pub use crate::error::{IoError, ModelError};
pub use crate::traits::{ClusterAssigner, FeatureScaler, LatentEncoder};
#[cfg(feature = "dataset")]
pub use dataset_prelude::*;
pub use machine_learning_prelude::*;
pub use neural_network_prelude::*;
pub use utility_prelude::*;
