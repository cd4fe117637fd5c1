//! Glue between the stored artifacts and the evaluator: configuration, an explicit
//! artifact cache, the scale/encode/assign pipeline and its labelled output.

/// Caller-owned cache of loaded artifacts
pub mod artifact_cache;
pub mod clustering_pipeline;
/// Artifact locations and column names
pub mod config;
pub mod labeled_table;

pub use artifact_cache::*;
pub use clustering_pipeline::*;
pub use config::*;
pub use labeled_table::*;
