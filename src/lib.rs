//! Latent-space clustering of tabular telemetry.
//!
//! The crate replays the encode half of a trained dense autoencoder from its stored
//! weight stack, standardizes raw features with a fitted scaler, and assigns each
//! latent row to the nearest k-means centroid. Artifacts are plain JSON files; the
//! telemetry itself is read from CSV.

pub(crate) use serde::{Deserialize, Serialize};

/// Error types shared by every module.
///
/// - `ModelError` - Invalid shapes, malformed weight stacks, invalid input data
/// - `IoError` - Reading or writing artifacts, wrapping `ModelError` for content that fails validation
pub mod error;

pub use error::{IoError, ModelError};

/// Module `math` contains the numeric helpers shared by the scaler and the cluster assigner.
///
/// # Core Functions
///
/// - `squared_euclidean_distance_row` - Squared Euclidean distance between two vectors
/// - `mean_and_variance` - Mean and population variance of a vector
///
/// # Example
/// ```rust
/// use deepcluster::math::{mean_and_variance, squared_euclidean_distance_row};
/// use ndarray::array;
///
/// let v1 = array![1.0, 2.0];
/// let v2 = array![4.0, 6.0];
/// assert_eq!(squared_euclidean_distance_row(&v1, &v2), 25.0);
///
/// let (mean, variance) = mean_and_variance(&array![1.0, 3.0]);
/// assert_eq!((mean, variance), (2.0, 1.0));
/// ```
pub mod math;

/// Interfaces at the seams of the clustering pipeline.
///
/// - `FeatureScaler` - Raw features to standardized features
/// - `LatentEncoder` - Standardized features to latent vectors
/// - `ClusterAssigner` - Latent vectors to cluster labels
pub mod traits;

/// Dense forward evaluation of a stored autoencoder encoder.
///
/// # Core Components
///
/// - **Activation**: Per-layer nonlinearity (Linear, ReLU, Sigmoid, Tanh)
/// - **Dense**: One affine step `x . W + b` followed by its activation
/// - **WeightStack**: Validated sequence of dense layers whose dimensions chain
/// - **ForwardEvaluator**: Replays a weight stack over a batch of standardized rows
/// - **serialize_weight**: Reads and writes the `weight_0 .. weight_{2L-1}` JSON container
///
/// # Examples
/// ```rust
/// use deepcluster::neural_network::*;
/// use ndarray::array;
///
/// // two layers: identity, then a linear projection to one latent dimension
/// let evaluator = ForwardEvaluator::from_arrays(vec![
///     array![[1.0, 0.0], [0.0, 1.0]].into_dyn(),
///     array![0.0, 0.0].into_dyn(),
///     array![[2.0], [2.0]].into_dyn(),
///     array![-1.0].into_dyn(),
/// ])
/// .unwrap();
///
/// let latent = evaluator.encode(array![[1.0, 2.0], [-1.0, -1.0]].view()).unwrap();
/// assert_eq!(latent, array![[5.0], [-1.0]]);
///
/// println!("{}", evaluator.summary());
/// ```
pub mod neural_network;

/// Cluster assignment over latent vectors.
///
/// - **KMeans**: Nearest-centroid assignment from stored centroids, with inertia and JSON load/save
///
/// # Examples
/// ```rust
/// use deepcluster::machine_learning::KMeans;
/// use ndarray::array;
///
/// let kmeans = KMeans::from_centroids(array![[0.0, 0.0], [10.0, 10.0]]).unwrap();
/// let labels = kmeans.predict(&array![[1.0, 1.0], [9.0, 8.0]]).unwrap();
/// assert_eq!(labels, array![0, 1]);
/// ```
pub mod machine_learning;

/// Feature preprocessing.
///
/// - **StandardScaler**: Stored mean and scale, `transform(raw) = (raw - mean) / scale`
pub mod utility;

/// Tabular telemetry loaded from CSV, with numeric/text column inference.
#[cfg(feature = "dataset")]
pub mod dataset;

/// Configuration, artifact caching and the scale, encode and assign pipeline.
///
/// # Examples
/// ```rust,no_run
/// use deepcluster::pipeline::{PipelineConfig, PipelineLoader};
/// use std::path::Path;
///
/// let config = PipelineConfig::from_path(Path::new("pipeline.json")).unwrap();
/// let mut loader = PipelineLoader::new();
///
/// let labeled = loader.run(&config).unwrap();
/// let report = labeled.energy_report(&config).unwrap();
/// println!("{:?}", report.cluster_sizes);
/// ```
#[cfg(feature = "dataset")]
pub mod pipeline;

/// Energy and split-type aggregates over cluster labels.
#[cfg(feature = "dataset")]
pub mod report;

/// A convenience module that re-exports the most commonly used types and traits from this crate.
///
/// # Examples
/// ```rust
/// use deepcluster::prelude::*;
///
/// let schedule = Activation::default_schedule(3);
/// assert_eq!(schedule.last(), Some(&Activation::Linear));
/// ```
pub mod prelude;
