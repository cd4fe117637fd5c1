use super::helper_function::{check_finite, check_width};
use crate::error::{IoError, ModelError};
use crate::math::squared_euclidean_distance_row;
use crate::traits::ClusterAssigner;
use crate::{Deserialize, Serialize};
use log::info;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Data, Ix2};
use rayon::prelude::*;
use serde_json::{from_reader, to_writer_pretty};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Threshold for parallelization in KMeans prediction.
/// When the number of samples is below this threshold, sequential processing is used.
const KMEANS_PARALLEL_THRESHOLD: usize = 1000;

/// Fitted K-Means cluster assigner.
///
/// Holds the cluster centers of a pre-trained k-means model and assigns every sample
/// to the nearest center by squared Euclidean distance. Ties go to the lowest cluster
/// index. Fitting is done elsewhere; this type only replays the trained centroids.
///
/// # Fields
///
/// - `centroids` - Cluster centers with shape (n_clusters, n_features)
///
/// # Examples
/// ```rust
/// use deepcluster::machine_learning::kmeans::KMeans;
/// use ndarray::array;
///
/// let kmeans = KMeans::from_centroids(array![[0.0, 0.0], [10.0, 10.0]]).unwrap();
///
/// let labels = kmeans.predict(&array![[1.0, -1.0], [9.0, 11.0], [6.0, 6.0]]).unwrap();
/// assert_eq!(labels.to_vec(), vec![0, 1, 1]);
///
/// let inertia = kmeans.inertia(&array![[1.0, -1.0]]).unwrap();
/// assert!((inertia - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct KMeans {
    centroids: Array2<f64>,
}

impl KMeans {
    /// Creates an assigner from trained cluster centers.
    ///
    /// # Parameters
    ///
    /// * `centroids` - Cluster centers with shape (n_clusters, n_features)
    ///
    /// # Returns
    ///
    /// - `Ok(KMeans)` - The assigner
    /// - `Err(ModelError::ConfigurationError)` - If there are no centroids or no features
    /// - `Err(ModelError::InputValidationError)` - If a centroid contains NaN or infinite values
    pub fn from_centroids(centroids: Array2<f64>) -> Result<Self, ModelError> {
        let kmeans = KMeans { centroids };
        kmeans.validate()?;
        Ok(kmeans)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.centroids.nrows() == 0 || self.centroids.ncols() == 0 {
            return Err(ModelError::ConfigurationError(format!(
                "k-means model needs at least one centroid and one feature, got shape ({}, {})",
                self.centroids.nrows(),
                self.centroids.ncols()
            )));
        }
        check_finite(&self.centroids, "centroids")
    }

    /// Returns the cluster centers, shape (n_clusters, n_features)
    pub fn get_centroids(&self) -> &Array2<f64> {
        &self.centroids
    }

    /// Returns the number of clusters
    pub fn n_clusters(&self) -> usize {
        self.centroids.nrows()
    }

    /// Returns the number of features each sample must have
    pub fn n_features(&self) -> usize {
        self.centroids.ncols()
    }

    /// Finds the closest centroid to a sample and returns its index and squared distance.
    ///
    /// When every squared distance overflows, the centroids are ranked in coordinates
    /// divided by the largest magnitude involved; the distance reported is then infinite.
    fn closest_centroid(&self, sample: ArrayView1<f64>) -> (usize, f64) {
        let (idx, dist) =
            self.nearest_by(|centroid| squared_euclidean_distance_row(&sample, &centroid));
        if dist.is_finite() {
            return (idx, dist);
        }

        let scale = sample
            .iter()
            .chain(self.centroids.iter())
            .fold(0.0_f64, |max, v| max.max(v.abs()));
        let (idx, _) = self.nearest_by(|centroid| {
            sample
                .iter()
                .zip(centroid.iter())
                .map(|(a, b)| (a / scale - b / scale).powi(2))
                .sum()
        });

        (idx, f64::INFINITY)
    }

    /// Lowest index minimizing `distance`, ties going to the lower index
    fn nearest_by<F>(&self, distance: F) -> (usize, f64)
    where
        F: Fn(ArrayView1<f64>) -> f64,
    {
        let mut min_dist = f64::INFINITY;
        let mut min_idx = 0;

        for (i, centroid) in self.centroids.outer_iter().enumerate() {
            let dist = distance(centroid);
            if dist < min_dist {
                min_dist = dist;
                min_idx = i;
            }
        }

        (min_idx, min_dist)
    }

    fn assignments<S>(&self, data: &ArrayBase<S, Ix2>) -> Result<Vec<(usize, f64)>, ModelError>
    where
        S: Data<Elem = f64>,
    {
        check_width(data, self.n_features())?;
        check_finite(data, "input data")?;

        let results: Vec<(usize, f64)> = if data.nrows() >= KMEANS_PARALLEL_THRESHOLD {
            data.outer_iter()
                .into_par_iter()
                .map(|sample| self.closest_centroid(sample))
                .collect()
        } else {
            data.outer_iter()
                .map(|sample| self.closest_centroid(sample))
                .collect()
        };

        Ok(results)
    }

    /// Predicts the closest cluster for each sample.
    ///
    /// # Parameters
    ///
    /// * `data` - Samples with shape (n_samples, n_features). May have zero rows
    ///
    /// # Returns
    ///
    /// - `Ok(Array1<usize>)` - One label per sample, in input order
    /// - `Err(ModelError::ShapeMismatch)` - If the column count differs from the centroids'
    /// - `Err(ModelError::InputValidationError)` - If the data contains NaN or infinite values
    ///
    /// # Performance
    ///
    /// Parallel processing is used when the number of samples is greater than or equal to 1000.
    pub fn predict<S>(&self, data: &ArrayBase<S, Ix2>) -> Result<Array1<usize>, ModelError>
    where
        S: Data<Elem = f64>,
    {
        let labels: Vec<usize> = self
            .assignments(data)?
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        Ok(Array1::from(labels))
    }

    /// Sum of squared distances of the samples to their closest centroid.
    ///
    /// # Parameters
    ///
    /// * `data` - Samples with shape (n_samples, n_features)
    ///
    /// # Returns
    ///
    /// - `Ok(f64)` - The inertia, 0.0 for an empty batch
    /// - `Err(ModelError)` - Same conditions as [`KMeans::predict`]
    pub fn inertia<S>(&self, data: &ArrayBase<S, Ix2>) -> Result<f64, ModelError>
    where
        S: Data<Elem = f64>,
    {
        Ok(self.assignments(data)?.iter().map(|(_, dist)| dist).sum())
    }

    /// Loads a model written by [`KMeans::save_to_path`].
    ///
    /// # Parameters
    ///
    /// * `path` - Path of the JSON file
    ///
    /// # Returns
    ///
    /// - `Ok(KMeans)` - The validated model
    /// - `Err(IoError::StdIoError)` - File not found or read operation failed
    /// - `Err(IoError::JsonError)` - Deserialization from JSON failed
    /// - `Err(IoError::Model)` - The stored centroids are invalid
    pub fn load_from_path(path: &Path) -> Result<Self, IoError> {
        let reader = IoError::load_in_buf_reader(path)?;
        let kmeans: KMeans = from_reader(reader)?;
        kmeans.validate()?;

        info!(
            "loaded k-means model with {} clusters over {} features from {}",
            kmeans.centroids.nrows(),
            kmeans.centroids.ncols(),
            path.display()
        );
        Ok(kmeans)
    }

    /// Writes the model as JSON.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - The file has been written and flushed
    /// - `Err(IoError)` - File creation, write or serialization failed
    pub fn save_to_path(&self, path: &Path) -> Result<(), IoError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

impl ClusterAssigner for KMeans {
    fn predict(&self, data: ndarray::ArrayView2<f64>) -> Result<Array1<usize>, ModelError> {
        KMeans::predict(self, &data)
    }

    fn n_clusters(&self) -> usize {
        self.centroids.nrows()
    }

    fn n_features(&self) -> usize {
        self.centroids.ncols()
    }
}
