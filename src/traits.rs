use crate::ModelError;
use ndarray::{Array1, Array2, ArrayView2};

/// Defines the interface of a fitted feature scaler.
///
/// A scaler maps raw feature rows onto the standardized space the encoder
/// and the cluster assigner were trained on. It never changes the number of rows.
pub trait FeatureScaler {
    /// Standardizes a raw feature matrix.
    ///
    /// # Parameters
    ///
    /// * `raw` - Raw feature matrix with shape (n_samples, n_features)
    ///
    /// # Returns
    ///
    /// - `Ok(Array2<f64>)` - Standardized matrix with the same shape as the input
    /// - `Err(ModelError::ShapeMismatch)` - If the number of columns differs from the fitted feature count
    fn transform(&self, raw: ArrayView2<f64>) -> Result<Array2<f64>, ModelError>;

    /// Returns the number of features the scaler was fitted on.
    fn n_features(&self) -> usize;
}

/// Defines the interface of a latent encoder.
///
/// An encoder is a pure function of its input batch: it never mutates itself
/// or the input, and row `r` of the output depends only on row `r` of the input.
pub trait LatentEncoder {
    /// Encodes a standardized batch into its latent representation.
    ///
    /// # Parameters
    ///
    /// * `x` - Standardized input batch with shape (n_samples, input_dim)
    ///
    /// # Returns
    ///
    /// - `Ok(Array2<f64>)` - Latent batch with shape (n_samples, output_dim)
    /// - `Err(ModelError::ShapeMismatch)` - If the input width does not match the first layer
    fn encode(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, ModelError>;

    /// Returns the expected width of input batches.
    fn input_dim(&self) -> usize;

    /// Returns the width of produced latent batches.
    fn output_dim(&self) -> usize;
}

/// Defines the interface of a fitted cluster assigner.
pub trait ClusterAssigner {
    /// Assigns one cluster label per row of `data`.
    ///
    /// # Parameters
    ///
    /// * `data` - Batch with shape (n_samples, n_features)
    ///
    /// # Returns
    ///
    /// - `Ok(Array1<usize>)` - One label per input row, in input order
    /// - `Err(ModelError::ShapeMismatch)` - If the number of columns does not match the fitted model
    fn predict(&self, data: ArrayView2<f64>) -> Result<Array1<usize>, ModelError>;

    /// Returns the number of clusters the assigner can emit.
    fn n_clusters(&self) -> usize;

    /// Returns the number of columns expected in `data`.
    fn n_features(&self) -> usize;
}
