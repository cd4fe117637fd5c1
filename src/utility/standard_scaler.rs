use crate::error::{IoError, ModelError};
use crate::machine_learning::{check_finite, check_width};
use crate::math::mean_and_variance;
use crate::traits::FeatureScaler;
use crate::{Deserialize, Serialize};
use log::info;
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Axis, Data, Ix2};
use rayon::prelude::*;
use serde_json::{from_reader, to_writer_pretty};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column-wise z-score scaler: `(x - mean) / scale`.
///
/// `scale` is the population standard deviation of each feature, as computed at fit
/// time. A feature with zero variance gets a scale of `1.0`, so it is only centered.
///
/// # Fields
///
/// - `mean` - Per-feature mean
/// - `scale` - Per-feature standard deviation, strictly positive
///
/// # Examples
/// ```rust
/// use deepcluster::utility::StandardScaler;
/// use ndarray::array;
///
/// let data = array![[1.0, 10.0], [3.0, 10.0]];
/// let scaler = StandardScaler::fit(&data).unwrap();
///
/// assert_eq!(scaler.get_mean(), &array![2.0, 10.0]);
/// assert_eq!(scaler.get_scale(), &array![1.0, 1.0]);
///
/// let scaled = scaler.transform(&data).unwrap();
/// assert_eq!(scaled, array![[-1.0, 0.0], [1.0, 0.0]]);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Creates a scaler from stored statistics.
    ///
    /// # Parameters
    ///
    /// - `mean` - Per-feature mean
    /// - `scale` - Per-feature scale
    ///
    /// # Returns
    ///
    /// - `Ok(StandardScaler)` - The scaler
    /// - `Err(ModelError::ConfigurationError)` - If the vectors are empty, differ in length,
    ///   or a value is not finite, or a scale is not strictly positive
    pub fn new(mean: Array1<f64>, scale: Array1<f64>) -> Result<Self, ModelError> {
        let scaler = StandardScaler { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.mean.is_empty() {
            return Err(ModelError::ConfigurationError(
                "scaler has no features".to_string(),
            ));
        }

        if self.mean.len() != self.scale.len() {
            return Err(ModelError::ConfigurationError(format!(
                "scaler has {} means but {} scales",
                self.mean.len(),
                self.scale.len()
            )));
        }

        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err(ModelError::ConfigurationError(
                "scaler means must be finite".to_string(),
            ));
        }

        if let Some(i) = self.scale.iter().position(|&s| !(s.is_finite() && s > 0.0)) {
            return Err(ModelError::ConfigurationError(format!(
                "scale of feature {} must be positive and finite, got {}",
                i, self.scale[i]
            )));
        }

        Ok(())
    }

    /// Computes per-feature mean and population standard deviation.
    ///
    /// # Parameters
    ///
    /// * `data` - Training data with shape (n_samples, n_features)
    ///
    /// # Returns
    ///
    /// - `Ok(StandardScaler)` - The fitted scaler
    /// - `Err(ModelError::InputValidationError)` - If the data is empty or contains NaN or infinite values
    pub fn fit<S>(data: &ArrayBase<S, Ix2>) -> Result<Self, ModelError>
    where
        S: Data<Elem = f64>,
    {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(ModelError::InputValidationError(
                "Cannot fit a scaler on an empty dataset".to_string(),
            ));
        }
        check_finite(data, "input data")?;

        let stats: Vec<(f64, f64)> = data
            .axis_iter(Axis(1))
            .into_par_iter()
            .map(|column| {
                let (mean, variance) = mean_and_variance(&column);
                let std_dev = variance.sqrt();
                (mean, if std_dev > 0.0 { std_dev } else { 1.0 })
            })
            .collect();

        let (mean, scale): (Vec<f64>, Vec<f64>) = stats.into_iter().unzip();
        Self::new(Array1::from(mean), Array1::from(scale))
    }

    /// Returns the per-feature mean
    pub fn get_mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Returns the per-feature scale
    pub fn get_scale(&self) -> &Array1<f64> {
        &self.scale
    }

    /// Returns the number of features the scaler was fitted on
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardizes a raw feature matrix.
    ///
    /// NaN and infinite values are not rejected; they propagate into the result.
    ///
    /// # Parameters
    ///
    /// * `raw` - Raw features with shape (n_samples, n_features). May have zero rows
    ///
    /// # Returns
    ///
    /// - `Ok(Array2<f64>)` - Standardized features, same shape as `raw`
    /// - `Err(ModelError::ShapeMismatch)` - If the column count differs from the fitted feature count
    pub fn transform<S>(&self, raw: &ArrayBase<S, Ix2>) -> Result<Array2<f64>, ModelError>
    where
        S: Data<Elem = f64>,
    {
        check_width(raw, self.n_features())?;
        Ok((raw - &self.mean) / &self.scale)
    }

    /// Maps standardized features back to the raw feature space.
    ///
    /// # Returns
    ///
    /// - `Ok(Array2<f64>)` - `scaled * scale + mean`
    /// - `Err(ModelError::ShapeMismatch)` - If the column count differs from the fitted feature count
    pub fn inverse_transform<S>(&self, scaled: &ArrayBase<S, Ix2>) -> Result<Array2<f64>, ModelError>
    where
        S: Data<Elem = f64>,
    {
        check_width(scaled, self.n_features())?;
        Ok(scaled * &self.scale + &self.mean)
    }

    /// Loads a scaler written by [`StandardScaler::save_to_path`].
    ///
    /// # Returns
    ///
    /// - `Ok(StandardScaler)` - The validated scaler
    /// - `Err(IoError::StdIoError)` - File not found or read operation failed
    /// - `Err(IoError::JsonError)` - Deserialization from JSON failed
    /// - `Err(IoError::Model)` - The stored statistics are invalid
    pub fn load_from_path(path: &Path) -> Result<Self, IoError> {
        let reader = IoError::load_in_buf_reader(path)?;
        let scaler: StandardScaler = from_reader(reader)?;
        scaler.validate()?;

        info!(
            "loaded scaler over {} features from {}",
            scaler.n_features(),
            path.display()
        );
        Ok(scaler)
    }

    /// Writes the scaler as JSON.
    pub fn save_to_path(&self, path: &Path) -> Result<(), IoError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, raw: ArrayView2<f64>) -> Result<Array2<f64>, ModelError> {
        StandardScaler::transform(self, &raw)
    }

    fn n_features(&self) -> usize {
        self.mean.len()
    }
}
