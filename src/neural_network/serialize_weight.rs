use super::*;
use crate::error::IoError;
use crate::{Deserialize, Serialize};
use log::info;
use ndarray::{Array1, ArrayD, Ix2};
use serde_json::{from_reader, to_writer_pretty};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Key prefix of the entries in a weight container (`weight_0`, `weight_1`, ...)
pub const WEIGHT_KEY_PREFIX: &str = "weight_";

/// One raw array stored in a weight container.
///
/// # Variants
///
/// - `Matrix` - A 2-D weight matrix stored as nested rows
/// - `Vector` - A 1-D bias vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializableArray {
    Matrix(Vec<Vec<f64>>),
    Vector(Vec<f64>),
}

impl SerializableArray {
    /// Converts the stored values into an n-dimensional array without any transposition.
    ///
    /// # Returns
    ///
    /// - `Ok(ArrayD<f64>)` - 2-D for `Matrix`, 1-D for `Vector`
    /// - `Err(ModelError::InputValidationError)` - If the rows of a matrix have different lengths
    pub fn to_array(&self) -> Result<ArrayD<f64>, ModelError> {
        match self {
            SerializableArray::Matrix(rows) => Ok(vec2_to_array2(rows)?.into_dyn()),
            SerializableArray::Vector(values) => Ok(Array1::from_vec(values.clone()).into_dyn()),
        }
    }

    /// Converts an array back into its stored form.
    ///
    /// # Returns
    ///
    /// - `Ok(SerializableArray)` - The stored form
    /// - `Err(ModelError::ConfigurationError)` - If the array is neither 1-D nor 2-D
    /// - `Err(ModelError::InputValidationError)` - If a value is NaN or infinite, which JSON cannot hold
    pub fn from_array(array: &ArrayD<f64>) -> Result<Self, ModelError> {
        if let Some(position) = array.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::InputValidationError(format!(
                "cannot store NaN or infinite value at flat position {}",
                position
            )));
        }

        match array.ndim() {
            1 => Ok(SerializableArray::Vector(array.iter().copied().collect())),
            2 => {
                let matrix = array
                    .view()
                    .into_dimensionality::<Ix2>()
                    .map_err(|e| ModelError::ProcessingError(e.to_string()))?;
                Ok(SerializableArray::Matrix(
                    matrix.outer_iter().map(|row| row.to_vec()).collect(),
                ))
            }
            n => Err(ModelError::ConfigurationError(format!(
                "only 1-D and 2-D arrays can be stored, got {} dimensions",
                n
            ))),
        }
    }
}

fn vec2_to_array2(rows: &[Vec<f64>]) -> Result<Array2<f64>, ModelError> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if let Some(i) = rows.iter().position(|row| row.len() != n_cols) {
        return Err(ModelError::InputValidationError(format!(
            "matrix row {} has {} values, expected {}",
            i,
            rows[i].len(),
            n_cols
        )));
    }

    let flat: Vec<f64> = rows.iter().flat_map(|row| row.iter().copied()).collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| ModelError::ProcessingError(e.to_string()))
}

/// Orders the entries of a weight container by the numeric suffix of their keys.
///
/// `weight_10` sorts after `weight_9`. The suffixes must be exactly `0..N` with no
/// gaps or duplicates, and every key must carry the [`WEIGHT_KEY_PREFIX`].
///
/// # Parameters
///
/// * `entries` - `(key, array)` pairs in any order
///
/// # Returns
///
/// - `Ok(Vec<ArrayD<f64>>)` - Arrays in training-time order
/// - `Err(ModelError::ConfigurationError)` - On a foreign key, a gap or a duplicate index
/// - `Err(ModelError::InputValidationError)` - If a stored matrix is ragged
pub fn ordered_weight_arrays<I>(entries: I) -> Result<Vec<ArrayD<f64>>, ModelError>
where
    I: IntoIterator<Item = (String, SerializableArray)>,
{
    let mut indexed = Vec::new();
    for (key, array) in entries {
        let index = key
            .strip_prefix(WEIGHT_KEY_PREFIX)
            .and_then(|suffix| suffix.parse::<usize>().ok())
            .ok_or_else(|| {
                ModelError::ConfigurationError(format!(
                    "unexpected key '{}' in weight container, expected '{}<index>'",
                    key, WEIGHT_KEY_PREFIX
                ))
            })?;
        indexed.push((index, array));
    }

    indexed.sort_by_key(|(index, _)| *index);

    let mut arrays = Vec::with_capacity(indexed.len());
    for (position, (index, array)) in indexed.iter().enumerate() {
        if *index < position {
            return Err(ModelError::ConfigurationError(format!(
                "duplicate entry for {}{}",
                WEIGHT_KEY_PREFIX, index
            )));
        }
        if *index > position {
            return Err(ModelError::ConfigurationError(format!(
                "missing entry {}{}",
                WEIGHT_KEY_PREFIX, position
            )));
        }
        arrays.push(array.to_array()?);
    }

    Ok(arrays)
}

/// Reads the raw arrays of a weight container in training-time order.
///
/// The container is a JSON object mapping `weight_<i>` to a nested numeric array.
///
/// # Parameters
///
/// * `path` - Path of the container
///
/// # Returns
///
/// - `Ok(Vec<ArrayD<f64>>)` - Arrays ordered by key index
/// - `Err(IoError::StdIoError)` - File not found or read operation failed
/// - `Err(IoError::JsonError)` - The file is not a JSON object of numeric arrays
/// - `Err(IoError::Model)` - The keys or the arrays are malformed
pub fn load_weight_arrays(path: &Path) -> Result<Vec<ArrayD<f64>>, IoError> {
    let reader = IoError::load_in_buf_reader(path)?;
    let container: BTreeMap<String, SerializableArray> = from_reader(reader)?;
    let arrays = ordered_weight_arrays(container)?;

    info!("loaded {} weight arrays from {}", arrays.len(), path.display());
    Ok(arrays)
}

/// Reads a weight container and validates it into a [`WeightStack`].
///
/// # Parameters
///
/// * `path` - Path of the container
///
/// # Returns
///
/// - `Ok(WeightStack)` - The validated stack with the default activation schedule
/// - `Err(IoError)` - On IO, JSON or shape errors
pub fn load_weight_stack(path: &Path) -> Result<WeightStack, IoError> {
    let arrays = load_weight_arrays(path)?;
    Ok(WeightStack::from_arrays(arrays)?)
}

/// Writes a weight stack as a container readable by [`load_weight_stack`].
///
/// The activation schedule is not part of the container.
///
/// # Parameters
///
/// - `stack` - Stack to write
/// - `path` - Destination, created or overwritten
///
/// # Returns
///
/// - `Ok(())` - The file has been written and flushed
/// - `Err(IoError::StdIoError)` - File creation or write operation failed
/// - `Err(IoError::JsonError)` - Serialization to JSON failed
/// - `Err(IoError::Model)` - A weight or bias holds a NaN or infinite value; nothing is written
pub fn save_weight_stack(stack: &WeightStack, path: &Path) -> Result<(), IoError> {
    let mut container = BTreeMap::new();
    for (i, array) in stack.to_arrays().iter().enumerate() {
        container.insert(
            format!("{}{}", WEIGHT_KEY_PREFIX, i),
            SerializableArray::from_array(array)?,
        );
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    to_writer_pretty(&mut writer, &container)?;
    writer.flush()?;

    Ok(())
}
