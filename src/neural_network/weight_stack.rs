use super::*;
use ndarray::{Array1, ArrayD, Ix1, Ix2};

/// An ordered, validated sequence of dense layers.
///
/// Built once from the raw arrays of a trained network, in training-time order:
/// `[W_0, b_0, W_1, b_1, ...]`. All shape invariants are checked at construction,
/// so evaluation never has to re-check them:
///
/// - the raw list is non-empty and has an even number of entries
/// - every `W_i` is 2-D, every `b_i` is 1-D with `len(b_i) == cols(W_i)`
/// - `cols(W_i) == rows(W_{i+1})` for every pair of consecutive layers
///
/// The stack is immutable once built.
///
/// # Example
/// ```rust
/// use deepcluster::neural_network::{Activation, WeightStack};
/// use ndarray::array;
///
/// let stack = WeightStack::from_arrays(vec![
///     array![[1.0, 0.0], [0.0, 1.0]].into_dyn(),
///     array![0.0, 0.0].into_dyn(),
///     array![[2.0], [2.0]].into_dyn(),
///     array![-1.0].into_dyn(),
/// ])
/// .unwrap();
///
/// assert_eq!(stack.n_layers(), 2);
/// assert_eq!(stack.input_dim(), 2);
/// assert_eq!(stack.output_dim(), 1);
/// assert_eq!(stack.activations(), vec![Activation::ReLU, Activation::Linear]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeightStack {
    layers: Vec<Dense>,
}

impl WeightStack {
    /// Builds a stack from the flat list produced by a weight loader.
    ///
    /// # Parameters
    ///
    /// * `arrays` - Alternating weight matrices and bias vectors, `2 * L` entries for `L` layers
    ///
    /// # Returns
    ///
    /// - `Ok(WeightStack)` - The validated stack with the default activation schedule
    /// - `Err(ModelError::ConfigurationError)` - If the list is empty, has an odd length, or an entry has the wrong rank
    /// - `Err(ModelError::ShapeMismatch)` - If a bias length or a layer input dimension does not line up
    pub fn from_arrays(arrays: Vec<ArrayD<f64>>) -> Result<Self, ModelError> {
        if arrays.is_empty() {
            return Err(ModelError::ConfigurationError(
                "weight stack is empty".to_string(),
            ));
        }

        if arrays.len() % 2 != 0 {
            return Err(ModelError::ConfigurationError(format!(
                "weight stack has {} arrays, every weight matrix needs a paired bias vector",
                arrays.len()
            )));
        }

        let mut pairs = Vec::with_capacity(arrays.len() / 2);
        let mut entries = arrays.into_iter();

        while let (Some(weight), Some(bias)) = (entries.next(), entries.next()) {
            let layer = pairs.len();

            if weight.ndim() != 2 {
                return Err(ModelError::ConfigurationError(format!(
                    "entry {} (layer {} weights) must be a 2-D matrix, got {} dimensions",
                    2 * layer,
                    layer,
                    weight.ndim()
                )));
            }
            if bias.ndim() != 1 {
                return Err(ModelError::ConfigurationError(format!(
                    "entry {} (layer {} bias) must be a 1-D vector, got {} dimensions",
                    2 * layer + 1,
                    layer,
                    bias.ndim()
                )));
            }

            let weight = weight
                .into_dimensionality::<Ix2>()
                .map_err(|e| ModelError::ProcessingError(e.to_string()))?;
            let bias: Array1<f64> = bias
                .into_dimensionality::<Ix1>()
                .map_err(|e| ModelError::ProcessingError(e.to_string()))?;

            pairs.push((weight, bias));
        }

        Self::from_layers(pairs)
    }

    /// Builds a stack from typed `(weights, bias)` pairs.
    ///
    /// # Parameters
    ///
    /// * `pairs` - One `(W_i, b_i)` pair per layer, in evaluation order
    ///
    /// # Returns
    ///
    /// - `Ok(WeightStack)` - The validated stack with the default activation schedule
    /// - `Err(ModelError::ConfigurationError)` - If `pairs` is empty or a matrix is degenerate
    /// - `Err(ModelError::ShapeMismatch)` - If a bias length or a layer input dimension does not line up
    pub fn from_layers(pairs: Vec<(Array2<f64>, Array1<f64>)>) -> Result<Self, ModelError> {
        if pairs.is_empty() {
            return Err(ModelError::ConfigurationError(
                "weight stack is empty".to_string(),
            ));
        }

        let schedule = Activation::default_schedule(pairs.len());
        let mut layers: Vec<Dense> = Vec::with_capacity(pairs.len());

        for (i, ((weight, bias), activation)) in pairs.into_iter().zip(schedule).enumerate() {
            if let Some(previous) = layers.last() {
                if weight.nrows() != previous.output_dim() {
                    return Err(ModelError::ShapeMismatch {
                        layer: i,
                        expected: previous.output_dim(),
                        actual: weight.nrows(),
                    });
                }
            }

            layers.push(Dense::for_layer(i, weight, bias, activation)?);
        }

        Ok(WeightStack { layers })
    }

    /// Replaces the activation schedule, one tag per layer.
    ///
    /// # Parameters
    ///
    /// * `schedule` - Activation tags in layer order
    ///
    /// # Returns
    ///
    /// - `Ok(WeightStack)` - The stack with the new schedule
    /// - `Err(ModelError::ConfigurationError)` - If `schedule.len()` differs from the layer count
    pub fn with_activations(mut self, schedule: &[Activation]) -> Result<Self, ModelError> {
        if schedule.len() != self.layers.len() {
            return Err(ModelError::ConfigurationError(format!(
                "activation schedule has {} entries for {} layers",
                schedule.len(),
                self.layers.len()
            )));
        }

        for (layer, &activation) in self.layers.iter_mut().zip(schedule) {
            layer.set_activation(activation);
        }

        Ok(self)
    }

    /// Returns the layers in evaluation order
    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    /// Returns the number of layers `L`
    pub fn n_layers(&self) -> usize {
        self.layers.len()
    }

    /// Returns the input dimension of the first layer
    pub fn input_dim(&self) -> usize {
        self.layers.first().map_or(0, Dense::input_dim)
    }

    /// Returns the output dimension of the last layer
    pub fn output_dim(&self) -> usize {
        self.layers.last().map_or(0, Dense::output_dim)
    }

    /// Returns the activation schedule in layer order
    pub fn activations(&self) -> Vec<Activation> {
        self.layers.iter().map(Dense::activation).collect()
    }

    /// Returns the total number of parameters across all layers
    pub fn param_count(&self) -> usize {
        self.layers.iter().map(Dense::param_count).sum()
    }

    /// Flattens the stack back into the alternating `[W_0, b_0, W_1, b_1, ...]` list.
    pub fn to_arrays(&self) -> Vec<ArrayD<f64>> {
        self.layers
            .iter()
            .flat_map(|layer| {
                [
                    layer.weights().clone().into_dyn(),
                    layer.bias().clone().into_dyn(),
                ]
            })
            .collect()
    }
}
