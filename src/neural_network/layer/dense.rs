use crate::ModelError;
use crate::neural_network::Activation;
use ndarray::{Array1, Array2, ArrayView2};

/// Dense (Fully Connected) inference layer.
///
/// The layer performs the affine transformation `output = activation(input . weights + bias)`
/// with the bias broadcast across rows. Weights are taken as trained, there is no
/// initialization, gradient or optimizer state.
///
/// # Dimensions
///
/// - Input shape: (batch_size, input_dim)
/// - Output shape: (batch_size, output_dim)
///
/// # Fields
///
/// - `weights` - Weight matrix with shape (input_dim, output_dim)
/// - `bias` - Bias vector with length output_dim
/// - `activation` - Activation applied after the affine step
///
/// # Example
/// ```rust
/// use deepcluster::neural_network::{Activation, Dense};
/// use ndarray::array;
///
/// let layer = Dense::new(array![[1.0, -1.0], [0.5, 2.0]], array![0.0, -1.0], Activation::ReLU).unwrap();
/// let out = layer.forward(array![[2.0, 1.0]].view()).unwrap();
/// assert_eq!(out, array![[2.5, 0.0]]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dense {
    weights: Array2<f64>,
    bias: Array1<f64>,
    activation: Activation,
}

impl Dense {
    /// Creates a dense layer from trained parameters.
    ///
    /// # Parameters
    ///
    /// - `weights` - Weight matrix with shape (input_dim, output_dim)
    /// - `bias` - Bias vector with length output_dim
    /// - `activation` - Activation applied after the affine step
    ///
    /// # Returns
    ///
    /// - `Ok(Dense)` - The layer
    /// - `Err(ModelError::ShapeMismatch)` - If the bias length differs from the weight matrix's column count (reported as layer 0)
    /// - `Err(ModelError::ConfigurationError)` - If either dimension of the weight matrix is zero
    pub fn new(
        weights: Array2<f64>,
        bias: Array1<f64>,
        activation: Activation,
    ) -> Result<Self, ModelError> {
        Self::for_layer(0, weights, bias, activation)
    }

    /// Same as [`Dense::new`], reporting errors against layer index `layer`.
    pub(crate) fn for_layer(
        layer: usize,
        weights: Array2<f64>,
        bias: Array1<f64>,
        activation: Activation,
    ) -> Result<Self, ModelError> {
        let (input_dim, output_dim) = weights.dim();

        if input_dim == 0 || output_dim == 0 {
            return Err(ModelError::ConfigurationError(format!(
                "layer {} has a degenerate weight matrix of shape ({}, {})",
                layer, input_dim, output_dim
            )));
        }

        if bias.len() != output_dim {
            return Err(ModelError::ShapeMismatch {
                layer,
                expected: output_dim,
                actual: bias.len(),
            });
        }

        Ok(Dense {
            weights,
            bias,
            activation,
        })
    }

    /// Returns the input dimension of the layer
    pub fn input_dim(&self) -> usize {
        self.weights.nrows()
    }

    /// Returns the output dimension of the layer
    pub fn output_dim(&self) -> usize {
        self.weights.ncols()
    }

    /// Returns a reference to the weight matrix, shape (input_dim, output_dim)
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Returns a reference to the bias vector
    pub fn bias(&self) -> &Array1<f64> {
        &self.bias
    }

    /// Returns the activation applied after the affine step
    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub(crate) fn set_activation(&mut self, activation: Activation) {
        self.activation = activation;
    }

    /// Parameter count = number of weight parameters + number of bias parameters
    pub fn param_count(&self) -> usize {
        self.weights.len() + self.bias.len()
    }

    /// Runs the layer over a batch.
    ///
    /// The result is always a newly allocated buffer, the input is never written to.
    ///
    /// # Parameters
    ///
    /// * `input` - Batch with shape (batch_size, input_dim)
    ///
    /// # Returns
    ///
    /// - `Ok(Array2<f64>)` - Batch with shape (batch_size, output_dim)
    /// - `Err(ModelError::ShapeMismatch)` - If `input` does not have `input_dim` columns (reported as layer 0)
    pub fn forward(&self, input: ArrayView2<f64>) -> Result<Array2<f64>, ModelError> {
        self.forward_at(0, input)
    }

    /// Same as [`Dense::forward`], reporting a width mismatch against layer index `layer`.
    pub(crate) fn forward_at(
        &self,
        layer: usize,
        input: ArrayView2<f64>,
    ) -> Result<Array2<f64>, ModelError> {
        if input.ncols() != self.input_dim() {
            return Err(ModelError::ShapeMismatch {
                layer,
                expected: self.input_dim(),
                actual: input.ncols(),
            });
        }

        let z = input.dot(&self.weights) + &self.bias;
        Ok(self.activation.apply(z))
    }
}
