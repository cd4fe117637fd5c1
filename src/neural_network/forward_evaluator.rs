use super::*;
use log::debug;
use ndarray::{ArrayD, ArrayView2};

/// Replays the encode path of a trained feedforward network from its weight stack.
///
/// For every layer `i` in `0..L` the evaluator computes `current = current . W_i + b_i`
/// and then applies the layer's activation. With the default schedule every hidden
/// layer uses ReLU and the final layer is linear, so the latent space is not clipped
/// to non-negative values.
///
/// The evaluator owns an immutable [`WeightStack`] and never mutates it or the input
/// batch, so a single instance can be shared across threads.
///
/// # Example
/// ```rust
/// use deepcluster::neural_network::{ForwardEvaluator, WeightStack};
/// use ndarray::array;
///
/// let stack = WeightStack::from_arrays(vec![
///     array![[1.0, 0.0], [0.0, 1.0]].into_dyn(),
///     array![0.0, 0.0].into_dyn(),
///     array![[2.0], [2.0]].into_dyn(),
///     array![-1.0].into_dyn(),
/// ])
/// .unwrap();
/// let evaluator = ForwardEvaluator::new(stack);
///
/// let latent = evaluator.encode(array![[1.0, 2.0], [-1.0, -1.0]].view()).unwrap();
/// assert_eq!(latent, array![[5.0], [-1.0]]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardEvaluator {
    stack: WeightStack,
}

impl ForwardEvaluator {
    /// Creates an evaluator over a validated weight stack
    pub fn new(stack: WeightStack) -> Self {
        ForwardEvaluator { stack }
    }

    /// Validates a raw alternating weight/bias list and creates an evaluator over it.
    ///
    /// # Parameters
    ///
    /// * `arrays` - `[W_0, b_0, W_1, b_1, ...]`
    ///
    /// # Returns
    ///
    /// - `Ok(ForwardEvaluator)` - The evaluator, with the default activation schedule
    /// - `Err(ModelError)` - See [`WeightStack::from_arrays`]
    pub fn from_arrays(arrays: Vec<ArrayD<f64>>) -> Result<Self, ModelError> {
        Ok(Self::new(WeightStack::from_arrays(arrays)?))
    }

    /// Replaces the activation schedule of the underlying stack.
    ///
    /// # Returns
    ///
    /// - `Ok(ForwardEvaluator)` - The evaluator with the new schedule
    /// - `Err(ModelError::ConfigurationError)` - If `schedule` does not have one entry per layer
    pub fn with_activations(self, schedule: &[Activation]) -> Result<Self, ModelError> {
        Ok(Self::new(self.stack.with_activations(schedule)?))
    }

    /// Returns the weight stack being replayed
    pub fn stack(&self) -> &WeightStack {
        &self.stack
    }

    /// Returns the expected width of input batches
    pub fn input_dim(&self) -> usize {
        self.stack.input_dim()
    }

    /// Returns the width of the latent batches produced
    pub fn output_dim(&self) -> usize {
        self.stack.output_dim()
    }

    /// Returns the number of layers
    pub fn n_layers(&self) -> usize {
        self.stack.n_layers()
    }

    /// Returns the total number of parameters
    pub fn param_count(&self) -> usize {
        self.stack.param_count()
    }

    fn check_input(&self, x: &ArrayView2<f64>) -> Result<(), ModelError> {
        let expected = self.stack.input_dim();
        if x.ncols() != expected {
            return Err(ModelError::ShapeMismatch {
                layer: 0,
                expected,
                actual: x.ncols(),
            });
        }
        Ok(())
    }

    /// Computes the latent encoding of a standardized batch.
    ///
    /// # Parameters
    ///
    /// * `x` - Input batch with shape (n_samples, input_dim). May have zero rows
    ///
    /// # Returns
    ///
    /// - `Ok(Array2<f64>)` - Latent batch with shape (n_samples, output_dim), row `r` encoding input row `r`
    /// - `Err(ModelError::ShapeMismatch)` - If `x` does not have `input_dim` columns (reported as layer 0)
    ///
    /// NaN and infinite inputs are not rejected; they propagate through the arithmetic.
    pub fn encode(&self, x: ArrayView2<f64>) -> Result<Batch, ModelError> {
        self.check_input(&x)?;

        let mut layers = self.stack.layers().iter().enumerate();
        let Some((_, first)) = layers.next() else {
            return Err(ModelError::ConfigurationError(
                "weight stack is empty".to_string(),
            ));
        };

        let mut current = first.forward_at(0, x)?;
        for (i, layer) in layers {
            current = layer.forward_at(i, current.view())?;
        }

        debug!(
            "encoded batch of {} rows: {} -> {} over {} layers",
            x.nrows(),
            self.stack.input_dim(),
            self.stack.output_dim(),
            self.stack.n_layers()
        );

        Ok(current)
    }

    /// Runs the batch through every layer and keeps each layer's post-activation output.
    ///
    /// The last entry equals the result of [`ForwardEvaluator::encode`].
    ///
    /// # Parameters
    ///
    /// * `x` - Input batch with shape (n_samples, input_dim)
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Array2<f64>>)` - `L` batches, entry `i` being the output of layer `i`
    /// - `Err(ModelError::ShapeMismatch)` - If `x` does not have `input_dim` columns
    pub fn forward_trace(&self, x: ArrayView2<f64>) -> Result<Vec<Batch>, ModelError> {
        self.check_input(&x)?;

        let mut outputs: Vec<Batch> = Vec::with_capacity(self.stack.n_layers());
        for (i, layer) in self.stack.layers().iter().enumerate() {
            let next = match outputs.last() {
                Some(previous) => layer.forward_at(i, previous.view())?,
                None => layer.forward_at(i, x.view())?,
            };
            outputs.push(next);
        }

        Ok(outputs)
    }

    /// Renders a table of the layers, their output shapes, activations and parameter counts.
    pub fn summary(&self) -> String {
        let col1_width = 24;
        let col2_width = 16;
        let col3_width = 12;
        let col4_width = 12;

        let mut out = String::new();
        out.push_str("Model: \"encoder\"\n");
        out.push_str(&format!(
            "┏{}┳{}┳{}┳{}┓\n",
            "━".repeat(col1_width),
            "━".repeat(col2_width),
            "━".repeat(col3_width),
            "━".repeat(col4_width)
        ));
        out.push_str(&format!(
            "┃ {:<22} ┃ {:<14} ┃ {:<10} ┃ {:>10} ┃\n",
            "Layer (type)", "Output Shape", "Activation", "Param #"
        ));
        out.push_str(&format!(
            "┡{}╇{}╇{}╇{}┩\n",
            "━".repeat(col1_width),
            "━".repeat(col2_width),
            "━".repeat(col3_width),
            "━".repeat(col4_width)
        ));

        for (i, layer) in self.stack.layers().iter().enumerate() {
            out.push_str(&format!(
                "│ {:<22} │ {:<14} │ {:<10} │ {:>10} │\n",
                format!("dense_{} (Dense)", i),
                format!("(None, {})", layer.output_dim()),
                layer.activation().to_string(),
                layer.param_count()
            ));
        }

        out.push_str(&format!(
            "└{}┴{}┴{}┴{}┘\n",
            "─".repeat(col1_width),
            "─".repeat(col2_width),
            "─".repeat(col3_width),
            "─".repeat(col4_width)
        ));
        // f64 parameters, 8 bytes each
        out.push_str(&format!(
            " Total params: {} ({} B)\n",
            self.param_count(),
            self.param_count() * 8
        ));
        out
    }
}

impl LatentEncoder for ForwardEvaluator {
    fn encode(&self, x: ArrayView2<f64>) -> Result<Batch, ModelError> {
        ForwardEvaluator::encode(self, x)
    }

    fn input_dim(&self) -> usize {
        self.stack.input_dim()
    }

    fn output_dim(&self) -> usize {
        self.stack.output_dim()
    }
}

/// Evaluates a raw weight list over a batch in one call.
///
/// Equivalent to `ForwardEvaluator::from_arrays(weights.to_vec())?.encode(x)`; prefer
/// building a [`ForwardEvaluator`] once when the same weights serve many batches.
///
/// # Parameters
///
/// - `weights` - `[W_0, b_0, W_1, b_1, ...]`, `2 * L` arrays
/// - `x` - Standardized input batch with shape (n_samples, input_dim)
///
/// # Returns
///
/// - `Ok(Array2<f64>)` - Latent batch with shape (n_samples, output_dim)
/// - `Err(ModelError::ConfigurationError)` - If the weight list is empty, odd, or has entries of the wrong rank
/// - `Err(ModelError::ShapeMismatch)` - If any layer's dimensions, or the input width, do not line up
pub fn forward_pass(weights: &[ArrayD<f64>], x: ArrayView2<f64>) -> Result<Batch, ModelError> {
    ForwardEvaluator::from_arrays(weights.to_vec())?.encode(x)
}
