use crate::{Deserialize, Serialize};
use ndarray::Array2;

/// Threshold for parallel computation (in number of elements).
/// Smaller batches are mapped sequentially since the rayon overhead dominates.
const ACTIVATION_PARALLEL_THRESHOLD: usize = 10_000;

/// Activation applied after the affine step of a layer.
///
/// # Variants
///
/// - `Linear` - Identity, the raw affine result is passed on unchanged
/// - `ReLU` - Rectified linear unit, `max(0, x)`
/// - `Sigmoid` - Logistic function, `1 / (1 + e^-x)`
/// - `Tanh` - Hyperbolic tangent
///
/// NaN values are never clamped: every variant maps NaN to NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    ReLU,
    Sigmoid,
    Tanh,
}

impl Activation {
    /// Applies the activation elementwise, consuming the affine output.
    ///
    /// The buffer passed in is the freshly allocated result of the affine step,
    /// so it is mapped in place and returned.
    ///
    /// # Parameters
    ///
    /// * `z` - Affine output of a layer with shape (batch_size, output_dim)
    ///
    /// # Returns
    ///
    /// * `Array2<f64>` - The activated batch, same shape as `z`
    pub fn apply(&self, mut z: Array2<f64>) -> Array2<f64> {
        let f: fn(f64) -> f64 = match self {
            Activation::Linear => return z,
            Activation::ReLU => relu,
            Activation::Sigmoid => sigmoid,
            Activation::Tanh => f64::tanh,
        };

        if z.len() >= ACTIVATION_PARALLEL_THRESHOLD {
            z.par_mapv_inplace(f);
        } else {
            z.mapv_inplace(f);
        }
        z
    }

    /// Builds the default schedule for a stack of `n_layers` layers:
    /// `ReLU` on every hidden layer and `Linear` on the final (bottleneck) layer.
    ///
    /// # Parameters
    ///
    /// * `n_layers` - Number of layers in the stack
    ///
    /// # Returns
    ///
    /// * `Vec<Activation>` - One tag per layer, empty when `n_layers` is 0
    pub fn default_schedule(n_layers: usize) -> Vec<Activation> {
        (0..n_layers)
            .map(|i| {
                if i + 1 == n_layers {
                    Activation::Linear
                } else {
                    Activation::ReLU
                }
            })
            .collect()
    }
}

impl std::fmt::Display for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Activation::Linear => "linear",
            Activation::ReLU => "relu",
            Activation::Sigmoid => "sigmoid",
            Activation::Tanh => "tanh",
        };
        write!(f, "{}", name)
    }
}

// `x < 0.0` is false for NaN, so NaN passes through
fn relu(x: f64) -> f64 {
    if x < 0.0 { 0.0 } else { x }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
