/// Module that contains the per-layer activation tags
pub mod activation;
/// Module that contains the forward evaluator replaying a weight stack over a batch
pub mod forward_evaluator;
/// Module that contains the inference-only dense layer
pub mod layer;
/// Module that contains reading and writing of sequentially keyed weight containers
pub mod serialize_weight;
/// Module that contains the validated weight stack
pub mod weight_stack;

pub use activation::*;
pub use forward_evaluator::*;
pub use layer::*;
pub use serialize_weight::*;
pub use weight_stack::*;

use crate::ModelError;
use ndarray::Array2;

/// Type alias for the 2-D batches flowing between layers, one sample per row
pub type Batch = Array2<f64>;

pub use crate::traits::LatentEncoder;
