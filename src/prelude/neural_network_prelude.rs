pub use crate::neural_network::layer::Dense;
pub use crate::neural_network::{
    Activation, Batch, ForwardEvaluator, SerializableArray, WeightStack, forward_pass,
    load_weight_arrays, load_weight_stack, save_weight_stack,
};
