/// Dense (fully connected) inference layer
pub mod dense;

pub use dense::*;
