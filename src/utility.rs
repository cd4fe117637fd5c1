/// Standard (z-score) feature scaler
pub mod standard_scaler;

pub use standard_scaler::*;
