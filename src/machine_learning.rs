/// This module provides helper functions for fitted models
mod helper_function;
/// K-means cluster assignment over trained centroids
pub mod kmeans;

pub use kmeans::*;

pub(crate) use helper_function::{check_finite, check_width};
