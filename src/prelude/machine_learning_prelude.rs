pub use crate::machine_learning::kmeans::KMeans;
