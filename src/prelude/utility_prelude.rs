pub use crate::utility::standard_scaler::StandardScaler;
