/// Telemetry tables loaded from CSV
pub mod telemetry;

pub use telemetry::*;
