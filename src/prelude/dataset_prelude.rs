pub use crate::dataset::telemetry::{Column, ColumnData, TelemetryTable};
pub use crate::pipeline::{
    ArtifactCache, ClusteringPipeline, LabeledTable, PipelineConfig, PipelineLoader,
};
pub use crate::report::{
    ClusterEnergy, EnergyReport, ProportionTable, SplitEnergy, energy_by_cluster,
    energy_by_split, split_proportions,
};
