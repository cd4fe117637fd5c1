use super::PipelineConfig;
use crate::ModelError;
use crate::dataset::{ColumnData, TelemetryTable};
use crate::report::{
    EnergyReport, cluster_sizes, energy_by_cluster, energy_by_split, split_proportions,
};
use ndarray::Array1;
use std::sync::Arc;

/// A telemetry table joined with one cluster label per row.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTable {
    table: Arc<TelemetryTable>,
    labels: Array1<usize>,
    feature_columns: Vec<String>,
}

impl LabeledTable {
    /// Joins `labels` to `table`.
    ///
    /// # Returns
    ///
    /// - `Ok(LabeledTable)` - The labelled table
    /// - `Err(ModelError::InputValidationError)` - If there is not exactly one label per row
    pub fn new(
        table: Arc<TelemetryTable>,
        labels: Array1<usize>,
        feature_columns: Vec<String>,
    ) -> Result<Self, ModelError> {
        if labels.len() != table.n_rows() {
            return Err(ModelError::InputValidationError(format!(
                "{} labels for a table of {} rows",
                labels.len(),
                table.n_rows()
            )));
        }
        Ok(LabeledTable {
            table,
            labels,
            feature_columns,
        })
    }

    pub fn table(&self) -> &TelemetryTable {
        &self.table
    }

    pub fn labels(&self) -> &Array1<usize> {
        &self.labels
    }

    /// Columns the labels were computed from, in model order
    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn n_rows(&self) -> usize {
        self.labels.len()
    }

    /// Indices of the rows assigned to `cluster`
    pub fn rows_in_cluster(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, label)| **label == cluster)
            .map(|(row, _)| row)
            .collect()
    }

    /// Number of rows per cluster, ordered by label
    pub fn cluster_sizes(&self) -> Vec<(usize, usize)> {
        cluster_sizes(self.labels.view())
    }

    /// Values of a column as group keys. Numbers are formatted with `Display`.
    pub fn group_keys(&self, column: &str) -> Option<Vec<String>> {
        self.table.column(column).map(|c| match &c.data {
            ColumnData::Text(values) => values.clone(),
            ColumnData::Numeric(values) => values.iter().map(|v| v.to_string()).collect(),
        })
    }

    /// Builds the energy report from the columns named in `config`.
    ///
    /// # Returns
    ///
    /// - `Ok(EnergyReport)` - Energy sections are `None` when the energy column is absent,
    ///   split sections are `None` when the split column is absent
    /// - `Err(ModelError::InputValidationError)` - If the energy column exists but is not numeric
    pub fn energy_report(&self, config: &PipelineConfig) -> Result<EnergyReport, ModelError> {
        let energy = match self.table.column(&config.energy_column) {
            None => None,
            Some(_) => Some(self.table.numeric_column(&config.energy_column).ok_or_else(|| {
                ModelError::InputValidationError(format!(
                    "column '{}' is not numeric",
                    config.energy_column
                ))
            })?),
        };
        let splits = self.group_keys(&config.split_column);

        let by_cluster = match energy {
            Some(energy) => Some(energy_by_cluster(self.labels.view(), energy)?),
            None => None,
        };
        let by_split = match (&splits, energy) {
            (Some(splits), Some(energy)) => Some(energy_by_split(splits, energy)?),
            _ => None,
        };
        let split_proportions = match &splits {
            Some(splits) => Some(split_proportions(self.labels.view(), splits)?),
            None => None,
        };

        Ok(EnergyReport {
            cluster_sizes: self.cluster_sizes(),
            by_cluster,
            by_split,
            split_proportions,
        })
    }
}
