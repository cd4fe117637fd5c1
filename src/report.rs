//! Aggregates over labelled telemetry: energy per cluster, energy per split type
//! and the split-type mix of each cluster.
//!
//! Every function takes parallel per-row inputs (labels, energy values, split names)
//! and returns groups ordered by key. Inputs of different lengths are rejected with
//! `ModelError::InputValidationError`.

use crate::ModelError;
use ahash::AHashMap;
use ndarray::{Array2, ArrayView1};
use std::hash::Hash;

/// Energy totals of one cluster.
///
/// # Fields
///
/// - `cluster` - Cluster label
/// - `rows` - Rows assigned to the cluster
/// - `count` - Rows with a finite energy value; NaN and infinite values are skipped
/// - `total` - Sum of the finite energy values
/// - `mean` - `total / count`, `None` when `count` is 0
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterEnergy {
    pub cluster: usize,
    pub rows: usize,
    pub count: usize,
    pub total: f64,
    pub mean: Option<f64>,
}

/// Energy totals of one split type. Same fields as [`ClusterEnergy`], keyed by split name.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitEnergy {
    pub split: String,
    pub rows: usize,
    pub count: usize,
    pub total: f64,
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct EnergySum {
    rows: usize,
    count: usize,
    total: f64,
}

impl EnergySum {
    fn push(&mut self, value: f64) {
        self.rows += 1;
        if value.is_finite() {
            self.count += 1;
            self.total += value;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }
}

fn check_lengths(what: &str, left: usize, right: usize) -> Result<(), ModelError> {
    if left != right {
        return Err(ModelError::InputValidationError(format!(
            "{}: inputs have {} and {} rows",
            what, left, right
        )));
    }
    Ok(())
}

fn sum_by_key<K, I>(keys: I, energy: &[f64]) -> Vec<(K, EnergySum)>
where
    K: Hash + Eq + Ord,
    I: IntoIterator<Item = K>,
{
    let mut groups: AHashMap<K, EnergySum> = AHashMap::new();
    for (key, &value) in keys.into_iter().zip(energy) {
        groups.entry(key).or_default().push(value);
    }

    let mut groups: Vec<(K, EnergySum)> = groups.into_iter().collect();
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    groups
}

/// Sums energy per cluster.
///
/// # Parameters
///
/// - `labels` - Cluster label of each row
/// - `energy` - Energy per unit of each row
///
/// # Returns
///
/// - `Ok(Vec<ClusterEnergy>)` - One entry per cluster present in `labels`, ordered by label
/// - `Err(ModelError::InputValidationError)` - If the inputs differ in length
///
/// # Example
/// ```rust
/// use deepcluster::report::energy_by_cluster;
/// use ndarray::array;
///
/// let labels = array![1, 0, 1, 1];
/// let groups = energy_by_cluster(labels.view(), &[2.0, 5.0, 4.0, f64::NAN]).unwrap();
///
/// assert_eq!(groups[0].cluster, 0);
/// assert_eq!(groups[1].rows, 3);
/// assert_eq!(groups[1].count, 2);
/// assert_eq!(groups[1].mean, Some(3.0));
/// ```
pub fn energy_by_cluster(
    labels: ArrayView1<usize>,
    energy: &[f64],
) -> Result<Vec<ClusterEnergy>, ModelError> {
    check_lengths("energy by cluster", labels.len(), energy.len())?;

    Ok(sum_by_key(labels.iter().copied(), energy)
        .into_iter()
        .map(|(cluster, sum)| ClusterEnergy {
            cluster,
            rows: sum.rows,
            count: sum.count,
            total: sum.total,
            mean: sum.mean(),
        })
        .collect())
}

/// Sums energy per split type.
///
/// # Returns
///
/// - `Ok(Vec<SplitEnergy>)` - One entry per distinct split name, ordered by name
/// - `Err(ModelError::InputValidationError)` - If the inputs differ in length
pub fn energy_by_split(splits: &[String], energy: &[f64]) -> Result<Vec<SplitEnergy>, ModelError> {
    check_lengths("energy by split", splits.len(), energy.len())?;

    Ok(sum_by_key(splits.iter().map(String::as_str), energy)
        .into_iter()
        .map(|(split, sum)| SplitEnergy {
            split: split.to_string(),
            rows: sum.rows,
            count: sum.count,
            total: sum.total,
            mean: sum.mean(),
        })
        .collect())
}

/// Number of rows per cluster, ordered by label
pub fn cluster_sizes(labels: ArrayView1<usize>) -> Vec<(usize, usize)> {
    let mut sizes: AHashMap<usize, usize> = AHashMap::new();
    for &label in labels.iter() {
        *sizes.entry(label).or_insert(0) += 1;
    }

    let mut sizes: Vec<(usize, usize)> = sizes.into_iter().collect();
    sizes.sort_unstable();
    sizes
}

/// Split-type mix of every cluster.
///
/// Row `i` belongs to `clusters[i]`, column `j` to `splits[j]`. Each row of
/// `proportions` sums to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ProportionTable {
    pub clusters: Vec<usize>,
    pub splits: Vec<String>,
    pub counts: Array2<usize>,
    pub proportions: Array2<f64>,
}

impl ProportionTable {
    /// Share of `split` within `cluster`, `None` if either is unknown
    pub fn proportion(&self, cluster: usize, split: &str) -> Option<f64> {
        let row = self.clusters.binary_search(&cluster).ok()?;
        let col = self
            .splits
            .binary_search_by(|s| s.as_str().cmp(split))
            .ok()?;
        Some(self.proportions[[row, col]])
    }

    /// Number of rows of `cluster` with split type `split`, `None` if either is unknown
    pub fn count(&self, cluster: usize, split: &str) -> Option<usize> {
        let row = self.clusters.binary_search(&cluster).ok()?;
        let col = self
            .splits
            .binary_search_by(|s| s.as_str().cmp(split))
            .ok()?;
        Some(self.counts[[row, col]])
    }
}

/// Computes the share of each split type within each cluster.
///
/// # Parameters
///
/// - `labels` - Cluster label of each row
/// - `splits` - Split type of each row
///
/// # Returns
///
/// - `Ok(ProportionTable)` - Clusters and splits ordered by key; empty when there are no rows
/// - `Err(ModelError::InputValidationError)` - If the inputs differ in length
pub fn split_proportions(
    labels: ArrayView1<usize>,
    splits: &[String],
) -> Result<ProportionTable, ModelError> {
    check_lengths("split proportions", labels.len(), splits.len())?;

    let clusters: Vec<usize> = cluster_sizes(labels).into_iter().map(|(c, _)| c).collect();
    let mut split_names: Vec<String> = splits.to_vec();
    split_names.sort_unstable();
    split_names.dedup();

    let cluster_index: AHashMap<usize, usize> =
        clusters.iter().enumerate().map(|(i, &c)| (c, i)).collect();
    let split_index: AHashMap<&str, usize> = split_names
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();

    let mut counts = Array2::<usize>::zeros((clusters.len(), split_names.len()));
    for (label, split) in labels.iter().zip(splits) {
        counts[[cluster_index[label], split_index[split.as_str()]]] += 1;
    }

    let mut proportions = counts.mapv(|c| c as f64);
    for mut row in proportions.rows_mut() {
        let total = row.sum();
        // every listed cluster has at least one row
        row /= total;
    }

    Ok(ProportionTable {
        clusters,
        splits: split_names,
        counts,
        proportions,
    })
}

/// Everything reported for a labelled table.
///
/// Sections whose source column is absent from the table are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyReport {
    pub cluster_sizes: Vec<(usize, usize)>,
    pub by_cluster: Option<Vec<ClusterEnergy>>,
    pub by_split: Option<Vec<SplitEnergy>>,
    pub split_proportions: Option<ProportionTable>,
}
