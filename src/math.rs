use ndarray::{ArrayBase, Data, Ix1};

/// Calculates the squared Euclidean distance between two vectors.
///
/// # Parameters
///
/// - `x1` - First vector
/// - `x2` - Second vector
///
/// # Returns
///
/// - `f64` - Squared Euclidean distance between the two vectors
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use deepcluster::math::squared_euclidean_distance_row;
///
/// let v1 = array![1.0, 2.0, 3.0];
/// let v2 = array![4.0, 5.0, 6.0];
/// let dist = squared_euclidean_distance_row(&v1, &v2);
/// // (4-1)^2 + (5-2)^2 + (6-3)^2 = 9 + 9 + 9 = 27
/// assert!((dist - 27.0).abs() < 1e-10);
/// ```
#[inline]
pub fn squared_euclidean_distance_row<S1, S2>(
    x1: &ArrayBase<S1, Ix1>,
    x2: &ArrayBase<S2, Ix1>,
) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    x1.iter()
        .zip(x2.iter())
        .map(|(a, b)| {
            let d = a - b;
            d * d
        })
        .sum()
}

/// Calculates the mean and the population variance of a sequence of values.
///
/// Returns `(0.0, 0.0)` for an empty sequence.
///
/// # Parameters
///
/// * `values` - Values to summarise
///
/// # Returns
///
/// * `(f64, f64)` - Mean and population variance (divided by `n`, not `n - 1`)
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use deepcluster::math::mean_and_variance;
///
/// let (mean, var) = mean_and_variance(&array![1.0, 2.0, 3.0, 4.0]);
/// assert!((mean - 2.5).abs() < 1e-12);
/// assert!((var - 1.25).abs() < 1e-12);
/// ```
pub fn mean_and_variance<S>(values: &ArrayBase<S, Ix1>) -> (f64, f64)
where
    S: Data<Elem = f64>,
{
    let n = values.len();
    if n == 0 {
        return (0.0, 0.0);
    }

    let mean = values.sum() / n as f64;
    let variance = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n as f64;

    (mean, variance)
}
