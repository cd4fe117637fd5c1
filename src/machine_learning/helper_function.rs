use crate::error::ModelError;
use ndarray::{ArrayBase, Data, Ix2};

/// Checks that every value of a matrix is finite.
///
/// # Parameters
///
/// - `x` - Matrix to check
/// - `what` - Name used in the error message
///
/// # Returns
///
/// - `Ok(())` - If no value is NaN or infinite
/// - `Err(ModelError::InputValidationError)` - With the position of the first offending value
pub fn check_finite<S>(x: &ArrayBase<S, Ix2>, what: &str) -> Result<(), ModelError>
where
    S: Data<Elem = f64>,
{
    if let Some(((i, j), _)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(ModelError::InputValidationError(format!(
            "{} contains NaN or infinite value at position [{}][{}]",
            what, i, j
        )));
    }
    Ok(())
}

/// Checks that a batch has the number of columns a fitted model expects.
///
/// The mismatch is reported as a `ShapeMismatch` at layer 0, the only stage of a
/// single-stage model.
pub fn check_width<S>(x: &ArrayBase<S, Ix2>, expected: usize) -> Result<(), ModelError>
where
    S: Data<Elem = f64>,
{
    if x.ncols() != expected {
        return Err(ModelError::ShapeMismatch {
            layer: 0,
            expected,
            actual: x.ncols(),
        });
    }
    Ok(())
}
