use thiserror::Error;

/// Coarse classification of a [`FunctionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Malformed construction input or an illegal step.
    Validation,
    /// Index out of range, or x below the left bound where extrapolation is not allowed.
    Bounds,
    /// Interpolation invoked outside its resolved bracket.
    InterpolationRange,
    /// Binary arithmetic between functions with different grids.
    Consistency,
    /// Malformed or truncated serialized input.
    Format,
}

#[derive(Debug, Error)]
pub enum FunctionError {
    #[error("at least 2 points are required, got {count}")]
    TooFewPoints { count: usize },

    #[error("x and y arrays differ in length ({x_len} vs {y_len})")]
    LengthMismatch { x_len: usize, y_len: usize },

    #[error("x values are not strictly increasing at index {index}")]
    NotStrictlyIncreasing { index: usize },

    #[error("step must be finite and positive, got {0}")]
    InvalidStep(f64),

    #[error("sample count must be at least 2, got {0}")]
    InvalidCount(usize),

    #[error("sampling interval [{from}, {to}] must have finite bounds")]
    InvalidInterval { from: f64, to: f64 },

    #[error("x must not be NaN")]
    NanX,

    #[error("cannot remove a point: function would keep fewer than 2 of its {count} points")]
    MinimumPointCount { count: usize },

    #[error("index {index} is out of bounds for {count} points")]
    IndexOutOfBounds { index: usize, count: usize },

    #[error("x = {x} lies below the left bound {left_bound}")]
    BelowLeftBound { x: f64, left_bound: f64 },

    #[error("x = {x} is outside the interpolation interval [{left_x}, {right_x}]")]
    InterpolationRange { x: f64, left_x: f64, right_x: f64 },

    #[error("functions have different point counts ({left} vs {right})")]
    InconsistentCount { left: usize, right: usize },

    #[error("functions differ in x at index {index} ({left_x} vs {right_x})")]
    InconsistentX { index: usize, left_x: f64, right_x: f64 },

    #[error("malformed input: {0}")]
    Format(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl FunctionError {
    pub fn kind(&self) -> FaultKind {
        match self {
            FunctionError::TooFewPoints { .. }
            | FunctionError::LengthMismatch { .. }
            | FunctionError::NotStrictlyIncreasing { .. }
            | FunctionError::InvalidStep(_)
            | FunctionError::InvalidCount(_)
            | FunctionError::InvalidInterval { .. }
            | FunctionError::NanX
            | FunctionError::MinimumPointCount { .. } => FaultKind::Validation,
            FunctionError::IndexOutOfBounds { .. }
            | FunctionError::BelowLeftBound { .. } => FaultKind::Bounds,
            FunctionError::InterpolationRange { .. } => FaultKind::InterpolationRange,
            FunctionError::InconsistentCount { .. }
            | FunctionError::InconsistentX { .. } => FaultKind::Consistency,
            FunctionError::Format(_)
            | FunctionError::Io(_)
            | FunctionError::Json(_) => FaultKind::Format,
        }
    }

    pub fn format(message: impl Into<String>) -> FunctionError {
        FunctionError::Format(message.into())
    }
}

pub type FunctionResult<T> = Result<T, FunctionError>;

/// Checks the construction invariants shared by every sampled storage:
/// equal lengths, at least 2 points, strictly increasing x.
///
/// A grid whose x values are all equal is the degenerate table sampled over
/// a zero-width interval and is accepted as well.
pub fn validate_samples(x_values: &[f64], y_values: &[f64]) -> FunctionResult<()> {
    if x_values.len() != y_values.len() {
        return Err(FunctionError::LengthMismatch {
            x_len: x_values.len(),
            y_len: y_values.len(),
        });
    }
    if x_values.len() < 2 {
        return Err(FunctionError::TooFewPoints { count: x_values.len() });
    }
    if is_degenerate_grid(x_values) {
        return Ok(());
    }
    match x_values.windows(2).position(|w| !(w[0] < w[1])) {
        Some(i) => Err(FunctionError::NotStrictlyIncreasing { index: i + 1 }),
        None => Ok(()),
    }
}

fn is_degenerate_grid(x_values: &[f64]) -> bool {
    match x_values.split_first() {
        Some((&first, rest)) => first.is_finite() && rest.iter().all(|&x| x == first),
        None => false,
    }
}

pub fn check_index(index: usize, count: usize) -> FunctionResult<()> {
    if index < count {
        Ok(())
    } else {
        Err(FunctionError::IndexOutOfBounds { index, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_rejects_short_mismatched_and_unsorted_input() {
        assert!(matches!(
            validate_samples(&[1.0], &[1.0]),
            Err(FunctionError::TooFewPoints { count: 1 })
        ));
        assert!(matches!(
            validate_samples(&[1.0, 2.0], &[1.0]),
            Err(FunctionError::LengthMismatch { x_len: 2, y_len: 1 })
        ));
        assert!(matches!(
            validate_samples(&[1.0, 3.0, 3.0], &[0.0; 3]),
            Err(FunctionError::NotStrictlyIncreasing { index: 2 })
        ));
        assert!(validate_samples(&[1.0, 2.0, 3.0], &[0.0; 3]).is_ok());
    }

    #[test]
    fn all_equal_grid_is_a_degenerate_table() {
        assert!(validate_samples(&[2.0, 2.0, 2.0], &[4.0; 3]).is_ok());
        assert!(matches!(
            validate_samples(&[2.0, 2.0, 3.0], &[0.0; 3]),
            Err(FunctionError::NotStrictlyIncreasing { index: 1 })
        ));
        assert!(validate_samples(&[f64::NAN, f64::NAN], &[0.0; 2]).is_err());
    }

    #[test]
    fn nan_x_is_not_sorted() {
        let err = validate_samples(&[0.0, f64::NAN], &[0.0, 0.0]).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Validation);
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(FunctionError::InvalidStep(0.0).kind(), FaultKind::Validation);
        assert_eq!(FunctionError::IndexOutOfBounds { index: 3, count: 2 }.kind(), FaultKind::Bounds);
        assert_eq!(
            FunctionError::InconsistentCount { left: 2, right: 3 }.kind(),
            FaultKind::Consistency
        );
        assert_eq!(FunctionError::format("bad").kind(), FaultKind::Format);
        let message = FunctionError::IndexOutOfBounds { index: 3, count: 2 }.to_string();
        assert!(message.contains("index 3"));
    }
}
