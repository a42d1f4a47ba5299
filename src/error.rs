use thiserror::Error;

/// Errors reported by estimators and converters in this crate.
///
/// All validation happens eagerly, before any iteration loop starts.
/// Hitting the iteration cap without converging is not an error; the
/// estimators report it through their `converged` field instead.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A parameter or input is outside its admissible range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two inputs that must agree on a dimension do not.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A result was requested from a model that has not been fitted.
    #[error("{0} has not been fitted; call fit() first")]
    NotFitted(&'static str),
}

pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ModelError::InvalidParameter("n_clusters must be >= 1".to_string());
        assert_eq!(err.to_string(), "invalid parameter: n_clusters must be >= 1");

        let err = ModelError::DimensionMismatch { expected: 3, got: 2 };
        assert_eq!(err.to_string(), "dimension mismatch: expected 3, got 2");

        let err = ModelError::NotFitted("KMeans");
        assert_eq!(err.to_string(), "KMeans has not been fitted; call fit() first");
    }
}
