use crate::error::{ModelError, Result};
use crate::Matrix;

/// Builds a sample matrix from jagged rows, one sample per row.
///
/// Every sample must have the same length; the matrix is rectangular by
/// construction, so this is where inconsistent sample lengths surface.
pub fn from_samples(samples: &[Vec<f64>]) -> Result<Matrix> {
    if samples.is_empty() {
        return Err(ModelError::InvalidParameter(
            "at least one sample is required".to_string(),
        ));
    }

    let n_features = samples[0].len();
    if n_features == 0 {
        return Err(ModelError::InvalidParameter(
            "samples must have at least one feature".to_string(),
        ));
    }

    for sample in samples {
        if sample.len() != n_features {
            return Err(ModelError::DimensionMismatch {
                expected: n_features,
                got: sample.len(),
            });
        }
    }

    let mut matrix = Matrix::zeros((samples.len(), n_features));
    for (i, sample) in samples.iter().enumerate() {
        for (j, &value) in sample.iter().enumerate() {
            matrix[[i, j]] = value;
        }
    }

    Ok(matrix)
}

/// Inverse of [`from_samples`]: plain rows back out of a matrix.
pub fn to_samples(x: &Matrix) -> Vec<Vec<f64>> {
    x.outer_iter().map(|row| row.to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_samples() {
        let samples = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let matrix = from_samples(&samples).unwrap();

        assert_eq!(matrix.shape(), &[3, 2]);
        assert_eq!(matrix[[1, 0]], 3.0);
        assert_eq!(matrix[[2, 1]], 6.0);
    }

    #[test]
    fn test_round_trip() {
        let samples = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let matrix = from_samples(&samples).unwrap();
        assert_eq!(to_samples(&matrix), samples);
    }

    #[test]
    fn test_empty_input() {
        assert!(from_samples(&[]).is_err());
    }

    #[test]
    fn test_inconsistent_lengths() {
        let samples = vec![vec![1.0, 2.0], vec![3.0]];
        match from_samples(&samples) {
            Err(ModelError::DimensionMismatch { expected, got }) => {
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_features() {
        let samples = vec![vec![], vec![]];
        assert!(from_samples(&samples).is_err());
    }
}
