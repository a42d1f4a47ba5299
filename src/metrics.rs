use crate::error::{ModelError, Result};
use ndarray::Array2;

pub fn accuracy_score(y_true: &[usize], y_pred: &[usize]) -> Result<f64> {
    if y_true.len() != y_pred.len() {
        return Err(ModelError::InvalidParameter(
            "y_true and y_pred must have the same length".to_string(),
        ));
    }

    if y_true.is_empty() {
        return Err(ModelError::InvalidParameter(
            "y_true must not be empty".to_string(),
        ));
    }

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();

    Ok(correct as f64 / y_true.len() as f64)
}

/// Confusion matrix with actual classes on rows and predicted classes on
/// columns: `m[[t, p]]` counts samples of class `t` predicted as `p`.
pub fn confusion_matrix(
    y_true: &[usize],
    y_pred: &[usize],
    n_classes: usize,
) -> Result<Array2<usize>> {
    if y_true.len() != y_pred.len() {
        return Err(ModelError::InvalidParameter(
            "y_true and y_pred must have the same length".to_string(),
        ));
    }

    if n_classes == 0 {
        return Err(ModelError::InvalidParameter(
            "n_classes must be >= 1".to_string(),
        ));
    }

    let mut matrix = Array2::zeros((n_classes, n_classes));
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        if t >= n_classes || p >= n_classes {
            return Err(ModelError::InvalidParameter(format!(
                "label {} is out of range for {} classes",
                t.max(p),
                n_classes
            )));
        }
        matrix[[t, p]] += 1;
    }

    Ok(matrix)
}
