use crate::error::{ModelError, Result};
use crate::{Matrix, Vector};
use ndarray::ArrayView1;

/// Gaussian Naive Bayes classifier.
///
/// One normal distribution is estimated per class and feature; prediction
/// picks the class with the highest joint log-likelihood (log prior plus
/// the sum of per-feature log densities). Ties resolve to the lowest
/// class identifier. Class identifiers are `0..n_classes`, inferred from
/// the largest value in `y`.
#[derive(Clone, Debug)]
pub struct GaussianNaiveBayes {
    pub class_priors: Option<Vector>,
    pub means: Option<Matrix>,
    pub variances: Option<Matrix>,
    var_smoothing: f64,
}

impl GaussianNaiveBayes {
    pub fn new() -> Self {
        Self {
            class_priors: None,
            means: None,
            variances: None,
            var_smoothing: 1e-9,
        }
    }

    /// Additive term on every estimated variance, keeping densities
    /// finite for constant features.
    pub fn var_smoothing(mut self, var_smoothing: f64) -> Self {
        if var_smoothing < 0.0 {
            panic!("var_smoothing must be non-negative, got {}", var_smoothing);
        }
        self.var_smoothing = var_smoothing;
        self
    }

    pub fn fit(&mut self, x: &Matrix, y: &[usize]) -> Result<()> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ModelError::InvalidParameter(
                "input matrix must have at least one sample and one feature".to_string(),
            ));
        }

        if y.len() != x.nrows() {
            return Err(ModelError::InvalidParameter(format!(
                "number of samples in x ({}) and y ({}) must match",
                x.nrows(),
                y.len()
            )));
        }

        let n_classes = y.iter().max().map(|&c| c + 1).unwrap_or(0);
        let n_features = x.ncols();

        let mut counts = vec![0usize; n_classes];
        for &class in y {
            counts[class] += 1;
        }
        for (class, &count) in counts.iter().enumerate() {
            if count == 0 {
                return Err(ModelError::InvalidParameter(format!(
                    "class {} has no samples",
                    class
                )));
            }
        }

        let mut means = Matrix::zeros((n_classes, n_features));
        for (i, &class) in y.iter().enumerate() {
            for j in 0..n_features {
                means[[class, j]] += x[[i, j]];
            }
        }
        for class in 0..n_classes {
            for j in 0..n_features {
                means[[class, j]] /= counts[class] as f64;
            }
        }

        let mut variances = Matrix::zeros((n_classes, n_features));
        for (i, &class) in y.iter().enumerate() {
            for j in 0..n_features {
                let diff = x[[i, j]] - means[[class, j]];
                variances[[class, j]] += diff * diff;
            }
        }
        for class in 0..n_classes {
            for j in 0..n_features {
                variances[[class, j]] =
                    variances[[class, j]] / counts[class] as f64 + self.var_smoothing;
            }
        }

        let mut priors = Vector::zeros(n_classes);
        for (class, &count) in counts.iter().enumerate() {
            priors[class] = count as f64 / y.len() as f64;
        }

        self.class_priors = Some(priors);
        self.means = Some(means);
        self.variances = Some(variances);

        Ok(())
    }

    pub fn predict(&self, x: &Matrix) -> Result<Vec<usize>> {
        let (priors, means, variances) = self.fitted()?;

        if x.ncols() != means.ncols() {
            return Err(ModelError::DimensionMismatch {
                expected: means.ncols(),
                got: x.ncols(),
            });
        }

        let mut labels = vec![0usize; x.nrows()];
        for i in 0..x.nrows() {
            let scores = joint_log_likelihood(&x.row(i), priors, means, variances);
            let mut best_score = f64::NEG_INFINITY;
            for (class, &score) in scores.iter().enumerate() {
                if score > best_score {
                    best_score = score;
                    labels[i] = class;
                }
            }
        }

        Ok(labels)
    }

    /// Per-class posterior probabilities, one row per sample, rows sum
    /// to one.
    pub fn predict_proba(&self, x: &Matrix) -> Result<Matrix> {
        let (priors, means, variances) = self.fitted()?;

        if x.ncols() != means.ncols() {
            return Err(ModelError::DimensionMismatch {
                expected: means.ncols(),
                got: x.ncols(),
            });
        }

        let n_classes = means.nrows();
        let mut proba = Matrix::zeros((x.nrows(), n_classes));

        for i in 0..x.nrows() {
            let scores = joint_log_likelihood(&x.row(i), priors, means, variances);

            // Normalize in log space to keep the exponentials finite
            let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let mut total = 0.0;
            for (class, &score) in scores.iter().enumerate() {
                let p = (score - max_score).exp();
                proba[[i, class]] = p;
                total += p;
            }
            for class in 0..n_classes {
                proba[[i, class]] /= total;
            }
        }

        Ok(proba)
    }

    /// Fraction of correctly classified samples.
    pub fn score(&self, x: &Matrix, y: &[usize]) -> Result<f64> {
        let predicted = self.predict(x)?;
        crate::metrics::accuracy_score(y, &predicted)
    }

    fn fitted(&self) -> Result<(&Vector, &Matrix, &Matrix)> {
        let priors = self
            .class_priors
            .as_ref()
            .ok_or(ModelError::NotFitted("GaussianNaiveBayes"))?;
        let means = self
            .means
            .as_ref()
            .ok_or(ModelError::NotFitted("GaussianNaiveBayes"))?;
        let variances = self
            .variances
            .as_ref()
            .ok_or(ModelError::NotFitted("GaussianNaiveBayes"))?;
        Ok((priors, means, variances))
    }
}

impl Default for GaussianNaiveBayes {
    fn default() -> Self {
        Self::new()
    }
}

fn joint_log_likelihood(
    sample: &ArrayView1<f64>,
    priors: &Vector,
    means: &Matrix,
    variances: &Matrix,
) -> Vec<f64> {
    let n_classes = means.nrows();
    let mut scores = vec![0.0; n_classes];

    for (class, score) in scores.iter_mut().enumerate() {
        *score = priors[class].ln();
        for (j, &value) in sample.iter().enumerate() {
            let mean = means[[class, j]];
            let variance = variances[[class, j]];
            *score += -0.5 * (2.0 * std::f64::consts::PI * variance).ln()
                - (value - mean) * (value - mean) / (2.0 * variance);
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn separable_data() -> (Matrix, Vec<usize>) {
        let x = array![
            [1.0, 1.0],
            [1.2, 0.9],
            [0.8, 1.1],
            [1.1, 1.0],
            [8.0, 8.0],
            [8.2, 7.9],
            [7.8, 8.1],
            [8.1, 8.0]
        ];
        let y = vec![0, 0, 0, 0, 1, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_fit_predict_separable() {
        let (x, y) = separable_data();

        let mut bayes = GaussianNaiveBayes::new();
        bayes.fit(&x, &y).unwrap();

        assert_eq!(bayes.predict(&x).unwrap(), y);
        assert_abs_diff_eq!(bayes.score(&x, &y).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_estimated_parameters() {
        let (x, y) = separable_data();

        let mut bayes = GaussianNaiveBayes::new();
        bayes.fit(&x, &y).unwrap();

        let priors = bayes.class_priors.as_ref().unwrap();
        assert_abs_diff_eq!(priors[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(priors[1], 0.5, epsilon = 1e-12);

        let means = bayes.means.as_ref().unwrap();
        assert_abs_diff_eq!(means[[0, 0]], 1.025, epsilon = 1e-12);
        assert_abs_diff_eq!(means[[1, 0]], 8.025, epsilon = 1e-12);
    }

    #[test]
    fn test_predict_proba_rows_sum_to_one() {
        let (x, y) = separable_data();

        let mut bayes = GaussianNaiveBayes::new();
        bayes.fit(&x, &y).unwrap();

        let proba = bayes.predict_proba(&x).unwrap();
        assert_eq!(proba.shape(), &[8, 2]);
        for row in proba.outer_iter() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-9);
        }

        // Confident on clearly separated samples
        assert!(proba[[0, 0]] > 0.99);
        assert!(proba[[4, 1]] > 0.99);
    }

    #[test]
    fn test_constant_feature_survives_smoothing() {
        let x = array![[1.0, 5.0], [1.2, 5.0], [8.0, 5.0], [8.2, 5.0]];
        let y = vec![0, 0, 1, 1];

        let mut bayes = GaussianNaiveBayes::new();
        bayes.fit(&x, &y).unwrap();

        let labels = bayes.predict(&x).unwrap();
        assert_eq!(labels, y);
        for &v in bayes.variances.as_ref().unwrap().iter() {
            assert!(v > 0.0);
        }
    }

    #[test]
    fn test_unpopulated_class_is_rejected() {
        let x = array![[1.0, 1.0], [8.0, 8.0]];
        let y = vec![0, 2]; // class 1 never appears

        let mut bayes = GaussianNaiveBayes::new();
        assert!(matches!(
            bayes.fit(&x, &y),
            Err(ModelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let x = array![[1.0, 1.0], [8.0, 8.0]];
        let y = vec![0];

        let mut bayes = GaussianNaiveBayes::new();
        assert!(matches!(
            bayes.fit(&x, &y),
            Err(ModelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_predict_without_fit() {
        let x = array![[1.0, 1.0]];
        let bayes = GaussianNaiveBayes::new();
        assert!(matches!(bayes.predict(&x), Err(ModelError::NotFitted(_))));
    }

    #[test]
    fn test_predict_dimension_mismatch() {
        let (x, y) = separable_data();

        let mut bayes = GaussianNaiveBayes::new();
        bayes.fit(&x, &y).unwrap();

        let x_bad = array![[1.0], [2.0]];
        assert!(matches!(
            bayes.predict(&x_bad),
            Err(ModelError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_negative_smoothing_panics() {
        std::panic::catch_unwind(|| {
            let _ = GaussianNaiveBayes::new().var_smoothing(-1.0);
        })
        .expect_err("Should panic on negative var_smoothing");
    }
}
