use crate::error::{ModelError, Result};
use crate::{Matrix, Vector};
use ndarray::ArrayView1;

/// Mean-Shift mode seeking.
///
/// Every sample climbs toward the weighted mean of its neighborhood
/// until the shift falls below `tolerance`; converged points within
/// `bandwidth` of each other collapse into one mode. The number of
/// clusters is discovered, not configured. Modes are registered in
/// sample order, so labels are deterministic without any rng.
#[derive(Clone, Debug)]
pub struct MeanShift {
    pub modes: Option<Matrix>,
    pub labels: Option<Vec<usize>>,
    pub converged: Option<bool>,
    bandwidth: f64,
    kernel: String,
    max_iter: usize,
    tolerance: f64,
}

impl MeanShift {
    pub fn new(bandwidth: f64) -> Self {
        if bandwidth <= 0.0 {
            panic!("bandwidth must be > 0, got {}", bandwidth);
        }

        Self {
            modes: None,
            labels: None,
            converged: None,
            bandwidth,
            kernel: "gaussian".to_string(),
            max_iter: 300,
            tolerance: 1e-3,
        }
    }

    pub fn kernel(mut self, kernel: &str) -> Self {
        match kernel {
            "gaussian" | "flat" => {
                self.kernel = kernel.to_string();
            }
            _ => panic!("Invalid kernel: {}. Must be 'gaussian' or 'flat'", kernel),
        }
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn fit(&mut self, x: &Matrix) -> Result<()> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ModelError::InvalidParameter(
                "input matrix must have at least one sample and one feature".to_string(),
            ));
        }

        if self.tolerance < 0.0 {
            return Err(ModelError::InvalidParameter(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }

        let n = x.nrows();
        let mut climbed = Matrix::zeros((n, x.ncols()));
        let mut all_converged = true;

        for i in 0..n {
            let mut point = x.row(i).to_owned();
            let mut settled = false;

            for _ in 0..self.max_iter {
                let shifted = self.shift_point(&point.view(), x);
                let moved = euclidean(&point.view(), &shifted.view());
                point = shifted;

                if moved <= self.tolerance {
                    settled = true;
                    break;
                }
            }

            if !settled {
                all_converged = false;
            }
            climbed.row_mut(i).assign(&point);
        }

        // Converged points within one bandwidth of an existing mode join
        // it; scanning in sample order keeps mode ids deterministic
        let mut modes: Vec<Vector> = Vec::new();
        let mut labels = vec![0usize; n];

        for i in 0..n {
            let point = climbed.row(i);
            let found = modes
                .iter()
                .position(|mode| euclidean(&point, &mode.view()) < self.bandwidth);

            labels[i] = match found {
                Some(mode_idx) => mode_idx,
                None => {
                    modes.push(point.to_owned());
                    modes.len() - 1
                }
            };
        }

        let mut mode_matrix = Matrix::zeros((modes.len(), x.ncols()));
        for (i, mode) in modes.iter().enumerate() {
            mode_matrix.row_mut(i).assign(mode);
        }

        self.modes = Some(mode_matrix);
        self.labels = Some(labels);
        self.converged = Some(all_converged);

        Ok(())
    }

    pub fn fit_predict(&mut self, x: &Matrix) -> Result<Vec<usize>> {
        self.fit(x)?;
        Ok(self.labels.clone().unwrap_or_default())
    }

    /// Assigns new samples to the nearest discovered mode.
    pub fn predict(&self, x: &Matrix) -> Result<Vec<usize>> {
        let modes = self
            .modes
            .as_ref()
            .ok_or(ModelError::NotFitted("MeanShift"))?;

        if x.ncols() != modes.ncols() {
            return Err(ModelError::DimensionMismatch {
                expected: modes.ncols(),
                got: x.ncols(),
            });
        }

        let mut labels = vec![0usize; x.nrows()];
        for i in 0..x.nrows() {
            let mut min_distance = f64::INFINITY;
            for m in 0..modes.nrows() {
                let distance = euclidean(&x.row(i), &modes.row(m));
                if distance < min_distance {
                    min_distance = distance;
                    labels[i] = m;
                }
            }
        }

        Ok(labels)
    }

    pub fn n_modes(&self) -> Option<usize> {
        self.modes.as_ref().map(|modes| modes.nrows())
    }

    fn shift_point(&self, point: &ArrayView1<f64>, x: &Matrix) -> Vector {
        let mut numerator = Vector::zeros(x.ncols());
        let mut denominator = 0.0;

        match self.kernel.as_str() {
            "gaussian" => {
                for i in 0..x.nrows() {
                    let d = euclidean(point, &x.row(i));
                    let weight = (-0.5 * (d / self.bandwidth).powi(2)).exp();
                    numerator.scaled_add(weight, &x.row(i));
                    denominator += weight;
                }
            }
            "flat" => {
                for i in 0..x.nrows() {
                    if euclidean(point, &x.row(i)) <= self.bandwidth {
                        numerator += &x.row(i);
                        denominator += 1.0;
                    }
                }
            }
            _ => unreachable!(), // Validated in the kernel setter
        }

        // The point itself always contributes, so the denominator is
        // nonzero for both kernels
        numerator / denominator
    }
}

fn euclidean(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
