use crate::error::{ModelError, Result};
use crate::metric::{DistanceMetric, SquaredEuclidean};
use crate::Matrix;
use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lloyd's K-Means over row-major sample matrices.
///
/// The estimator owns its working centroid matrix exclusively for the
/// duration of a `fit` call and replaces it each iteration, so no state
/// is shared across calls. Labels are cluster identifiers in `[0, k)`;
/// ties in the assignment step resolve to the lowest identifier. A
/// cluster that receives no samples keeps its previous centroid.
///
/// Hitting `max_iter` without the centroids settling is not an error:
/// the result is still usable and `converged` reports `false`.
#[derive(Debug)]
pub struct KMeans {
    pub centroids: Option<Matrix>,
    pub labels: Option<Vec<usize>>,
    pub inertia: Option<f64>,
    pub n_iter: Option<usize>,
    pub converged: Option<bool>,
    pub shift_history: Option<Vec<f64>>,
    n_clusters: usize,
    max_iter: usize,
    tolerance: f64,
    random_state: Option<u64>,
    init: String,
    metric: Box<dyn DistanceMetric>,
}

impl KMeans {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            centroids: None,
            labels: None,
            inertia: None,
            n_iter: None,
            converged: None,
            shift_history: None,
            n_clusters,
            max_iter: 100,
            tolerance: 1e-4,
            random_state: None,
            init: "k-means++".to_string(),
            metric: Box::new(SquaredEuclidean),
        }
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Convergence threshold on the maximum centroid displacement per
    /// iteration. Zero is allowed; the iteration cap still terminates.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Fixes the seed of the centroid initialization. Two runs with the
    /// same data, parameters and seed produce identical results.
    pub fn random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Seeding policy: `"k-means++"` (default) picks a first centroid
    /// uniformly, then weights later picks by squared distance to the
    /// nearest chosen centroid; `"random"` draws k distinct samples
    /// without replacement. Both draw from the `random_state` rng.
    pub fn init(mut self, init: &str) -> Self {
        match init {
            "k-means++" | "random" => {
                self.init = init.to_string();
            }
            _ => panic!("Invalid init method: {}. Must be 'k-means++' or 'random'", init),
        }
        self
    }

    pub fn metric<M: DistanceMetric + 'static>(mut self, metric: M) -> Self {
        self.metric = Box::new(metric);
        self
    }

    pub fn fit(&mut self, x: &Matrix) -> Result<()> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ModelError::InvalidParameter(
                "input matrix must have at least one sample and one feature".to_string(),
            ));
        }

        if self.n_clusters < 1 {
            return Err(ModelError::InvalidParameter(format!(
                "n_clusters must be >= 1, got {}",
                self.n_clusters
            )));
        }

        if self.n_clusters > x.nrows() {
            return Err(ModelError::InvalidParameter(format!(
                "n_samples={} must be >= n_clusters={}",
                x.nrows(),
                self.n_clusters
            )));
        }

        if self.tolerance < 0.0 {
            return Err(ModelError::InvalidParameter(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }

        let mut rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut centroids = self.initialize_centroids(x, &mut rng);
        let mut labels = vec![0usize; x.nrows()];
        let mut shift_history = Vec::new();
        let mut converged = false;
        let mut n_iter = 0;

        for _ in 0..self.max_iter {
            n_iter += 1;

            // Assign points to the nearest centroid
            for i in 0..x.nrows() {
                labels[i] = self.nearest_centroid(&x.row(i), &centroids);
            }

            // Recompute each centroid as the mean of its assigned points.
            // The working matrix is replaced rather than mutated through
            // the old one; the displacement check needs both generations.
            let old_centroids = centroids;
            centroids = Matrix::zeros((self.n_clusters, x.ncols()));
            let mut counts = vec![0usize; self.n_clusters];

            for (i, &label) in labels.iter().enumerate() {
                counts[label] += 1;
                for j in 0..x.ncols() {
                    centroids[[label, j]] += x[[i, j]];
                }
            }

            for k in 0..self.n_clusters {
                if counts[k] > 0 {
                    for j in 0..x.ncols() {
                        centroids[[k, j]] /= counts[k] as f64;
                    }
                } else {
                    // Empty cluster: keep the previous centroid
                    centroids.row_mut(k).assign(&old_centroids.row(k));
                }
            }

            let shift = max_centroid_shift(&old_centroids, &centroids);
            shift_history.push(shift);

            if shift <= self.tolerance {
                converged = true;
                break;
            }
        }

        // Re-assign against the final centroids, so that an extra
        // assignment pass would not move any sample
        for i in 0..x.nrows() {
            labels[i] = self.nearest_centroid(&x.row(i), &centroids);
        }

        // Within-cluster sum of squares
        let mut inertia = 0.0;
        for (i, &label) in labels.iter().enumerate() {
            inertia += sq_euclidean(&x.row(i), &centroids.row(label));
        }

        self.centroids = Some(centroids);
        self.labels = Some(labels);
        self.inertia = Some(inertia);
        self.n_iter = Some(n_iter);
        self.converged = Some(converged);
        self.shift_history = Some(shift_history);

        Ok(())
    }

    pub fn predict(&self, x: &Matrix) -> Result<Vec<usize>> {
        let centroids = self
            .centroids
            .as_ref()
            .ok_or(ModelError::NotFitted("KMeans"))?;

        if x.ncols() != centroids.ncols() {
            return Err(ModelError::DimensionMismatch {
                expected: centroids.ncols(),
                got: x.ncols(),
            });
        }

        Ok((0..x.nrows())
            .map(|i| self.nearest_centroid(&x.row(i), centroids))
            .collect())
    }

    pub fn fit_predict(&mut self, x: &Matrix) -> Result<Vec<usize>> {
        self.fit(x)?;
        Ok(self.labels.clone().unwrap_or_default())
    }

    /// Distance from every sample to every centroid under the configured
    /// metric, shape `(n_samples, n_clusters)`.
    pub fn transform(&self, x: &Matrix) -> Result<Matrix> {
        let centroids = self
            .centroids
            .as_ref()
            .ok_or(ModelError::NotFitted("KMeans"))?;

        if x.ncols() != centroids.ncols() {
            return Err(ModelError::DimensionMismatch {
                expected: centroids.ncols(),
                got: x.ncols(),
            });
        }

        let mut distances = Matrix::zeros((x.nrows(), self.n_clusters));
        for i in 0..x.nrows() {
            for k in 0..self.n_clusters {
                distances[[i, k]] = self.metric.distance(&x.row(i), &centroids.row(k));
            }
        }

        Ok(distances)
    }

    fn nearest_centroid(&self, sample: &ArrayView1<f64>, centroids: &Matrix) -> usize {
        let mut min_distance = f64::INFINITY;
        let mut closest = 0;

        // Strict comparison in ascending id order: ties go to the lowest id
        for k in 0..centroids.nrows() {
            let distance = self.metric.distance(sample, &centroids.row(k));
            if distance < min_distance {
                min_distance = distance;
                closest = k;
            }
        }

        closest
    }

    fn initialize_centroids(&self, x: &Matrix, rng: &mut StdRng) -> Matrix {
        let n = x.nrows();
        let mut centroids = Matrix::zeros((self.n_clusters, x.ncols()));

        match self.init.as_str() {
            "random" => {
                // k distinct samples, drawn without replacement
                let chosen = rand::seq::index::sample(rng, n, self.n_clusters);
                for (k, i) in chosen.iter().enumerate() {
                    centroids.row_mut(k).assign(&x.row(i));
                }
            }
            "k-means++" => {
                let first = rng.gen_range(0..n);
                centroids.row_mut(0).assign(&x.row(first));

                for k in 1..self.n_clusters {
                    // Squared distance to the nearest already-chosen
                    // centroid. Seeding always weights by squared Euclidean
                    // distance, independent of the assignment metric.
                    let mut weights = vec![f64::INFINITY; n];
                    for i in 0..n {
                        for j in 0..k {
                            let d = sq_euclidean(&x.row(i), &centroids.row(j));
                            if d < weights[i] {
                                weights[i] = d;
                            }
                        }
                    }

                    let total: f64 = weights.iter().sum();
                    if total > 0.0 {
                        // Sample proportionally to the squared distances;
                        // zero-weight (already chosen) points cannot be hit
                        let target = rng.gen_range(0.0..1.0) * total;
                        let mut chosen = weights
                            .iter()
                            .enumerate()
                            .max_by(|(_, a), (_, b)| a.total_cmp(b))
                            .map(|(i, _)| i)
                            .unwrap_or(0);
                        let mut cumulative = 0.0;
                        for (i, &w) in weights.iter().enumerate() {
                            if w > 0.0 {
                                cumulative += w;
                                if cumulative > target {
                                    chosen = i;
                                    break;
                                }
                            }
                        }
                        centroids.row_mut(k).assign(&x.row(chosen));
                    } else {
                        // Every sample coincides with a centroid already;
                        // any sample works
                        let i = rng.gen_range(0..n);
                        centroids.row_mut(k).assign(&x.row(i));
                    }
                }
            }
            _ => unreachable!(), // Validated in the init setter
        }

        centroids
    }
}

fn sq_euclidean(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
}

/// Maximum Euclidean displacement between two centroid generations.
/// The convergence measure is fixed regardless of the assignment metric.
fn max_centroid_shift(old_centroids: &Matrix, new_centroids: &Matrix) -> f64 {
    let mut max_shift = 0.0_f64;
    for k in 0..old_centroids.nrows() {
        let shift = sq_euclidean(&old_centroids.row(k), &new_centroids.row(k)).sqrt();
        max_shift = max_shift.max(shift);
    }
    max_shift
}
