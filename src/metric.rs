use ndarray::ArrayView1;

/// Pairwise dissimilarity between two equal-length sample vectors.
///
/// Estimators take the metric as a trait object, so callers can plug in
/// their own without touching the estimator.
pub trait DistanceMetric: std::fmt::Debug + Send + Sync {
    fn distance(&self, a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64;
}

/// Sum of squared component differences, no square root taken.
///
/// Ordering by squared distance equals ordering by distance, so this is
/// the default for nearest-centroid assignment.
#[derive(Clone, Copy, Debug, Default)]
pub struct SquaredEuclidean;

impl DistanceMetric for SquaredEuclidean {
    fn distance(&self, a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Euclidean;

impl DistanceMetric for Euclidean {
    fn distance(&self, a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Manhattan;

impl DistanceMetric for Manhattan {
    fn distance(&self, a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .sum::<f64>()
    }
}
