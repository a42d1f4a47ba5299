//! Clustering algorithms for color quantization.
//!
//! This module provides the two pixel-clustering estimators:
//! - `KMeans`: partitional clustering with a fixed number of centroids
//! - `MeanShift`: mode seeking with a kernel bandwidth, cluster count discovered
//!
//! plus [`apply_centroids`], which substitutes every sample with the
//! centroid of its assigned cluster (the quantization step).
//!
//! # Examples
//!
//! ## K-Means
//! ```rust
//! use colorquant::KMeans;
//! use ndarray::array;
//!
//! let x = array![
//!     [0.0, 0.0],
//!     [0.2, 0.1],
//!     [0.1, 0.3],
//!     [9.0, 9.0],
//!     [9.2, 8.9],
//!     [8.8, 9.1]
//! ];
//!
//! let mut kmeans = KMeans::new(2).tolerance(0.01).random_state(0);
//! let labels = kmeans.fit_predict(&x).unwrap();
//!
//! assert_eq!(labels.len(), 6);
//! assert!(kmeans.converged.unwrap());
//!
//! let centers = kmeans.centroids.as_ref().unwrap();
//! println!("Cluster centers: {:?}", centers);
//! ```
//!
//! ## Mean-Shift
//! ```rust
//! use colorquant::MeanShift;
//! use ndarray::array;
//!
//! let x = array![
//!     [0.0, 0.0],
//!     [0.1, 0.2],
//!     [7.0, 7.0],
//!     [7.2, 6.9]
//! ];
//!
//! let mut meanshift = MeanShift::new(2.0); // bandwidth
//! let labels = meanshift.fit_predict(&x).unwrap();
//!
//! assert_eq!(meanshift.n_modes(), Some(2));
//! assert_eq!(labels[0], labels[1]);
//! ```

mod kmeans;
mod meanshift;

pub use kmeans::KMeans;
pub use meanshift::MeanShift;

use crate::error::{ModelError, Result};
use crate::Matrix;

/// Replaces every sample with the centroid of its assigned cluster:
/// `out.row(i) = centroids.row(labels[i])`.
///
/// This is the quantization step that consumes a clustering result; it
/// has no algorithmic content of its own.
pub fn apply_centroids(x: &Matrix, labels: &[usize], centroids: &Matrix) -> Result<Matrix> {
    if labels.len() != x.nrows() {
        return Err(ModelError::InvalidParameter(format!(
            "expected one label per sample ({}), got {}",
            x.nrows(),
            labels.len()
        )));
    }

    if centroids.ncols() != x.ncols() {
        return Err(ModelError::DimensionMismatch {
            expected: x.ncols(),
            got: centroids.ncols(),
        });
    }

    let mut out = Matrix::zeros((x.nrows(), x.ncols()));
    for (i, &label) in labels.iter().enumerate() {
        if label >= centroids.nrows() {
            return Err(ModelError::InvalidParameter(format!(
                "label {} is out of range for {} clusters",
                label,
                centroids.nrows()
            )));
        }
        out.row_mut(i).assign(&centroids.row(label));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_apply_centroids() {
        let x = array![[0.1, 0.2], [9.9, 9.8], [0.3, 0.1]];
        let centroids = array![[0.0, 0.0], [10.0, 10.0]];
        let labels = vec![0, 1, 0];

        let out = apply_centroids(&x, &labels, &centroids).unwrap();
        assert_eq!(out, array![[0.0, 0.0], [10.0, 10.0], [0.0, 0.0]]);
    }

    #[test]
    fn test_apply_centroids_label_count_mismatch() {
        let x = array![[0.1, 0.2], [9.9, 9.8]];
        let centroids = array![[0.0, 0.0]];
        let labels = vec![0];

        assert!(matches!(
            apply_centroids(&x, &labels, &centroids),
            Err(ModelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_apply_centroids_out_of_range_label() {
        let x = array![[0.1, 0.2]];
        let centroids = array![[0.0, 0.0]];
        let labels = vec![1];

        assert!(matches!(
            apply_centroids(&x, &labels, &centroids),
            Err(ModelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_apply_centroids_dimension_mismatch() {
        let x = array![[0.1, 0.2]];
        let centroids = array![[0.0, 0.0, 0.0]];
        let labels = vec![0];

        assert!(matches!(
            apply_centroids(&x, &labels, &centroids),
            Err(ModelError::DimensionMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn test_clusterer_output_feeds_apply() {
        let x = array![[0.0, 0.0], [0.0, 0.0], [10.0, 10.0], [10.0, 10.0]];

        let mut kmeans = KMeans::new(2).tolerance(0.01).random_state(7);
        let labels = kmeans.fit_predict(&x).unwrap();
        let centroids = kmeans.centroids.as_ref().unwrap();

        let quantized = apply_centroids(&x, &labels, centroids).unwrap();
        // Exact pairs cluster onto themselves
        assert_eq!(quantized, x);
    }
}
