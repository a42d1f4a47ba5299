pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod bayes;
pub mod cluster;
pub mod dataset;
pub mod error;
pub mod metric;
pub mod metrics;
pub mod pixels;

pub use bayes::GaussianNaiveBayes;
pub use cluster::{apply_centroids, KMeans, MeanShift};
pub use error::{ModelError, Result};
pub use metric::{DistanceMetric, Euclidean, Manhattan, SquaredEuclidean};
pub use pixels::PixelConverter;

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;
