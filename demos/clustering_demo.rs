use colorquant::{KMeans, Matrix, MeanShift};
use ndarray::{array, concatenate, Axis};
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Clustering Algorithms Comparison ===\n");

    // Three Gaussian blobs with a fixed seed
    let mut rng = StdRng::seed_from_u64(7);
    let noise = Normal::new(0.0, 0.3)?;
    let blob_a = Matrix::random_using((15, 2), noise, &mut rng) + &array![2.0, 2.0];
    let blob_b = Matrix::random_using((15, 2), noise, &mut rng) + &array![8.0, 8.0];
    let blob_c = Matrix::random_using((15, 2), noise, &mut rng) + &array![2.0, 8.0];
    let x = concatenate(Axis(0), &[blob_a.view(), blob_b.view(), blob_c.view()])?;

    println!("Dataset: {} samples, {} features", x.nrows(), x.ncols());
    println!("Expected: 3 natural clusters\n");

    println!("=== K-Means ===");
    for &k in &[2, 3, 4, 5] {
        let mut kmeans = KMeans::new(k).max_iter(100).random_state(42);
        kmeans.fit(&x)?;
        println!(
            "KMeans(k={}): inertia {:.4}, {} iterations, converged: {}",
            k,
            kmeans.inertia.unwrap_or(f64::NAN),
            kmeans.n_iter.unwrap_or(0),
            kmeans.converged.unwrap_or(false)
        );
    }

    println!("\n=== Mean-Shift ===");
    for &bandwidth in &[0.5, 1.0, 2.0, 4.0] {
        let mut meanshift = MeanShift::new(bandwidth);
        let labels = meanshift.fit_predict(&x)?;

        let n_modes = meanshift.n_modes().unwrap_or(0);
        let mut sizes = vec![0usize; n_modes];
        for &label in &labels {
            sizes[label] += 1;
        }
        println!(
            "MeanShift(bandwidth={}): {} modes, cluster sizes {:?}",
            bandwidth, n_modes, sizes
        );
    }

    println!("\n=== Detailed K-Means Run (k=3) ===");
    let mut best = KMeans::new(3).tolerance(1e-4).random_state(42);
    let labels = best.fit_predict(&x)?;

    println!("Inertia: {:.4}", best.inertia.unwrap_or(f64::NAN));
    println!(
        "Centroid displacement per iteration: {:?}",
        best.shift_history
            .as_ref()
            .map(|shifts| shifts
                .iter()
                .map(|s| format!("{:.5}", s))
                .collect::<Vec<_>>())
            .unwrap_or_default()
    );
    for cluster in 0..3 {
        let count = labels.iter().filter(|&&l| l == cluster).count();
        let centroid = best.centroids.as_ref().unwrap().row(cluster).to_vec();
        println!("Cluster {}: {} points, centroid {:?}", cluster, count, centroid);
    }

    Ok(())
}
