use colorquant::metrics::{accuracy_score, confusion_matrix};
use colorquant::{GaussianNaiveBayes, Matrix};
use ndarray::{array, concatenate, Axis};
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Gaussian Naive Bayes ===\n");

    // Two overlapping Gaussian classes
    let mut rng = StdRng::seed_from_u64(21);
    let class_0 = Matrix::random_using((40, 2), Normal::new(0.0, 1.0)?, &mut rng) + &array![1.0, 1.0];
    let class_1 = Matrix::random_using((40, 2), Normal::new(0.0, 1.0)?, &mut rng) + &array![5.0, 5.0];
    let x = concatenate(Axis(0), &[class_0.view(), class_1.view()])?;

    let mut y = vec![0usize; 40];
    y.extend(vec![1usize; 40]);

    println!("Dataset: {} samples, {} features, 2 classes", x.nrows(), x.ncols());

    let mut bayes = GaussianNaiveBayes::new();
    bayes.fit(&x, &y)?;

    println!("\nEstimated parameters:");
    println!("  Priors:    {:?}", bayes.class_priors.as_ref().unwrap().to_vec());
    for class in 0..2 {
        println!(
            "  Class {}: mean {:?}, variance {:?}",
            class,
            bayes.means.as_ref().unwrap().row(class).to_vec(),
            bayes.variances.as_ref().unwrap().row(class).to_vec()
        );
    }

    let predicted = bayes.predict(&x)?;
    let accuracy = accuracy_score(&y, &predicted)?;
    let matrix = confusion_matrix(&y, &predicted, 2)?;

    println!("\nTraining accuracy: {:.2}%", accuracy * 100.0);
    println!("Confusion matrix (rows = actual, cols = predicted):");
    for row in matrix.outer_iter() {
        println!("  {:?}", row.to_vec());
    }

    let x_new = array![[1.5, 0.5], [4.5, 5.5], [3.0, 3.0]];
    let proba = bayes.predict_proba(&x_new)?;
    println!("\nPosterior probabilities for new samples:");
    for (i, row) in proba.outer_iter().enumerate() {
        println!(
            "  {:?} -> class 0: {:.3}, class 1: {:.3}",
            x_new.row(i).to_vec(),
            row[0],
            row[1]
        );
    }

    Ok(())
}
