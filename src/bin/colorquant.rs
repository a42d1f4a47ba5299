use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colorquant::{apply_centroids, KMeans, MeanShift, PixelConverter};
use std::path::PathBuf;

/// Reduce the number of colors in an image by clustering its pixels.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input image path
    input: PathBuf,

    /// Output image path
    #[arg(short, long, default_value = "quantized.png")]
    output: PathBuf,

    /// Clustering algorithm
    #[arg(long, value_enum, default_value = "kmeans")]
    algorithm: Algorithm,

    /// Number of color clusters (k-means)
    #[arg(short = 'k', long, default_value_t = 8)]
    clusters: usize,

    /// Convergence tolerance on centroid movement
    #[arg(long, default_value_t = 0.05)]
    tolerance: f64,

    /// Iteration cap
    #[arg(long, default_value_t = 100)]
    max_iter: usize,

    /// Seed for reproducible centroid initialization
    #[arg(long)]
    seed: Option<u64>,

    /// Kernel bandwidth in normalized pixel space (mean-shift)
    #[arg(long, default_value_t = 0.2)]
    bandwidth: f64,

    /// Normalization range for pixel channels, as "min,max"
    #[arg(long, default_value = "-1,1", allow_hyphen_values = true)]
    range: String,
}

#[derive(ValueEnum, Clone, Debug)]
enum Algorithm {
    Kmeans,
    Meanshift,
}

fn parse_range(s: &str) -> Result<(f64, f64)> {
    let (min, max) = s
        .split_once(',')
        .with_context(|| format!("range must be \"min,max\", got {:?}", s))?;
    let min: f64 = min.trim().parse().context("range min is not a number")?;
    let max: f64 = max.trim().parse().context("range max is not a number")?;
    anyhow::ensure!(min < max, "range min must be < max, got {},{}", min, max);
    Ok((min, max))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let img = image::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let (width, height) = (img.width(), img.height());
    println!(
        "{}: {}x{}, {} pixels",
        args.input.display(),
        width,
        height,
        width as usize * height as usize
    );

    let (min, max) = parse_range(&args.range)?;
    let converter = PixelConverter::new(min, max);
    let pixels = converter.image_to_matrix(&img);

    let (centroids, labels) = match args.algorithm {
        Algorithm::Kmeans => {
            let mut model = KMeans::new(args.clusters)
                .max_iter(args.max_iter)
                .tolerance(args.tolerance);
            if let Some(seed) = args.seed {
                model = model.random_state(seed);
            }
            model.fit(&pixels)?;
            println!(
                "k-means: {} clusters, {} iterations, converged: {}",
                args.clusters,
                model.n_iter.unwrap_or(0),
                model.converged.unwrap_or(false)
            );
            (
                model.centroids.take().context("no centroids after fit")?,
                model.labels.take().context("no labels after fit")?,
            )
        }
        Algorithm::Meanshift => {
            let mut model = MeanShift::new(args.bandwidth)
                .max_iter(args.max_iter)
                .tolerance(args.tolerance);
            model.fit(&pixels)?;
            println!(
                "mean-shift: {} modes at bandwidth {}",
                model.n_modes().unwrap_or(0),
                args.bandwidth
            );
            (
                model.modes.take().context("no modes after fit")?,
                model.labels.take().context("no labels after fit")?,
            )
        }
    };

    let quantized = apply_centroids(&pixels, &labels, &centroids)?;
    let out = converter.matrix_to_image(&quantized, width, height)?;
    out.save(&args.output)
        .with_context(|| format!("failed to save {}", args.output.display()))?;
    println!("Saved → {}", args.output.display());

    Ok(())
}
