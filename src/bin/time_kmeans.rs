//! Times repeated k-means runs on synthetic grid data and prints the clusters.
//!
//! Usage: `time-kmeans [--points N] [--clusters K] [--workers T] [--runs R]`
//!
//! Set `RUST_LOG=parkmeans_rs=debug` to see per-iteration progress.

use clap::Parser;
use parkmeans_rs::generate::{random_indexes, random_points};
use parkmeans_rs::{KMeansConfig, ParKMeans};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Time parallel k-means on synthetic 2D points")]
struct Args {
    /// Number of points to generate
    #[arg(short = 'n', long, default_value_t = 200_000)]
    points: usize,

    /// Number of clusters
    #[arg(short = 'k', long, default_value_t = 81)]
    clusters: usize,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short = 't', long)]
    workers: Option<usize>,

    /// How many times to repeat the run
    #[arg(short = 'r', long, default_value_t = 3)]
    runs: usize,

    /// Seed for point and initial index generation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Optional iteration cap
    #[arg(long)]
    max_iters: Option<usize>,

    /// Do not print the clusters
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.clusters > args.points {
        return Err(format!(
            "cannot seed {} clusters from {} points",
            args.clusters, args.points
        )
        .into());
    }

    let points = random_points(args.points, args.seed);
    let initial = random_indexes(args.points, args.clusters, args.seed);

    let mut config = KMeansConfig::default().with_max_iters(args.max_iters);
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    eprintln!(
        "{} points, {} clusters, {} workers",
        points.len(),
        initial.len(),
        config.n_workers
    );

    let mut kmeans = ParKMeans::with_config(config);
    for _ in 0..args.runs {
        let start = Instant::now();
        let result = kmeans.find_clusters(&points, &initial)?;
        let elapsed = start.elapsed().as_secs_f64();

        if !args.quiet {
            println!("{}", result);
        }
        println!("{:<20} Real time: {:9.3}", "ParKMeans", elapsed);
        println!();
    }

    Ok(())
}
