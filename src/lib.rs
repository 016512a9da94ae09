//! # parkmeans-rs
//!
//! Lloyd's k-means clustering of 2D points on a fixed pool of worker threads.
//!
//! ## Features
//!
//! - **Fork-join phases**: every iteration runs assignment, accumulation and
//!   finalization as separate parallel phases with a barrier after each
//! - **Lock-free accumulation**: workers sum into private per-range
//!   accumulators that are merged once per iteration
//! - **Deterministic**: ties go to the lowest cluster index and partial sums
//!   are merged in range order, so the worker count does not change the result
//! - **Failure propagation**: a panicking worker fails the call instead of
//!   corrupting the sums
//!
//! ## Example
//!
//! ```rust
//! use parkmeans_rs::generate::{random_indexes, random_points};
//! use parkmeans_rs::{KMeansConfig, ParKMeans};
//!
//! let points = random_points(10_000, 42);
//! let initial = random_indexes(points.len(), 81, 42);
//!
//! let mut kmeans = ParKMeans::with_config(KMeansConfig::new(4));
//! let result = kmeans.find_clusters(&points, &initial).unwrap();
//!
//! assert_eq!(result.clusters.len(), 81);
//! assert!(result.converged);
//! ```
//!
//! ## Iteration cap
//!
//! By default the loop runs until no centroid moves. A cap can be set, and
//! hitting it either returns the current clusters or fails:
//!
//! ```rust
//! use parkmeans_rs::{find_clusters, KMeansConfig, NonConvergence, Point};
//!
//! let points: Vec<Point> = (0..100).map(|i| Point::new(i as f64, 0.0)).collect();
//! let config = KMeansConfig::new(2)
//!     .with_max_iters(Some(1))
//!     .with_on_max_iters(NonConvergence::BestEffort);
//!
//! let result = find_clusters(&points, &[0, 1], &config).unwrap();
//! assert_eq!(result.iterations, 1);
//! assert!(!result.converged);
//! ```
//!
//! Empty clusters are not errors: they keep their centroid and are reported
//! as `tracing` warnings.

mod aggregate;
mod algorithm;
mod cluster;
mod config;
mod distance;
mod error;
mod kmeans;
mod partition;
mod point;

pub mod generate;

pub use aggregate::{accumulate, finalize};
pub use algorithm::{find_clusters, validate_config, validate_input, ClusteringResult};
pub use cluster::{Accumulator, Cluster, UpdateOutcome};
pub use config::{KMeansConfig, NonConvergence};
pub use distance::{assign_points, assign_serial, nearest_centroid};
pub use error::KMeansError;
pub use kmeans::{points_from_array, ParKMeans};
pub use partition::partition;
pub use point::{Point, EPSILON};
