use crate::aggregate::{accumulate, finalize};
use crate::cluster::{Cluster, UpdateOutcome};
use crate::config::{KMeansConfig, NonConvergence};
use crate::distance::assign_points;
use crate::error::KMeansError;
use crate::partition::partition;
use crate::point::Point;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, info_span, warn};

/// Result of the k-means algorithm
#[derive(Debug, Clone)]
pub struct ClusteringResult {
    /// Final clusters, in the order of the initial indices
    pub clusters: Vec<Cluster>,
    /// Cluster index of every point, from the last assignment pass
    pub owners: Vec<usize>,
    /// Number of assignment/update cycles run
    pub iterations: usize,
    /// False only when the iteration cap stopped the run
    pub converged: bool,
    /// Within-cluster sum of squared distances seen by each assignment pass
    pub inertia_history: Vec<f64>,
}

impl ClusteringResult {
    pub fn centroids(&self) -> Vec<Point> {
        self.clusters.iter().map(Cluster::centroid).collect()
    }

    pub fn cluster_sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(Cluster::count).collect()
    }

    /// Within-cluster sum of squared distances for the final centroids
    pub fn inertia(&self, points: &[Point]) -> f64 {
        points
            .iter()
            .zip(&self.owners)
            .map(|(p, &owner)| p.sqr_dist(&self.clusters[owner].centroid()))
            .sum()
    }
}

impl fmt::Display for ClusteringResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cluster in &self.clusters {
            writeln!(f, "{}", cluster)?;
        }
        write!(f, "Used {} iterations", self.iterations)
    }
}

/// Run `task` once per item on `pool` and wait for all of them.
///
/// Outputs come back in item order. A task that returns an error or panics
/// fails the whole phase; a panic becomes [`KMeansError::WorkerFailed`].
pub(crate) fn join_tasks<I, T, F>(
    pool: &ThreadPool,
    phase: &'static str,
    items: Vec<I>,
    task: F,
) -> Result<Vec<T>, KMeansError>
where
    I: Send,
    T: Send,
    F: Fn(I) -> Result<T, KMeansError> + Sync,
{
    pool.install(|| {
        items
            .into_par_iter()
            .map(|item| {
                panic::catch_unwind(AssertUnwindSafe(|| task(item))).unwrap_or_else(|payload| {
                    Err(KMeansError::WorkerFailed {
                        phase,
                        message: panic_message(payload.as_ref()),
                    })
                })
            })
            .collect()
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Check points and initial centroid indices before any work starts
pub fn validate_input(points: &[Point], initial_indices: &[usize]) -> Result<(), KMeansError> {
    let n = points.len();
    let k = initial_indices.len();

    if n == 0 {
        return Err(KMeansError::EmptyInput);
    }
    if k == 0 {
        return Err(KMeansError::InvalidK(
            "k must be greater than 0".to_string(),
        ));
    }
    if n < k {
        return Err(KMeansError::InsufficientData(format!(
            "Number of points ({}) is less than k ({})",
            n, k
        )));
    }

    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(KMeansError::NonFiniteCoordinate { index });
    }

    let mut seen = HashSet::with_capacity(k);
    for &index in initial_indices {
        if index >= n {
            return Err(KMeansError::IndexOutOfRange { index, n });
        }
        if !seen.insert(index) {
            return Err(KMeansError::DuplicateIndex(index));
        }
    }

    Ok(())
}

/// Check the settings that would otherwise stall or break the loop
pub fn validate_config(config: &KMeansConfig) -> Result<(), KMeansError> {
    if config.n_workers == 0 {
        return Err(KMeansError::InvalidWorkers);
    }
    // A negative or NaN tolerance never reports a stable centroid
    if !(config.tol >= 0.0 && config.tol.is_finite()) {
        return Err(KMeansError::InvalidTolerance(config.tol));
    }
    Ok(())
}

fn build_pool(n_workers: usize) -> Result<ThreadPool, KMeansError> {
    ThreadPoolBuilder::new()
        .num_threads(n_workers)
        .thread_name(|i| format!("kmeans-worker-{i}"))
        .build()
        .map_err(|e| KMeansError::ThreadPool(e.to_string()))
}

/// Run Lloyd's algorithm with `config.n_workers` parallel workers.
///
/// Each iteration is three fork-join phases over the same point ranges:
/// assignment, accumulation and finalization. The run stops once no
/// centroid moves more than `config.tol` on either axis. At least one
/// iteration always runs.
///
/// Nothing is returned on error; partial cluster state is dropped.
pub fn find_clusters(
    points: &[Point],
    initial_indices: &[usize],
    config: &KMeansConfig,
) -> Result<ClusteringResult, KMeansError> {
    validate_input(points, initial_indices)?;
    validate_config(config)?;
    let pool = build_pool(config.n_workers)?;

    let n = points.len();
    let k = initial_indices.len();
    let _span = info_span!("find_clusters", n, k, workers = config.n_workers).entered();

    let ranges = partition(n, config.n_workers)?;
    let mut clusters: Vec<Cluster> = initial_indices
        .iter()
        .map(|&i| Cluster::new(points[i]))
        .collect();
    let mut owners = vec![0usize; n];
    let mut inertia_history = Vec::new();
    let mut iterations = 0;

    loop {
        iterations += 1;

        let inertia = assign_points(&pool, points, &clusters, &mut owners, &ranges)?;
        inertia_history.push(inertia);

        accumulate(&pool, points, &owners, &mut clusters, &ranges)?;
        let outcomes = finalize(&pool, &mut clusters, config.tol)?;

        let mut empty = 0;
        for (index, outcome) in outcomes.iter().enumerate() {
            if *outcome == UpdateOutcome::Empty {
                empty += 1;
                warn!(
                    cluster = index,
                    centroid = %clusters[index].centroid(),
                    "Empty cluster"
                );
            }
        }
        let moved = outcomes.iter().filter(|o| o.changed()).count();
        debug!(iteration = iterations, inertia, moved, empty, "Iteration finished");

        if moved == 0 {
            info!(iterations, "Converged");
            return Ok(ClusteringResult {
                clusters,
                owners,
                iterations,
                converged: true,
                inertia_history,
            });
        }

        if config.max_iters.is_some_and(|cap| iterations >= cap) {
            warn!(iterations, moved, "Iteration cap reached before convergence");
            return match config.on_max_iters {
                NonConvergence::Fail => Err(KMeansError::NotConverged { iterations }),
                NonConvergence::BestEffort => Ok(ClusteringResult {
                    clusters,
                    owners,
                    iterations,
                    converged: false,
                    inertia_history,
                }),
            };
        }
    }
}
