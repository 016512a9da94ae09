use crate::point::EPSILON;

/// What to do when `max_iters` is reached before convergence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonConvergence {
    /// Return the last settled clusters with `converged == false`
    #[default]
    BestEffort,
    /// Fail with [`KMeansError::NotConverged`](crate::KMeansError::NotConverged)
    Fail,
}

/// Configuration for the parallel k-means engine
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of worker threads, and the number of point ranges per phase
    pub n_workers: usize,

    /// Optional cap on the number of iterations.
    /// `None` iterates until every centroid is stable.
    pub max_iters: Option<usize>,

    /// Behavior when `max_iters` is hit
    pub on_max_iters: NonConvergence,

    /// Per-coordinate tolerance below which a centroid counts as unchanged.
    /// Must be finite and non-negative.
    pub tol: f64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            n_workers: num_cpus::get().max(1),
            max_iters: None,
            on_max_iters: NonConvergence::default(),
            tol: EPSILON,
        }
    }
}

impl KMeansConfig {
    /// Create a configuration using `n_workers` threads
    pub fn new(n_workers: usize) -> Self {
        Self {
            n_workers,
            ..Default::default()
        }
    }

    /// Set the number of worker threads
    pub fn with_workers(mut self, n_workers: usize) -> Self {
        self.n_workers = n_workers;
        self
    }

    /// Set the iteration cap
    pub fn with_max_iters(mut self, max_iters: Option<usize>) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the behavior when the iteration cap is hit
    pub fn with_on_max_iters(mut self, policy: NonConvergence) -> Self {
        self.on_max_iters = policy;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }
}
