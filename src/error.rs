use thiserror::Error;

/// Error types for the parkmeans library
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansError {
    /// The point set is empty
    #[error("Point set is empty")]
    EmptyInput,

    /// The number of clusters k is invalid (must be > 0)
    #[error("Invalid k value: {0}")]
    InvalidK(String),

    /// Not enough data points for the requested number of clusters
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// An initial centroid index does not address a point
    #[error("Initial index {index} is out of range for {n} points")]
    IndexOutOfRange { index: usize, n: usize },

    /// The same point was selected twice as an initial centroid
    #[error("Initial index {0} appears more than once")]
    DuplicateIndex(usize),

    /// A point has a NaN or infinite coordinate
    #[error("Point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    /// No clustering has completed yet
    #[error("Model has not been fitted. Call find_clusters() first.")]
    NotFitted,

    /// Input matrix does not hold 2D points
    #[error("Dimension mismatch: {0}")]
    InvalidDimensions(String),

    /// The worker count must be at least 1
    #[error("Worker count must be at least 1")]
    InvalidWorkers,

    /// The convergence tolerance is negative, NaN or infinite
    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(f64),

    /// The worker pool could not be built
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    /// A worker task panicked; the whole step is discarded
    #[error("Worker failed during {phase}: {message}")]
    WorkerFailed {
        phase: &'static str,
        message: String,
    },

    /// Accumulated sums overflowed to a non-finite centroid
    #[error("Cluster {cluster} produced a non-finite centroid")]
    NonFiniteCentroid { cluster: usize },

    /// The iteration cap was reached before convergence
    #[error("Did not converge within {iterations} iterations")]
    NotConverged { iterations: usize },
}
