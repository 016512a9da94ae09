use crate::algorithm::{find_clusters, ClusteringResult};
use crate::cluster::Cluster;
use crate::config::KMeansConfig;
use crate::distance::nearest_centroid;
use crate::error::KMeansError;
use crate::point::Point;
use ndarray::{Array2, ArrayView2};

/// Convert an `(n, 2)` array into points.
pub fn points_from_array(data: &ArrayView2<f64>) -> Result<Vec<Point>, KMeansError> {
    if data.ncols() != 2 {
        return Err(KMeansError::InvalidDimensions(format!(
            "Expected 2 columns, got {}",
            data.ncols()
        )));
    }
    Ok(data
        .outer_iter()
        .map(|row| Point::new(row[0], row[1]))
        .collect())
}

/// Parallel k-means clustering of 2D points.
///
/// Holds the configuration and the result of the last successful run. A
/// failed run leaves the previous result untouched.
///
/// # Example
///
/// ```
/// use parkmeans_rs::{KMeansConfig, ParKMeans, Point};
///
/// let points = vec![
///     Point::new(0.0, 0.0),
///     Point::new(0.0, 1.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 1.0),
/// ];
///
/// let mut kmeans = ParKMeans::with_config(KMeansConfig::new(2));
/// let result = kmeans.find_clusters(&points, &[0, 2]).unwrap();
///
/// assert_eq!(result.centroids(), vec![Point::new(0.0, 0.5), Point::new(10.0, 0.5)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParKMeans {
    /// Model configuration
    config: KMeansConfig,

    /// Last successful run (None until `find_clusters` succeeds)
    result: Option<ClusteringResult>,
}

impl ParKMeans {
    /// Create an instance with the default configuration (one worker per CPU).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an instance with a custom configuration.
    pub fn with_config(config: KMeansConfig) -> Self {
        Self {
            config,
            result: None,
        }
    }

    /// Cluster `points`, seeding one centroid per entry of `initial_indices`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `points` is empty or contains a non-finite coordinate
    /// - `initial_indices` is empty, longer than `points`, out of range or
    ///   contains duplicates
    /// - a worker fails or the iteration cap is hit under
    ///   [`NonConvergence::Fail`](crate::NonConvergence::Fail)
    pub fn find_clusters(
        &mut self,
        points: &[Point],
        initial_indices: &[usize],
    ) -> Result<&ClusteringResult, KMeansError> {
        let result = find_clusters(points, initial_indices, &self.config)?;
        Ok(self.result.insert(result))
    }

    /// Same as [`find_clusters`](Self::find_clusters) for an `(n, 2)` array.
    pub fn fit_array(
        &mut self,
        data: &ArrayView2<f64>,
        initial_indices: &[usize],
    ) -> Result<&ClusteringResult, KMeansError> {
        let points = points_from_array(data)?;
        self.find_clusters(&points, initial_indices)
    }

    /// Assign new points to the nearest fitted centroid.
    pub fn predict(&self, points: &[Point]) -> Result<Vec<usize>, KMeansError> {
        let result = self.result.as_ref().ok_or(KMeansError::NotFitted)?;
        let centroids = result.centroids();
        Ok(points
            .iter()
            .map(|p| nearest_centroid(p, &centroids).0)
            .collect())
    }

    /// Result of the last successful run.
    pub fn result(&self) -> Option<&ClusteringResult> {
        self.result.as_ref()
    }

    /// Clusters of the last successful run.
    pub fn clusters(&self) -> Option<&[Cluster]> {
        self.result.as_ref().map(|r| r.clusters.as_slice())
    }

    /// Centroids as a `(k, 2)` array.
    pub fn centroids_array(&self) -> Option<Array2<f64>> {
        let clusters = self.clusters()?;
        let mut centroids = Array2::zeros((clusters.len(), 2));
        for (i, c) in clusters.iter().enumerate() {
            let centroid = c.centroid();
            centroids[[i, 0]] = centroid.x;
            centroids[[i, 1]] = centroid.y;
        }
        Some(centroids)
    }

    /// Iterations used by the last successful run.
    pub fn iterations(&self) -> Option<usize> {
        self.result.as_ref().map(|r| r.iterations)
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_parkmeans_new() {
        let kmeans = ParKMeans::new();
        assert!(kmeans.result().is_none());
        assert!(kmeans.centroids_array().is_none());
        assert!(kmeans.config().n_workers >= 1);
    }

    #[test]
    fn test_fit_array() {
        let data = array![[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]];
        let mut kmeans = ParKMeans::with_config(KMeansConfig::new(2));

        kmeans.fit_array(&data.view(), &[0, 2]).unwrap();

        let centroids = kmeans.centroids_array().unwrap();
        assert_eq!(centroids, array![[0.0, 0.5], [10.0, 0.5]]);
        assert_eq!(kmeans.iterations(), Some(2));
    }

    #[test]
    fn test_fit_array_dimension_mismatch() {
        let data = array![[0.0, 0.0, 1.0], [1.0, 1.0, 1.0]];
        let mut kmeans = ParKMeans::new();

        let result = kmeans.fit_array(&data.view(), &[0]);
        assert!(matches!(result, Err(KMeansError::InvalidDimensions(_))));
    }

    #[test]
    fn test_predict() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(9.0, 9.0)];
        let mut kmeans = ParKMeans::with_config(KMeansConfig::new(1));
        kmeans.find_clusters(&points, &[0, 2]).unwrap();

        let labels = kmeans
            .predict(&[Point::new(-1.0, 0.0), Point::new(8.0, 8.0)])
            .unwrap();
        assert_eq!(labels, vec![0, 1]);
    }

    #[test]
    fn test_predict_before_fit() {
        let kmeans = ParKMeans::new();
        let result = kmeans.predict(&[Point::new(0.0, 0.0)]);
        assert!(matches!(result, Err(KMeansError::NotFitted)));
    }

    #[test]
    fn test_failed_run_keeps_previous_result() {
        let points = vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0)];
        let mut kmeans = ParKMeans::with_config(KMeansConfig::new(2));
        kmeans.find_clusters(&points, &[0, 1]).unwrap();

        assert!(kmeans.find_clusters(&points, &[0, 0]).is_err());
        assert_eq!(kmeans.clusters().unwrap().len(), 2);
    }
}
