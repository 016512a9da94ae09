use crate::algorithm::join_tasks;
use crate::cluster::Cluster;
use crate::error::KMeansError;
use crate::partition::split_by_ranges;
use crate::point::Point;
use rayon::ThreadPool;
use std::ops::Range;

/// Find the nearest centroid to `p`.
///
/// Returns the centroid index and the squared distance to it. On ties the
/// lowest index wins, which keeps assignments independent of worker count.
#[inline]
pub fn nearest_centroid(p: &Point, centroids: &[Point]) -> (usize, f64) {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;

    for (j, c) in centroids.iter().enumerate() {
        let dist = p.sqr_dist(c);
        if dist < best_dist {
            best_dist = dist;
            best = j;
        }
    }

    (best, best_dist)
}

/// Assign every point to its nearest centroid (serial version)
pub fn assign_serial(points: &[Point], centroids: &[Point], owners: &mut [usize]) -> f64 {
    let mut inertia = 0.0;
    for (owner, p) in owners.iter_mut().zip(points) {
        let (best, dist) = nearest_centroid(p, centroids);
        *owner = best;
        inertia += dist;
    }
    inertia
}

/// Assignment step: recompute `owners` from the current centroids.
///
/// Each range of `ranges` becomes one task writing only its own slice of
/// `owners`, so no synchronization is needed. Every slot is overwritten, so
/// nothing from a previous iteration survives. Blocks until all tasks are
/// done.
///
/// Returns the sum of squared distances from each point to its assigned
/// centroid, combined in range order.
pub fn assign_points(
    pool: &ThreadPool,
    points: &[Point],
    clusters: &[Cluster],
    owners: &mut [usize],
    ranges: &[Range<usize>],
) -> Result<f64, KMeansError> {
    debug_assert_eq!(points.len(), owners.len());

    // Snapshot of the settled centroids; clusters are not touched until the next phase
    let centroids: Vec<Point> = clusters.iter().map(Cluster::centroid).collect();

    let tasks: Vec<(Range<usize>, &mut [usize])> = ranges
        .iter()
        .cloned()
        .zip(split_by_ranges(owners, ranges))
        .collect();

    let partial_inertia = join_tasks(pool, "assignment", tasks, |(range, owners)| {
        Ok(assign_serial(&points[range], &centroids, owners))
    })?;

    Ok(partial_inertia.into_iter().sum())
}
