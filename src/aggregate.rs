use crate::algorithm::join_tasks;
use crate::cluster::{Accumulator, Cluster, UpdateOutcome};
use crate::error::KMeansError;
use crate::point::Point;
use rayon::ThreadPool;
use std::ops::Range;

/// Sum the points of one range into `k` private accumulators.
pub(crate) fn partial_sums(points: &[Point], owners: &[usize], k: usize) -> Vec<Accumulator> {
    let mut partial = vec![Accumulator::default(); k];
    for (p, &owner) in points.iter().zip(owners) {
        partial[owner].add(p);
    }
    partial
}

/// Accumulate step: rebuild every cluster's sums from `owners`.
///
/// Each task fills its own `k` accumulators without locking. After the join
/// the partial sums are merged into the clusters in range order, so the
/// merge costs `O(k * ranges)` regardless of the number of points.
pub fn accumulate(
    pool: &ThreadPool,
    points: &[Point],
    owners: &[usize],
    clusters: &mut [Cluster],
    ranges: &[Range<usize>],
) -> Result<(), KMeansError> {
    debug_assert_eq!(points.len(), owners.len());
    let k = clusters.len();

    let partials = join_tasks(pool, "accumulation", ranges.to_vec(), |range| {
        Ok(partial_sums(&points[range.clone()], &owners[range], k))
    })?;

    for cluster in clusters.iter_mut() {
        cluster.reset();
    }
    for partial in &partials {
        for (cluster, acc) in clusters.iter_mut().zip(partial) {
            cluster.absorb(acc);
        }
    }

    Ok(())
}

/// Finalize step: recompute every centroid from its sums, one task per cluster.
///
/// Empty clusters keep their centroid. Outcomes are returned in cluster
/// order.
pub fn finalize(
    pool: &ThreadPool,
    clusters: &mut [Cluster],
    tol: f64,
) -> Result<Vec<UpdateOutcome>, KMeansError> {
    let tasks: Vec<(usize, &mut Cluster)> = clusters.iter_mut().enumerate().collect();

    join_tasks(pool, "finalization", tasks, |(index, cluster)| cluster.update(index, tol))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::partition;
    use crate::point::EPSILON;
    use approx::assert_relative_eq;
    use rayon::ThreadPoolBuilder;

    fn pool(n: usize) -> ThreadPool {
        ThreadPoolBuilder::new().num_threads(n).build().unwrap()
    }

    fn clusters(centroids: &[(f64, f64)]) -> Vec<Cluster> {
        centroids.iter().map(|&c| Cluster::new(c.into())).collect()
    }

    #[test]
    fn test_partial_sums() {
        let points = [Point::new(1.0, 1.0), Point::new(3.0, 5.0), Point::new(2.0, 2.0)];
        let owners = [1, 0, 1];

        let partial = partial_sums(&points, &owners, 3);
        assert_eq!(partial[0].count, 1);
        assert_eq!(partial[1].count, 2);
        assert_eq!(partial[2].count, 0);
        assert_relative_eq!(partial[1].sum_x, 3.0);
        assert_relative_eq!(partial[1].sum_y, 3.0);
    }

    #[test]
    fn test_accumulate_independent_of_workers() {
        let points: Vec<Point> = (0..997)
            .map(|i| Point::new((i % 13) as f64, (i % 29) as f64))
            .collect();
        let owners: Vec<usize> = (0..points.len()).map(|i| (i * 7) % 5).collect();

        let mut expected = clusters(&[(0.0, 0.0); 5]);
        let ranges = partition(points.len(), 1).unwrap();
        accumulate(&pool(1), &points, &owners, &mut expected, &ranges).unwrap();

        for workers in [2, 4, 8, 16] {
            let mut actual = clusters(&[(0.0, 0.0); 5]);
            accumulate(
                &pool(workers),
                &points,
                &owners,
                &mut actual,
                &partition(points.len(), workers).unwrap(),
            )
            .unwrap();
            // Integer coordinates sum exactly, so the order of merging is irrelevant
            assert_eq!(actual, expected, "workers = {workers}");
        }

        let total: usize = expected.iter().map(Cluster::count).sum();
        assert_eq!(total, points.len());
    }

    #[test]
    fn test_accumulate_resets_previous_sums() {
        let points = [Point::new(2.0, 4.0)];
        let owners = [0];
        let mut cs = clusters(&[(0.0, 0.0)]);
        let ranges = partition(1, 1).unwrap();

        accumulate(&pool(1), &points, &owners, &mut cs, &ranges).unwrap();
        accumulate(&pool(1), &points, &owners, &mut cs, &ranges).unwrap();

        assert_eq!(cs[0].count(), 1);
        assert_eq!(cs[0].sums(), (2.0, 4.0));
    }

    #[test]
    fn test_finalize_reports_outcomes() {
        let points = [Point::new(0.0, 0.0), Point::new(0.0, 2.0), Point::new(5.0, 5.0)];
        let owners = [0, 0, 1];
        let mut cs = clusters(&[(0.0, 0.0), (5.0, 5.0), (100.0, 100.0)]);
        let pool = pool(2);

        accumulate(&pool, &points, &owners, &mut cs, &partition(3, 2).unwrap()).unwrap();
        let outcomes = finalize(&pool, &mut cs, EPSILON).unwrap();

        assert_eq!(
            outcomes,
            vec![UpdateOutcome::Moved, UpdateOutcome::Stable, UpdateOutcome::Empty]
        );
        assert_eq!(cs[0].centroid(), Point::new(0.0, 1.0));
        assert_eq!(cs[2].centroid(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_finalize_propagates_overflow() {
        let points = [Point::new(f64::MAX, 1.0), Point::new(f64::MAX, 1.0)];
        let owners = [1, 1];
        let mut cs = clusters(&[(0.0, 0.0), (1.0, 1.0)]);
        let pool = pool(2);

        accumulate(&pool, &points, &owners, &mut cs, &partition(2, 2).unwrap()).unwrap();
        let result = finalize(&pool, &mut cs, EPSILON);

        assert_eq!(result, Err(KMeansError::NonFiniteCentroid { cluster: 1 }));
    }

    #[test]
    fn test_bad_owner_surfaces_as_worker_failure() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let owners = [0, 7];
        let mut cs = clusters(&[(0.0, 0.0), (1.0, 1.0)]);

        let ranges = partition(2, 2).unwrap();
        let result = accumulate(&pool(2), &points, &owners, &mut cs, &ranges);
        assert!(matches!(
            result,
            Err(KMeansError::WorkerFailed { phase: "accumulation", .. })
        ));
    }
}
