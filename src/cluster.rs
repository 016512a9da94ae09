use crate::error::KMeansError;
use crate::point::Point;
use std::fmt;

/// Running sum of the points assigned to one cluster.
///
/// Workers fill private accumulators without synchronization and the
/// coordinator merges them afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    pub sum_x: f64,
    pub sum_y: f64,
    pub count: usize,
}

impl Accumulator {
    #[inline]
    pub fn add(&mut self, p: &Point) {
        self.sum_x += p.x;
        self.sum_y += p.y;
        self.count += 1;
    }

    #[inline]
    pub fn merge(&mut self, other: &Accumulator) {
        self.sum_x += other.sum_x;
        self.sum_y += other.sum_y;
        self.count += other.count;
    }

    /// Mean of the accumulated points, `None` when nothing was added.
    pub fn mean(&self) -> Option<Point> {
        if self.count == 0 {
            return None;
        }
        let count = self.count as f64;
        Some(Point::new(self.sum_x / count, self.sum_y / count))
    }
}

/// What happened to a cluster during one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Centroid recomputed and within tolerance of the previous one
    Stable,
    /// Centroid moved by more than the tolerance
    Moved,
    /// No point was assigned; the previous centroid is kept
    Empty,
}

impl UpdateOutcome {
    pub fn changed(self) -> bool {
        matches!(self, UpdateOutcome::Moved)
    }
}

/// A cluster: its current centroid plus the accumulator for the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    centroid: Point,
    acc: Accumulator,
    changed: bool,
}

impl Cluster {
    pub fn new(centroid: Point) -> Self {
        Self {
            centroid,
            acc: Accumulator::default(),
            changed: false,
        }
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    /// Number of points that contributed to the current centroid.
    pub fn count(&self) -> usize {
        self.acc.count
    }

    pub fn sums(&self) -> (f64, f64) {
        (self.acc.sum_x, self.acc.sum_y)
    }

    /// Whether the last update moved the centroid beyond tolerance.
    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn is_empty(&self) -> bool {
        self.acc.count == 0
    }

    pub(crate) fn reset(&mut self) {
        self.acc = Accumulator::default();
    }

    pub(crate) fn absorb(&mut self, partial: &Accumulator) {
        self.acc.merge(partial);
    }

    /// Recompute the centroid from the accumulator.
    ///
    /// `index` only identifies the cluster in errors.
    pub(crate) fn update(&mut self, index: usize, tol: f64) -> Result<UpdateOutcome, KMeansError> {
        let Some(mean) = self.acc.mean() else {
            self.changed = false;
            return Ok(UpdateOutcome::Empty);
        };
        if !mean.is_finite() {
            return Err(KMeansError::NonFiniteCentroid { cluster: index });
        }

        self.changed = !self.centroid.almost_equals_within(&mean, tol);
        self.centroid = mean;

        Ok(if self.changed {
            UpdateOutcome::Moved
        } else {
            UpdateOutcome::Stable
        })
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mean = {}", self.centroid)
    }
}
