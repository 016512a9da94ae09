use std::fmt;

/// Per-coordinate tolerance used to decide whether two points coincide.
///
/// Reasonable when the input coordinates are integers or of similar
/// magnitude.
pub const EPSILON: f64 = 1e-10;

/// Immutable 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance between `self` and `other`.
    ///
    /// The square root is skipped since it preserves ordering.
    #[inline]
    pub fn sqr_dist(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Approximate equality with the default [`EPSILON`].
    #[inline]
    pub fn almost_equals(&self, other: &Point) -> bool {
        self.almost_equals_within(other, EPSILON)
    }

    /// Both coordinates must be within `tol` of each other.
    #[inline]
    pub fn almost_equals_within(&self, other: &Point, tol: f64) -> bool {
        (self.x - other.x).abs() <= tol && (self.y - other.y).abs() <= tol
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:17.14}, {:17.14})", self.x, self.y)
    }
}
