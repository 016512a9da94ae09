//! Reproducible synthetic input: points scattered around a 9x9 grid of
//! centers, and distinct random indices to seed the initial centroids.

use crate::point::Point;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Side of the grid of centers the points are drawn around
pub const GRID_SIDE: usize = 9;

/// Width of the square each point falls into, starting at its center
pub const SPREAD: f64 = 8.0;

/// Centers `(10x + 4, 10y + 4)` for `x, y` in `0..GRID_SIDE`
pub fn grid_centers() -> Vec<Point> {
    (0..GRID_SIDE)
        .flat_map(|x| {
            (0..GRID_SIDE).map(move |y| Point::new((x * 10 + 4) as f64, (y * 10 + 4) as f64))
        })
        .collect()
}

/// `n` points, each offset by `[0, SPREAD)` on both axes from a random center
pub fn random_points(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let centers = grid_centers();

    (0..n)
        .map(|_| {
            let center = centers[rng.gen_range(0..centers.len())];
            Point::new(
                center.x + rng.gen::<f64>() * SPREAD,
                center.y + rng.gen::<f64>() * SPREAD,
            )
        })
        .collect()
}

/// `k` distinct indices in `0..n`
///
/// # Panics
///
/// Panics if `k > n`.
pub fn random_indexes(n: usize, k: usize, seed: u64) -> Vec<usize> {
    assert!(k <= n, "cannot pick {k} distinct indices out of {n}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    index::sample(&mut rng, n, k).into_vec()
}
