use crate::error::KMeansError;
use std::ops::Range;

/// Split `0..n` into `workers` contiguous ranges.
///
/// Sizes differ by at most one; the trailing ranges take the remainder.
/// When `workers > n` the leading ranges are empty.
///
/// # Errors
///
/// Returns [`KMeansError::InvalidWorkers`] if `workers` is 0.
pub fn partition(n: usize, workers: usize) -> Result<Vec<Range<usize>>, KMeansError> {
    if workers == 0 {
        return Err(KMeansError::InvalidWorkers);
    }

    let base = n / workers;
    let remainder = n % workers;
    let first_large = workers - remainder;

    let mut ranges = Vec::with_capacity(workers);
    let mut from = 0;
    for i in 0..workers {
        let len = if i < first_large { base } else { base + 1 };
        ranges.push(from..from + len);
        from += len;
    }
    debug_assert_eq!(from, n);

    Ok(ranges)
}

/// Split `slice` into disjoint mutable pieces matching `ranges`.
///
/// `ranges` must be contiguous from 0 and cover the whole slice.
pub(crate) fn split_by_ranges<'a, T>(
    mut slice: &'a mut [T],
    ranges: &[Range<usize>],
) -> Vec<&'a mut [T]> {
    let mut pieces = Vec::with_capacity(ranges.len());
    for range in ranges {
        let (head, tail) = slice.split_at_mut(range.len());
        pieces.push(head);
        slice = tail;
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(ranges: &[Range<usize>], n: usize) {
        let mut expected = 0;
        for r in ranges {
            assert!(r.start <= r.end);
            assert_eq!(r.start, expected, "ranges must be contiguous");
            expected = r.end;
        }
        assert_eq!(expected, n);
    }

    #[test]
    fn test_even_split() {
        let ranges = partition(100, 4).unwrap();
        assert_eq!(ranges, vec![0..25, 25..50, 50..75, 75..100]);
    }

    #[test]
    fn test_remainder_goes_to_trailing_ranges() {
        let ranges = partition(10, 4).unwrap();
        assert_eq!(ranges, vec![0..2, 2..4, 4..7, 7..10]);
        assert_covers(&ranges, 10);
    }

    #[test]
    fn test_sizes_differ_by_at_most_one() {
        for n in 0..50 {
            for workers in 1..12 {
                let ranges = partition(n, workers).unwrap();
                assert_eq!(ranges.len(), workers);
                assert_covers(&ranges, n);
                let min = ranges.iter().map(|r| r.len()).min().unwrap();
                let max = ranges.iter().map(|r| r.len()).max().unwrap();
                assert!(max - min <= 1, "n={n} workers={workers}");
            }
        }
    }

    #[test]
    fn test_more_workers_than_items() {
        let ranges = partition(3, 8).unwrap();
        assert_eq!(ranges.len(), 8);
        assert_covers(&ranges, 3);
        assert_eq!(ranges.iter().filter(|r| r.is_empty()).count(), 5);
    }

    #[test]
    fn test_single_worker() {
        assert_eq!(partition(17, 1).unwrap(), vec![0..17]);
    }

    #[test]
    fn test_zero_workers() {
        assert_eq!(partition(10, 0), Err(KMeansError::InvalidWorkers));
        assert_eq!(partition(0, 0), Err(KMeansError::InvalidWorkers));
    }

    #[test]
    fn test_split_by_ranges() {
        let mut data: Vec<usize> = (0..10).collect();
        let ranges = partition(10, 3).unwrap();
        let pieces = split_by_ranges(&mut data, &ranges);
        assert_eq!(pieces.len(), 3);
        for (piece, range) in pieces.iter().zip(&ranges) {
            assert_eq!(piece.len(), range.len());
            assert_eq!(piece[0], range.start);
        }
    }
}
