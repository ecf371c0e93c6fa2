//! Transmission order planning
//!
//! Small batches go smallest-first. Larger batches run a maximum-subarray
//! scan over negated sizes and keep only the trail of indices at which the
//! running best improved; the sum itself is discarded. That trail can be
//! shorter than the batch, so callers must decide what happens to packets it
//! leaves out (see [`crate::CoveragePolicy`]).

/// Batches up to this size use the stable size sort
pub const SORT_PLAN_LIMIT: usize = 10;

/// Order in which packets of the given sizes are offered to the bucket
///
/// Every returned index is `< sizes.len()`.
pub fn plan(sizes: &[usize]) -> Vec<usize> {
    if sizes.len() <= SORT_PLAN_LIMIT {
        return smallest_first(sizes);
    }

    let trail = improvement_trail(sizes);
    if trail.is_empty() {
        (0..sizes.len()).collect()
    } else {
        trail
    }
}

/// Indices sorted by ascending size, ties kept in original order
pub fn smallest_first(sizes: &[usize]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..sizes.len()).collect();
    // `sort_by_key` is stable
    order.sort_by_key(|&i| sizes[i]);
    order
}

/// Kadane scan over negated sizes, returning the indices where the best sum
/// strictly improved
pub fn improvement_trail(sizes: &[usize]) -> Vec<usize> {
    let mut best: Option<i128> = None;
    let mut running: i128 = 0;
    let mut trail = Vec::new();

    for (i, &size) in sizes.iter().enumerate() {
        let value = -(size as i128);
        running = value.max(running + value);

        if best.is_none_or(|b| running > b) {
            best = Some(running);
            trail.push(i);
        }
    }

    trail
}

/// Indices in `0..len` that `order` never mentions, ascending
pub fn uncovered(order: &[usize], len: usize) -> Vec<usize> {
    let mut seen = vec![false; len];
    for &idx in order {
        if idx < len {
            seen[idx] = true;
        }
    }
    (0..len).filter(|&i| !seen[i]).collect()
}
