//! Work-item scoring.

use crate::WorkItemPayload;

/// Fixed number of accumulation rounds per work-item.
pub const SCORE_ITERATIONS: usize = 50;

const ITERATION_WEIGHT: f64 = 0.001;
const PAIR_WEIGHT: f64 = 0.1;

/// Compute the final score of a work-item.
///
/// The eigenvalue sum and the item's own score are accumulated over
/// [`SCORE_ITERATIONS`] linearly weighted rounds, then the absolute product
/// of every adjacent eigenvalue pair is added at a weight of `0.1`.
///
/// Every item costs the same number of rounds. The operation order is part
/// of the output contract; downstream stages compare scores bit-for-bit.
pub fn score(payload: &WorkItemPayload) -> f64 {
    let eigen_sum = payload.eigenvalues.iter().fold(0.0, |acc, v| acc + v);

    let mut base = 0.0;
    for i in 0..SCORE_ITERATIONS {
        base += (payload.score + eigen_sum) * (i + 1) as f64 * ITERATION_WEIGHT;
    }

    let pairs = payload.eigenvalues.iter().zip(payload.eigenvalues.iter().skip(1));
    for (a, b) in pairs {
        base += (a * b).abs() * PAIR_WEIGHT;
    }

    base
}
