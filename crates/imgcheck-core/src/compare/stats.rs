//! Statistics over a signed difference array

use super::DiffStats;

/// Compute min, max, arithmetic mean, and population standard deviation in
/// two passes. An empty array yields all zeros.
pub fn diff_stats(deltas: &[f64]) -> DiffStats {
    if deltas.is_empty() {
        return DiffStats {
            min: 0.0,
            max: 0.0,
            mean: 0.0,
            std_dev: 0.0,
        };
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;

    for &delta in deltas {
        min = min.min(delta);
        max = max.max(delta);
        sum += delta;
    }

    let mean = sum / deltas.len() as f64;
    let variance =
        deltas.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / deltas.len() as f64;

    DiffStats {
        min,
        max,
        mean,
        std_dev: variance.sqrt(),
    }
}
