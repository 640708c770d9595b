use std::collections::BTreeMap;

use crate::models::FlowStatistic;

/// Cumulative probability used as the forecasting heuristic.
pub const FORECAST_THRESHOLD: f64 = 0.85;

// ── Frequency tables ──────────────────────────────────────────────────────────

/// Build a frequency table over `values`, sorted ascending by value.
///
/// `probability` is `count / total`; `cumulative_probability` is the running
/// count divided by `total`, so the last row is exactly `1.0`. Returns an
/// empty table for empty input.
pub fn frequency_table<I>(values: I) -> Vec<FlowStatistic>
where
    I: IntoIterator<Item = u32>,
{
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let total: usize = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut running = 0usize;
    counts
        .into_iter()
        .map(|(value, count)| {
            running += count;
            FlowStatistic {
                value,
                count,
                probability: count as f64 / total as f64,
                cumulative_probability: running as f64 / total as f64,
            }
        })
        .collect()
}

/// Smallest value whose cumulative probability strictly exceeds `threshold`.
///
/// `stats` must be sorted ascending by value, as produced by
/// [`frequency_table`]. Returns `None` when no row exceeds the threshold,
/// which reads as "undetermined".
pub fn percentile_threshold(stats: &[FlowStatistic], threshold: f64) -> Option<u32> {
    stats
        .iter()
        .find(|s| s.cumulative_probability > threshold)
        .map(|s| s.value)
}

// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using standard linear
/// interpolation (the same algorithm used by NumPy's `percentile` function).
///
/// Returns `0.0` for an empty slice.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    let len = sorted_data.len();
    if len == 1 {
        return sorted_data[0];
    }
    let rank = (p / 100.0) * (len as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted_data[lo];
    }
    let frac = rank - lo as f64;
    sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo])
}

// ── Tests ──────────────────────────────────────────────────────────────────────
