//! Flow analyzers: burn-up, cycle-time and throughput distributions.
//!
//! Every analyzer is a pure function over a slice of [`Span`]s (activities or
//! project spans). Empty input yields an empty table; a span that ends before
//! it starts is reported as [`FlowError::InvalidSpan`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use flow_core::error::{FlowError, Result};
use flow_core::models::{BurnUpRow, DailyThroughput, FlowStatistic, Span};
use flow_core::percentile::frequency_table;
use serde::{Deserialize, Serialize};

// ── Shared sub-computation ────────────────────────────────────────────────────

/// Inclusive date range covered by `items`: earliest start to latest end.
///
/// Returns `Ok(None)` for empty input.
fn date_range<S: Span>(items: &[S]) -> Result<Option<(NaiveDate, NaiveDate)>> {
    let mut range: Option<(NaiveDate, NaiveDate)> = None;
    for item in items {
        let (start, end) = (item.start_date(), item.end_date());
        if start > end {
            return Err(FlowError::InvalidSpan {
                label: item.label(),
                start,
                end,
            });
        }
        range = Some(match range {
            None => (start, end),
            Some((lo, hi)) => (lo.min(start), hi.max(end)),
        });
    }
    Ok(range)
}

/// Number of days in `[start, end]`, both inclusive.
fn days_between(start: NaiveDate, end: NaiveDate) -> usize {
    (end - start).num_days() as usize + 1
}

/// Completions per calendar day over `[min start, max end]`, zero-filled for
/// days without completions.
///
/// This is the series burn-up accumulates and throughput analysis counts.
pub fn daily_throughput<S: Span>(items: &[S]) -> Result<Vec<DailyThroughput>> {
    let Some((first, last)) = date_range(items)? else {
        return Ok(Vec::new());
    };

    let mut completions = vec![0usize; days_between(first, last)];
    for item in items {
        completions[(item.end_date() - first).num_days() as usize] += 1;
    }

    Ok(first
        .iter_days()
        .zip(completions)
        .map(|(date, throughput)| DailyThroughput { date, throughput })
        .collect())
}

// ── Burn-up ───────────────────────────────────────────────────────────────────

/// Burn-up over `[min start, max end]`, one row per day.
///
/// `done` counts items whose end date is on or before the day; `wip` counts
/// items with `start <= day <= end`.
pub fn analyze_burn_up<S: Span>(items: &[S]) -> Result<Vec<BurnUpRow>> {
    let daily = daily_throughput(items)?;
    let Some(first) = daily.first().map(|d| d.date) else {
        return Ok(Vec::new());
    };

    // Range-counting sweep: +1 on the start day, -1 the day after the end.
    let mut delta = vec![0i64; daily.len() + 1];
    for item in items {
        delta[(item.start_date() - first).num_days() as usize] += 1;
        delta[(item.end_date() - first).num_days() as usize + 1] -= 1;
    }

    let mut wip = 0i64;
    let mut done = 0usize;
    Ok(daily
        .iter()
        .zip(delta)
        .map(|(day, change)| {
            wip += change;
            done += day.throughput;
            BurnUpRow {
                date: day.date,
                wip: wip as usize,
                done,
            }
        })
        .collect())
}

/// Headline numbers printed under a burn-up chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnUpSummary {
    /// Calendar days covered by the burn-up, inclusive.
    pub days: u32,
    /// Items completed by the last day.
    pub throughput: usize,
}

impl BurnUpSummary {
    /// `None` for an empty burn-up.
    pub fn from_rows(rows: &[BurnUpRow]) -> Option<Self> {
        let (first, last) = (rows.first()?, rows.last()?);
        Some(Self {
            days: flow_core::models::inclusive_days(first.date, last.date),
            throughput: rows.iter().map(|r| r.done).max().unwrap_or(0),
        })
    }
}

/// End points of the "ideal" burn-up line: first day's done to last day's done.
pub fn ideal_burn_up(rows: &[BurnUpRow]) -> Option<[(NaiveDate, usize); 2]> {
    let (first, last) = (rows.first()?, rows.last()?);
    Some([(first.date, first.done), (last.date, last.done)])
}

// ── Distributions ─────────────────────────────────────────────────────────────

/// Frequency table of cycle times, ascending.
pub fn analyze_cycle_times<S: Span>(items: &[S]) -> Result<Vec<FlowStatistic>> {
    date_range(items)?;
    Ok(frequency_table(items.iter().map(|i| i.cycle_time())))
}

/// Frequency table of the daily throughput series: how many days had 0, 1,
/// 2, ... completions. Ascending by throughput.
pub fn analyze_throughput<S: Span>(items: &[S]) -> Result<Vec<FlowStatistic>> {
    let daily = daily_throughput(items)?;
    Ok(frequency_table(daily.iter().map(|d| d.throughput as u32)))
}

/// Cycle times of `items` as a sorted `f64` sample.
pub fn sorted_cycle_times<S: Span>(items: &[S]) -> Vec<f64> {
    let mut sample: Vec<f64> = items.iter().map(|i| i.cycle_time() as f64).collect();
    sample.sort_by(|a, b| a.total_cmp(b));
    sample
}

/// Mapping from end date to completions; days without completions are absent.
pub fn completions_by_date<S: Span>(items: &[S]) -> BTreeMap<NaiveDate, usize> {
    let mut map = BTreeMap::new();
    for item in items {
        *map.entry(item.end_date()).or_default() += 1;
    }
    map
}

// ── Tests ─────────────────────────────────────────────────────────────────────
