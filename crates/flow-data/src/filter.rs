//! Selection of timesheet rows by date range and categorical membership.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use flow_core::error::{FlowError, Result};
use flow_core::models::TimesheetRow;

/// Criteria for [`TimesheetFilter::filter`].
///
/// Every criterion is optional: `None` bounds and empty sets impose no
/// constraint. Dimensions are combined with AND; values within one set with
/// OR. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimesheetFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub clients: BTreeSet<String>,
    pub projects: BTreeSet<String>,
    pub tasks: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl TimesheetFilter {
    /// Filter with no criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inclusive lower bound from an ISO date string.
    pub fn from_date(mut self, date: &str) -> Result<Self> {
        self.start_date = Some(parse_iso_date(date)?);
        Ok(self)
    }

    /// Set the inclusive upper bound from an ISO date string.
    pub fn to_date(mut self, date: &str) -> Result<Self> {
        self.end_date = Some(parse_iso_date(date)?);
        Ok(self)
    }

    pub fn clients<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clients.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn projects<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projects.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn tasks<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tasks.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn categories<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories.extend(values.into_iter().map(Into::into));
        self
    }

    /// `true` when no criterion is set.
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a single row satisfies every criterion.
    pub fn matches(&self, row: &TimesheetRow) -> bool {
        if self.start_date.is_some_and(|start| row.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| row.date > end) {
            return false;
        }
        allowed(&self.clients, &row.client)
            && allowed(&self.projects, &row.project)
            && allowed(&self.tasks, &row.task)
            && allowed(&self.categories, &row.category)
    }

    /// Rows of `timesheet` that satisfy every criterion, in input order.
    pub fn filter(&self, timesheet: &[TimesheetRow]) -> Vec<TimesheetRow> {
        timesheet
            .iter()
            .filter(|row| self.matches(row))
            .cloned()
            .collect()
    }
}

fn allowed(set: &BTreeSet<String>, value: &str) -> bool {
    set.is_empty() || set.contains(value)
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| FlowError::InvalidDate(format!("{s:?} ({e})")))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
