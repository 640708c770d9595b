//! Core types for flow-metrics.
//!
//! Holds the data model shared by every layer (log records, timesheet rows,
//! activities and the flow statistics derived from them), the unified error
//! type, ISO-8601 parsing helpers, percentile lookups, number formatting and
//! the command-line settings.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod percentile;
pub mod settings;
