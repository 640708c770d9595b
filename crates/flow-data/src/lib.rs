//! Data layer for flow metrics.
//!
//! Reads activity-log CSV files, aggregates them into daily timesheets and
//! activities, runs the flow analyzers and writes tabular exports.

pub mod aggregator;
pub mod analysis;
pub mod analyzer;
pub mod export;
pub mod filter;
pub mod reader;

pub use flow_core as core;
