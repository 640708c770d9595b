//! Presentation layer for flow metrics.
//!
//! Provides themes, the plain-text report, table and chart views, and the
//! interactive application loop built on top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod report;
pub mod table_view;
pub mod themes;

pub use flow_core as core;
