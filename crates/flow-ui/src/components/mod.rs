//! Small line-level building blocks shared by the views.

pub mod header;
pub mod probability_bar;
