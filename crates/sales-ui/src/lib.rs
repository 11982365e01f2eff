//! Terminal charts for the sales pipeline.
//!
//! Provides themes, the monthly line chart and category bar chart, and the
//! blocking dashboard loop built on top of [`ratatui`].

pub mod app;
pub mod charts;
pub mod themes;

pub use sales_core as core;
