//! Data layer for the sales pipeline.
//!
//! Loads the delimited input files into typed tables, cleans and enriches
//! them, aggregates revenue by month and by category, and writes tables and
//! aggregates back out as delimited text.

pub mod aggregator;
pub mod cleaner;
pub mod enricher;
pub mod reader;
pub mod writer;

pub use sales_core as core;
