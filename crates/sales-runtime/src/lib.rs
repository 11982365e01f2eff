//! Runtime layer for the sales pipeline.
//!
//! Sequences the data-layer stages into one batch run, owns the database
//! handle, and writes the results to files and to the relational store.

pub mod database;
pub mod orchestrator;
pub mod sink;

pub use sales_core as core;
pub use sales_data as data;
