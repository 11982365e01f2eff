//! Shared foundation for the sales pipeline.
//!
//! Holds the error type, the typed table model and aggregate records, date
//! and number helpers, and the command-line / environment settings.

pub mod dates;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{PipelineError, Result};
