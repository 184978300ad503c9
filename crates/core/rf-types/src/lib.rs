//! Core data model for Rowforge.
//!
//! This crate provides the flat-record data model shared by the transform and
//! orchestration layers:
//! - [`Value`] - nullable scalar cell value
//! - [`Schema`] - ordered, immutable column-name list
//! - [`Record`] - one flat row (column name -> scalar)
//! - [`Batch`] - ordered records sharing one schema; the unit of atomic processing
//! - Configuration types ([`SizerConfig`])

mod config;
mod record;
mod value;

pub use config::SizerConfig;
pub use record::{Batch, Record, Schema};
pub use value::Value;
