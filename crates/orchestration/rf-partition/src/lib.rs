//! Per-partition batch processing for Rowforge.
//!
//! This crate owns the orchestration layer of the engine:
//! - [`PartitionProcessor`] - applies one compiled program to a whole batch
//!   with setup amortized once per batch, not per row
//! - [`PartitionSizer`] - pure heuristic mapping record counts to
//!   input-partition and output-unit counts
//! - [`JobContext`] - job-scoped state (program cache, metadata) shared by
//!   reference with every partition worker
//!
//! Processors run independently and in parallel, one per batch, sharing no
//! mutable state except the [`rf_dsl::RuleCache`]. Within one batch, row
//! processing is strictly sequential: batching exists to amortize setup
//! cost, not to parallelize row work.

mod context;
mod processor;
mod sizer;

pub use context::JobContext;
pub use processor::PartitionProcessor;
pub use sizer::PartitionSizer;
