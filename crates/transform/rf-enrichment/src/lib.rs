//! Enrichment environment for Rowforge transforms.
//!
//! This crate defines the contract between the transformation core and the
//! external systems it may consult during enrichment operations:
//! - [`ExecutionEnvironment`] - acquires/releases batch-scoped handles
//! - [`EnrichmentHandle`] - performs `lookup(kind, key)` calls
//! - [`EnvironmentGuard`] - scoped acquisition with guaranteed release
//! - [`NullEnvironment`] - no-op environment (enrichment passes through)
//! - [`InMemoryEnvironment`] - table-backed fake for tests and local runs

mod environment;
mod memory;

pub use environment::{EnrichmentHandle, EnvironmentGuard, ExecutionEnvironment, NullEnvironment};
pub use memory::InMemoryEnvironment;
