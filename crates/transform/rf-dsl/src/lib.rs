//! Declarative transformation DSL for Rowforge.
//!
//! This crate turns JSON transformation scripts into compiled programs and
//! applies them to records:
//! - [`OperationRegistry`] - operation names -> operand parsers, plus the
//!   enrichment-kind extension point
//! - [`RuleCompiler`] - script text -> ordered [`CompiledProgram`]
//! - [`RuleCache`] - content-addressed, identity-stable program cache shared
//!   by parallel partition workers
//! - [`RowTransformer`] - applies one program to one record
//!
//! # Script format
//!
//! ```json
//! {
//!   "transformations": [
//!     {"target": "full_name", "operation": "concat", "sources": ["first", " ", "last"]},
//!     {"target": "dept", "operation": "uppercase", "source": "dept"},
//!     {"target": "total", "operation": "multiply", "sources": ["price", "qty"]}
//!   ]
//! }
//! ```
//!
//! Rules always read the original input record; within one pass a rule never
//! observes another rule's output. This is a deliberate simplification of
//! the execution model, not an oversight.

mod cache;
mod compiler;
mod registry;
mod rule;
mod transformer;

pub use cache::RuleCache;
pub use compiler::RuleCompiler;
pub use registry::OperationRegistry;
pub use rule::{CompiledProgram, Condition, NumericToken, Operation, Rule};
pub use transformer::RowTransformer;
