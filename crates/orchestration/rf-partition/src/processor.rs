//! Batch processor with per-batch setup amortization.

use rf_dsl::{CompiledProgram, RowTransformer, RuleCache};
use rf_enrichment::{EnvironmentGuard, ExecutionEnvironment};
use rf_error::{BatchError, Result};
use rf_types::{Batch, Record, Schema};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Applies one compiled program to every record of a batch.
///
/// The defining property of this component is that setup cost is O(batches),
/// not O(records): the program is compiled (or fetched from the shared
/// cache) once, a warm-up application forces any lazy paths once, and one
/// enrichment handle serves the whole batch.
///
/// The batch is the unit of atomicity. A failure on any row aborts the
/// whole batch; no partial output is produced.
pub struct PartitionProcessor {
    cache: Arc<RuleCache>,
    environment: Arc<dyn ExecutionEnvironment>,
}

impl PartitionProcessor {
    /// Creates a processor with an explicit cache and environment.
    ///
    /// Both are injected rather than discovered: the cache is owned by the
    /// job context and shared across workers, and the environment decides
    /// whether enrichment handles exist at all.
    pub fn new(cache: Arc<RuleCache>, environment: Arc<dyn ExecutionEnvironment>) -> Self {
        Self { cache, environment }
    }

    /// Processes one batch through the script.
    ///
    /// Sequence: get-or-compile the program, warm up against a placeholder
    /// record, acquire one enrichment handle for the batch's duration, then
    /// transform rows in order, merging each partial result back into its
    /// record. Computed targets that are not schema columns are dropped.
    /// The handle is released on every exit path.
    ///
    /// # Errors
    ///
    /// Script errors before any row is processed; `BatchError::Row` if any
    /// row fails, in which case the whole batch fails.
    pub fn process(&self, batch: Batch, script: &str) -> Result<Batch> {
        let program = self.cache.get_or_compile(script)?;
        let schema = batch.schema();

        debug!(
            rules = program.len(),
            records = batch.len(),
            "Processing batch"
        );

        self.warm_up(&program, &schema);

        let guard = EnvironmentGuard::acquire(self.environment.as_ref());
        let (schema, records) = batch.into_parts();

        let mut output = Vec::with_capacity(records.len());
        for (row, mut record) in records.into_iter().enumerate() {
            let partial = RowTransformer::apply(&record, &program, guard.handle()).map_err(
                |source| BatchError::Row {
                    row,
                    source: Box::new(source),
                },
            )?;

            for (target, value) in partial {
                if record.contains_column(&target) {
                    record.insert(target, value);
                } else {
                    trace!(column = %target, "Target column absent from schema, dropping value");
                }
            }
            output.push(record);
        }

        info!(records = output.len(), "Batch processed");
        Ok(Batch::new(schema, output))
    }

    /// Disposable warm-up application against a placeholder record.
    ///
    /// Forces any lazy compilation paths once per batch instead of on the
    /// first real row. Runs without an enrichment handle so it cannot touch
    /// external systems; any error is discarded.
    fn warm_up(&self, program: &CompiledProgram, schema: &Schema) {
        let placeholder = Record::placeholder(schema);
        if let Err(e) = RowTransformer::apply(&placeholder, program, None) {
            trace!(error = %e, "Warm-up application failed, ignoring");
        }
    }
}
