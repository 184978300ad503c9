//! Job-scoped shared state.

use crate::PartitionProcessor;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rf_dsl::RuleCache;
use rf_enrichment::ExecutionEnvironment;
use rf_types::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// State shared by every partition worker of one job.
///
/// Owns the program cache explicitly instead of hiding it behind
/// process-wide statics: the context is constructed once per job and passed
/// by shared reference, so all workers converge on the same compiled
/// program and tests get isolated caches for free.
pub struct JobContext {
    job_id: String,
    started_at: DateTime<Utc>,
    cache: Arc<RuleCache>,
    metadata: RwLock<HashMap<String, Value>>,
}

impl JobContext {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self::with_cache(job_id, Arc::new(RuleCache::default()))
    }

    pub fn with_cache(job_id: impl Into<String>, cache: Arc<RuleCache>) -> Self {
        Self {
            job_id: job_id.into(),
            started_at: Utc::now(),
            cache,
            metadata: RwLock::new(HashMap::new()),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The job-scoped program cache.
    pub fn cache(&self) -> Arc<RuleCache> {
        self.cache.clone()
    }

    /// Builds a processor for one partition, wired to this job's cache.
    pub fn processor(&self, environment: Arc<dyn ExecutionEnvironment>) -> PartitionProcessor {
        PartitionProcessor::new(self.cache.clone(), environment)
    }

    pub fn set_metadata(&self, key: impl Into<String>, value: Value) {
        self.metadata.write().insert(key.into(), value);
    }

    pub fn metadata(&self, key: &str) -> Option<Value> {
        self.metadata.read().get(key).cloned()
    }

    pub fn all_metadata(&self) -> HashMap<String, Value> {
        self.metadata.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_roundtrip() {
        let context = JobContext::new("job-42");
        assert_eq!(context.job_id(), "job-42");
        assert_eq!(context.metadata("input_path"), None);

        context.set_metadata("input_path", Value::from("/data/in.csv"));
        context.set_metadata("record_count", Value::Int(1200));
        assert_eq!(
            context.metadata("input_path"),
            Some(Value::from("/data/in.csv"))
        );
        assert_eq!(context.all_metadata().len(), 2);
    }

    #[test]
    fn test_processors_share_job_cache() {
        let context = JobContext::new("job-7");
        let cache = context.cache();

        let script = r#"{"transformations": []}"#;
        let first = cache.get_or_compile(script).unwrap();
        let second = context.cache().get_or_compile(script).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
