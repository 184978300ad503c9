//! In-memory enrichment environment.

use crate::{EnrichmentHandle, ExecutionEnvironment};
use rf_error::EnrichmentError;
use rf_types::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Table-backed enrichment environment.
///
/// Holds named lookup tables (kind -> key -> value) and hands out handles
/// that resolve against them. Tracks acquire/release counts so tests can
/// assert the exactly-once release invariant.
#[derive(Debug, Default)]
pub struct InMemoryEnvironment {
    tables: Arc<HashMap<String, HashMap<String, Value>>>,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl InMemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a lookup table for an enrichment kind.
    pub fn with_table<I, K>(mut self, kind: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let tables = Arc::make_mut(&mut self.tables);
        tables.insert(
            kind.into(),
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        );
        self
    }

    /// Number of handles acquired so far.
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    /// Number of handles released so far.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl ExecutionEnvironment for InMemoryEnvironment {
    fn acquire(&self) -> Option<Box<dyn EnrichmentHandle>> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Some(Box::new(MemoryHandle {
            tables: self.tables.clone(),
        }))
    }

    fn release(&self, _handle: Box<dyn EnrichmentHandle>) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

struct MemoryHandle {
    tables: Arc<HashMap<String, HashMap<String, Value>>>,
}

impl EnrichmentHandle for MemoryHandle {
    fn lookup(&self, kind: &str, key: &Value) -> Result<Value, EnrichmentError> {
        let table = self
            .tables
            .get(kind)
            .ok_or_else(|| EnrichmentError::UnknownKind(kind.to_string()))?;

        let key_text = key
            .as_text()
            .ok_or_else(|| EnrichmentError::Lookup("null lookup key".to_string()))?;

        table
            .get(&key_text)
            .cloned()
            .ok_or_else(|| EnrichmentError::KeyNotFound {
                kind: kind.to_string(),
                key: key_text,
            })
    }
}
