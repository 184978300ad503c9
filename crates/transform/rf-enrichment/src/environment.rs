//! Execution environment contract and scoped handle acquisition.

use rf_error::EnrichmentError;
use rf_types::Value;
use tracing::trace;

/// A batch-scoped handle to external enrichment sources.
///
/// Handles are acquired once per batch, treated as shared-read-only for the
/// batch's duration, and released exactly once. A `lookup` call may block on
/// synchronous I/O; implementors own any deadline/timeout policy, since the
/// core does not impose one.
pub trait EnrichmentHandle: Send + Sync {
    /// Looks up an enrichment value for `key` in the source identified by
    /// `kind` (e.g. `enrich_db`, `enrich_redis`).
    ///
    /// # Errors
    ///
    /// Any error is non-fatal to the caller: the row transformer logs it and
    /// falls back to the original source value.
    fn lookup(&self, kind: &str, key: &Value) -> Result<Value, EnrichmentError>;
}

/// Supplier of enrichment handles.
///
/// The core functions correctly when [`ExecutionEnvironment::acquire`]
/// returns `None`: enrichment operations then always pass the source value
/// through unchanged.
pub trait ExecutionEnvironment: Send + Sync {
    /// Acquires a handle for one batch, or `None` if no enrichment backend
    /// is available.
    fn acquire(&self) -> Option<Box<dyn EnrichmentHandle>>;

    /// Releases a previously acquired handle. Called exactly once per
    /// acquired handle, on every exit path.
    fn release(&self, handle: Box<dyn EnrichmentHandle>);
}

/// Scoped handle acquisition with guaranteed release.
///
/// Dropping the guard releases the handle, so success, error, and early
/// return paths all release exactly once.
pub struct EnvironmentGuard<'a> {
    environment: &'a dyn ExecutionEnvironment,
    handle: Option<Box<dyn EnrichmentHandle>>,
}

impl<'a> EnvironmentGuard<'a> {
    /// Acquires a handle from the environment for the current scope.
    pub fn acquire(environment: &'a dyn ExecutionEnvironment) -> Self {
        let handle = environment.acquire();
        trace!(acquired = handle.is_some(), "Acquired enrichment handle");
        Self {
            environment,
            handle,
        }
    }

    /// The held handle, if the environment provided one.
    pub fn handle(&self) -> Option<&dyn EnrichmentHandle> {
        self.handle.as_deref()
    }
}

impl Drop for EnvironmentGuard<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.environment.release(handle);
        }
    }
}

/// Environment with no enrichment backends.
///
/// `acquire` always returns `None`, so enrichment operations pass through.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEnvironment;

impl ExecutionEnvironment for NullEnvironment {
    fn acquire(&self) -> Option<Box<dyn EnrichmentHandle>> {
        None
    }

    fn release(&self, _handle: Box<dyn EnrichmentHandle>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_environment_acquires_nothing() {
        let environment = NullEnvironment;
        let guard = EnvironmentGuard::acquire(&environment);
        assert!(guard.handle().is_none());
    }
}
