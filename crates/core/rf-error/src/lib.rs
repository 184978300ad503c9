//! Error types for Rowforge.
//!
//! This crate provides:
//! - [`RfError`] - Top-level error enum for the transformation engine
//! - Domain-specific errors ([`ScriptError`], [`EnrichmentError`], [`BatchError`])
//! - The fatal/non-fatal split the engine relies on: script errors are raised
//!   before any row processing, enrichment errors degrade to pass-through and
//!   are logged rather than propagated, and a row error aborts its whole batch.

use thiserror::Error;

/// Top-level error type for Rowforge.
#[derive(Error, Debug)]
pub enum RfError {
    /// Script compilation/validation errors
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// Batch processing errors
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors raised while compiling a transformation script.
///
/// Every variant except [`ScriptError::UnsupportedOperation`] is an
/// invalid-script failure: the document itself is malformed or missing a
/// required field. `UnsupportedOperation` means the document parsed fine but
/// names an operation the registry does not know.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The script is not valid JSON
    #[error("Script parse failed: {0}")]
    Parse(String),

    /// The required "transformations" array is missing or not an array
    #[error("Script is missing the 'transformations' array")]
    MissingTransformations,

    /// A transformation entry lacks a required field
    #[error("Transformation entry is missing required field '{field}'")]
    MissingField { field: &'static str },

    /// A transformation entry holds a field of the wrong shape
    #[error("Transformation field '{field}' is invalid: {message}")]
    InvalidField { field: &'static str, message: String },

    /// The operation name is not registered
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl ScriptError {
    /// True for the invalid-script class of failures (malformed document,
    /// missing required fields). False for `UnsupportedOperation`, which is
    /// a registry miss on a structurally valid script.
    pub fn is_invalid_script(&self) -> bool {
        !matches!(self, Self::UnsupportedOperation(_))
    }
}

/// Errors raised by enrichment lookups.
///
/// These are never fatal: the row transformer logs them and falls back to the
/// original source value.
#[derive(Error, Debug)]
pub enum EnrichmentError {
    /// No table/backend registered for this enrichment kind
    #[error("No enrichment source for kind '{0}'")]
    UnknownKind(String),

    /// The key was not found in the enrichment source
    #[error("Key '{key}' not found in enrichment source '{kind}'")]
    KeyNotFound { kind: String, key: String },

    /// The lookup call itself failed (connection, timeout, bad response)
    #[error("Enrichment lookup failed: {0}")]
    Lookup(String),
}

/// Errors raised while applying a compiled program to a batch.
#[derive(Error, Debug)]
pub enum BatchError {
    /// A single rule failed to evaluate
    #[error("Rule for column '{target}' failed: {message}")]
    Rule { target: String, message: String },

    /// A row failed; the whole batch is aborted
    #[error("Row {row} failed: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<BatchError>,
    },
}

/// Result type alias using RfError.
pub type Result<T> = std::result::Result<T, RfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_script_classification() {
        assert!(ScriptError::Parse("bad json".to_string()).is_invalid_script());
        assert!(ScriptError::MissingTransformations.is_invalid_script());
        assert!(ScriptError::MissingField { field: "target" }.is_invalid_script());
        assert!(!ScriptError::UnsupportedOperation("reverse".to_string()).is_invalid_script());
    }

    #[test]
    fn test_error_display() {
        let error = RfError::Script(ScriptError::UnsupportedOperation("reverse".to_string()));
        assert!(error.to_string().contains("Unsupported operation: reverse"));

        let error = BatchError::Row {
            row: 42,
            source: Box::new(BatchError::Rule {
                target: "status".to_string(),
                message: "missing 'expected'".to_string(),
            }),
        };
        assert!(error.to_string().contains("Row 42"));
    }

    #[test]
    fn test_enrichment_error_display() {
        let error = EnrichmentError::KeyNotFound {
            kind: "enrich_db".to_string(),
            key: "ABC-1".to_string(),
        };
        assert!(error.to_string().contains("ABC-1"));
        assert!(error.to_string().contains("enrich_db"));
    }
}
