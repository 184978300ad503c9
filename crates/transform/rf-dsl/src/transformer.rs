//! Applies one compiled program to one record.

use crate::rule::{CompiledProgram, Condition, NumericToken, Operation, Rule};
use rf_enrichment::EnrichmentHandle;
use rf_error::BatchError;
use rf_types::{Record, Value};
use std::collections::HashMap;
use tracing::warn;

/// Stateless row transformer.
///
/// Rules execute strictly in program order against the original record; a
/// rule never observes another rule's output within the same pass. The only
/// side effects are enrichment lookups through the optional handle.
pub struct RowTransformer;

impl RowTransformer {
    /// Computes the partial record of target columns and their new values.
    ///
    /// The caller decides which computed targets survive the merge; this
    /// function does not consult the schema.
    ///
    /// # Errors
    ///
    /// [`BatchError::Rule`] if any rule fails to evaluate. Enrichment
    /// failures are not errors: they fall back to the source value.
    pub fn apply(
        record: &Record,
        program: &CompiledProgram,
        handle: Option<&dyn EnrichmentHandle>,
    ) -> Result<HashMap<String, Value>, BatchError> {
        let mut partial = HashMap::with_capacity(program.len());
        for rule in program.rules() {
            let value = evaluate(rule, record, handle)?;
            partial.insert(rule.target.clone(), value);
        }
        Ok(partial)
    }
}

fn evaluate(
    rule: &Rule,
    record: &Record,
    handle: Option<&dyn EnrichmentHandle>,
) -> Result<Value, BatchError> {
    let value = match &rule.operation {
        Operation::Copy { source } => record.get(source).cloned().unwrap_or(Value::Null),

        Operation::Concat { sources } => {
            let mut out = String::new();
            for token in sources {
                if record.contains_column(token) {
                    // Column reference: append its stringified value, or
                    // nothing for null.
                    if let Some(text) = record.get(token).and_then(Value::as_text) {
                        out.push_str(&text);
                    }
                } else {
                    // Literal token (separators, fixed text)
                    out.push_str(token);
                }
            }
            Value::String(out)
        }

        Operation::Uppercase { source } => match record.get(source).and_then(Value::as_text) {
            Some(text) => Value::String(text.to_uppercase()),
            None => Value::Null,
        },

        Operation::Lowercase { source } => match record.get(source).and_then(Value::as_text) {
            Some(text) => Value::String(text.to_lowercase()),
            None => Value::Null,
        },

        Operation::Add { sources } => {
            let mut sum = 0.0;
            for token in sources {
                if let Some(n) = resolve_numeric(token, record) {
                    sum += n;
                }
            }
            Value::from_number(sum)
        }

        Operation::Multiply { sources } => {
            let mut product = 1.0;
            for token in sources {
                if let Some(n) = resolve_numeric(token, record) {
                    product *= n;
                }
            }
            Value::from_number(product)
        }

        Operation::Conditional { condition, source } => {
            let value = record.get(source);
            match condition {
                Condition::NotNull => Value::Bool(value.is_some_and(|v| !v.is_null())),
                Condition::Equals { expected } => {
                    let expected = expected.as_ref().ok_or_else(|| BatchError::Rule {
                        target: rule.target.clone(),
                        message: "'equals' condition is missing 'expected'".to_string(),
                    })?;
                    Value::Bool(
                        value
                            .and_then(Value::as_text)
                            .is_some_and(|text| text == *expected),
                    )
                }
                Condition::Unknown(_) => Value::Bool(false),
            }
        }

        Operation::Constant { value } => value.clone(),

        Operation::Enrich { kind, source } => {
            let source_value = record.get(source).cloned().unwrap_or(Value::Null);
            if source_value.is_null() {
                return Ok(Value::Null);
            }
            match handle {
                None => source_value,
                Some(handle) => match handle.lookup(kind, &source_value) {
                    Ok(enriched) => enriched,
                    Err(e) => {
                        warn!(kind = %kind, error = %e, "Enrichment failed, passing through source value");
                        source_value
                    }
                },
            }
        }
    };
    Ok(value)
}

/// Resolves one arithmetic token: literals pass through, column values are
/// best-effort parsed. Missing columns and unparsable values yield `None`
/// and are skipped by the accumulator.
fn resolve_numeric(token: &NumericToken, record: &Record) -> Option<f64> {
    match token {
        NumericToken::Literal(n) => Some(*n),
        NumericToken::Column(name) => record.get(name).and_then(Value::as_f64),
    }
}
