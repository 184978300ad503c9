//! Operation registry: name -> operand parser.

use crate::rule::{Condition, NumericToken, Operation};
use rf_error::ScriptError;
use rf_types::Value;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::warn;

type OperationParser = Box<dyn Fn(&JsonValue) -> Result<Operation, ScriptError> + Send + Sync>;

/// Maps operation names to compile-time-known parser closures.
///
/// The operation set is small and closed; the one extension point is
/// [`OperationRegistry::register_enrichment`], which adds a named enrichment
/// kind delegating to the batch's [`rf_enrichment::EnrichmentHandle`].
/// Registries are built once per job and consulted only at compile time, so
/// per-row work never touches this map.
pub struct OperationRegistry {
    parsers: HashMap<String, OperationParser>,
}

impl OperationRegistry {
    /// Creates a registry with all built-in operations plus the stock
    /// enrichment kinds (`enrich_db`, `enrich_redis`, `enrich_grpc`,
    /// `cache_lookup`, `validate_grpc`, `process_autoconfig`).
    pub fn builtin() -> Self {
        let mut registry = Self {
            parsers: HashMap::new(),
        };

        registry.register("copy", |spec| {
            Ok(Operation::Copy {
                source: require_str(spec, "source")?,
            })
        });
        registry.register("concat", |spec| {
            Ok(Operation::Concat {
                sources: require_string_array(spec, "sources")?,
            })
        });
        registry.register("uppercase", |spec| {
            Ok(Operation::Uppercase {
                source: require_str(spec, "source")?,
            })
        });
        registry.register("lowercase", |spec| {
            Ok(Operation::Lowercase {
                source: require_str(spec, "source")?,
            })
        });
        registry.register("add", |spec| {
            Ok(Operation::Add {
                sources: require_numeric_tokens(spec, "sources")?,
            })
        });
        registry.register("multiply", |spec| {
            Ok(Operation::Multiply {
                sources: require_numeric_tokens(spec, "sources")?,
            })
        });
        registry.register("conditional", |spec| {
            let condition = parse_condition(spec)?;
            Ok(Operation::Conditional {
                condition,
                source: require_str(spec, "source")?,
            })
        });
        registry.register("constant", |spec| {
            let raw = spec
                .get("value")
                .ok_or(ScriptError::MissingField { field: "value" })?;
            let value = Value::from_json_scalar(raw).ok_or_else(|| ScriptError::InvalidField {
                field: "value",
                message: "must be a scalar".to_string(),
            })?;
            Ok(Operation::Constant { value })
        });

        for kind in [
            "enrich_db",
            "enrich_redis",
            "enrich_grpc",
            "cache_lookup",
            "validate_grpc",
            "process_autoconfig",
        ] {
            registry.register_enrichment(kind);
        }

        registry
    }

    /// Registers an enrichment operation name. Scripts using `kind` as an
    /// operation compile to a handle lookup under the same kind string.
    pub fn register_enrichment(&mut self, kind: &str) {
        let kind_owned = kind.to_string();
        self.register_boxed(
            kind,
            Box::new(move |spec| {
                Ok(Operation::Enrich {
                    kind: kind_owned.clone(),
                    source: require_str(spec, "source")?,
                })
            }),
        );
    }

    /// Parses the operand fields for a named operation.
    ///
    /// # Errors
    ///
    /// `UnsupportedOperation` if the name is not registered; otherwise
    /// whatever the operand parser reports.
    pub fn parse(&self, name: &str, spec: &JsonValue) -> Result<Operation, ScriptError> {
        let parser = self
            .parsers
            .get(name)
            .ok_or_else(|| ScriptError::UnsupportedOperation(name.to_string()))?;
        parser(spec)
    }

    /// Returns true if the operation name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.parsers.contains_key(name)
    }

    fn register(
        &mut self,
        name: &str,
        parser: impl Fn(&JsonValue) -> Result<Operation, ScriptError> + Send + Sync + 'static,
    ) {
        self.register_boxed(name, Box::new(parser));
    }

    fn register_boxed(&mut self, name: &str, parser: OperationParser) {
        self.parsers.insert(name.to_string(), parser);
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn require_str(spec: &JsonValue, field: &'static str) -> Result<String, ScriptError> {
    spec.get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or(ScriptError::MissingField { field })
}

fn optional_str(spec: &JsonValue, field: &str) -> Option<String> {
    spec.get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn require_array<'a>(
    spec: &'a JsonValue,
    field: &'static str,
) -> Result<&'a Vec<JsonValue>, ScriptError> {
    spec.get(field)
        .and_then(|v| v.as_array())
        .ok_or(ScriptError::MissingField { field })
}

fn require_string_array(spec: &JsonValue, field: &'static str) -> Result<Vec<String>, ScriptError> {
    require_array(spec, field)?
        .iter()
        .map(|token| {
            // Non-string tokens (numbers, booleans) participate by their
            // JSON text form, matching the wire format's loose typing.
            match token {
                JsonValue::String(s) => Ok(s.clone()),
                other => Value::from_json_scalar(other)
                    .and_then(|v| v.as_text())
                    .ok_or_else(|| ScriptError::InvalidField {
                        field,
                        message: "tokens must be scalars".to_string(),
                    }),
            }
        })
        .collect()
}

fn require_numeric_tokens(
    spec: &JsonValue,
    field: &'static str,
) -> Result<Vec<NumericToken>, ScriptError> {
    require_array(spec, field)?
        .iter()
        .map(|token| match token {
            JsonValue::Number(n) => {
                let literal = n.as_f64().ok_or_else(|| ScriptError::InvalidField {
                    field,
                    message: format!("number {n} is not representable"),
                })?;
                Ok(NumericToken::Literal(literal))
            }
            JsonValue::String(s) => Ok(NumericToken::Column(s.clone())),
            other => Err(ScriptError::InvalidField {
                field,
                message: format!("token {other} must be a number or column name"),
            }),
        })
        .collect()
}

fn parse_condition(spec: &JsonValue) -> Result<Condition, ScriptError> {
    let kind = require_str(spec, "condition")?;
    Ok(match kind.as_str() {
        "not_null" => Condition::NotNull,
        "equals" => Condition::Equals {
            expected: optional_str(spec, "expected"),
        },
        other => {
            // Permissive default: unknown condition kinds evaluate to false
            // at runtime instead of failing compilation.
            warn!(condition = %other, "Unrecognized condition kind, rule will evaluate to false");
            Condition::Unknown(other.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_names_registered() {
        let registry = OperationRegistry::builtin();
        for name in [
            "copy",
            "concat",
            "uppercase",
            "lowercase",
            "add",
            "multiply",
            "conditional",
            "constant",
            "enrich_db",
            "enrich_redis",
            "enrich_grpc",
            "cache_lookup",
            "validate_grpc",
            "process_autoconfig",
        ] {
            assert!(registry.contains(name), "missing builtin {name}");
        }
        assert!(!registry.contains("reverse"));
    }

    #[test]
    fn test_parse_copy_requires_source() {
        let registry = OperationRegistry::builtin();
        let parsed = registry.parse("copy", &json!({"source": "id"})).unwrap();
        assert_eq!(
            parsed,
            Operation::Copy {
                source: "id".to_string()
            }
        );

        let err = registry.parse("copy", &json!({})).unwrap_err();
        assert!(matches!(err, ScriptError::MissingField { field: "source" }));
    }

    #[test]
    fn test_parse_unknown_operation() {
        let registry = OperationRegistry::builtin();
        let err = registry.parse("reverse", &json!({})).unwrap_err();
        assert!(matches!(err, ScriptError::UnsupportedOperation(name) if name == "reverse"));
    }

    #[test]
    fn test_parse_numeric_tokens() {
        let registry = OperationRegistry::builtin();
        let parsed = registry
            .parse("add", &json!({"sources": ["price", 2.5, -1]}))
            .unwrap();
        assert_eq!(
            parsed,
            Operation::Add {
                sources: vec![
                    NumericToken::Column("price".to_string()),
                    NumericToken::Literal(2.5),
                    NumericToken::Literal(-1.0),
                ]
            }
        );
    }

    #[test]
    fn test_parse_conditional_unknown_kind_is_permissive() {
        let registry = OperationRegistry::builtin();
        let parsed = registry
            .parse(
                "conditional",
                &json!({"condition": "greater_than", "source": "age"}),
            )
            .unwrap();
        assert_eq!(
            parsed,
            Operation::Conditional {
                condition: Condition::Unknown("greater_than".to_string()),
                source: "age".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_constant_rejects_non_scalar() {
        let registry = OperationRegistry::builtin();
        let err = registry
            .parse("constant", &json!({"value": [1, 2]}))
            .unwrap_err();
        assert!(matches!(err, ScriptError::InvalidField { field: "value", .. }));
    }

    #[test]
    fn test_stock_enrichment_kinds_parse_as_enrich() {
        let registry = OperationRegistry::builtin();
        for kind in ["validate_grpc", "process_autoconfig"] {
            let parsed = registry.parse(kind, &json!({"source": "id"})).unwrap();
            assert_eq!(
                parsed,
                Operation::Enrich {
                    kind: kind.to_string(),
                    source: "id".to_string(),
                }
            );
        }
    }

    #[test]
    fn test_register_custom_enrichment() {
        let mut registry = OperationRegistry::builtin();
        registry.register_enrichment("geo_ip");
        let parsed = registry
            .parse("geo_ip", &json!({"source": "client_ip"}))
            .unwrap();
        assert_eq!(
            parsed,
            Operation::Enrich {
                kind: "geo_ip".to_string(),
                source: "client_ip".to_string(),
            }
        );
    }
}
