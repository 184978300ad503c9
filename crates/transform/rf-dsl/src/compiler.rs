//! Script compiler: JSON text -> ordered rule list.

use crate::registry::OperationRegistry;
use crate::rule::{CompiledProgram, Rule};
use rf_error::ScriptError;
use serde_json::Value as JsonValue;
use tracing::debug;

/// Compiles transformation scripts against an operation registry.
///
/// The wire format is a JSON document with a required `transformations`
/// array. Each entry requires `target` and an operation name under
/// `operation` (legacy scripts use `type`), plus operation-specific operand
/// fields. Declaration order is preserved exactly.
pub struct RuleCompiler {
    registry: OperationRegistry,
}

impl RuleCompiler {
    pub fn new(registry: OperationRegistry) -> Self {
        Self { registry }
    }

    /// Compiles a script into an ordered program.
    ///
    /// # Errors
    ///
    /// - [`ScriptError::Parse`] if the text is not valid JSON
    /// - [`ScriptError::MissingTransformations`] if the array is absent
    /// - [`ScriptError::MissingField`] if an entry lacks `target` or an
    ///   operation name
    /// - [`ScriptError::UnsupportedOperation`] for unregistered operations
    pub fn compile(&self, script: &str) -> Result<CompiledProgram, ScriptError> {
        let document: JsonValue =
            serde_json::from_str(script).map_err(|e| ScriptError::Parse(e.to_string()))?;

        let transformations = document
            .get("transformations")
            .and_then(|t| t.as_array())
            .ok_or(ScriptError::MissingTransformations)?;

        let mut rules = Vec::with_capacity(transformations.len());
        for entry in transformations {
            let target = entry
                .get("target")
                .and_then(|t| t.as_str())
                .ok_or(ScriptError::MissingField { field: "target" })?
                .to_string();

            let name = entry
                .get("operation")
                .or_else(|| entry.get("type"))
                .and_then(|o| o.as_str())
                .ok_or(ScriptError::MissingField { field: "operation" })?
                .to_ascii_lowercase();

            let operation = self.registry.parse(&name, entry)?;
            rules.push(Rule { target, operation });
        }

        debug!(rules = rules.len(), "Compiled transformation script");
        Ok(CompiledProgram::new(rules))
    }

    /// Cheap pre-flight check: true exactly when [`RuleCompiler::compile`]
    /// would not fail with an invalid-script error.
    ///
    /// An unknown operation name does not invalidate a script here; that is
    /// a registry concern surfaced by `compile` as `UnsupportedOperation`.
    pub fn validate(&self, script: &str) -> bool {
        match self.compile(script) {
            Ok(_) => true,
            Err(e) => !e.is_invalid_script(),
        }
    }
}

impl Default for RuleCompiler {
    fn default() -> Self {
        Self::new(OperationRegistry::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Operation;

    fn compiler() -> RuleCompiler {
        RuleCompiler::default()
    }

    #[test]
    fn test_compile_preserves_order() {
        let script = r#"{
            "transformations": [
                {"target": "a", "operation": "constant", "value": 1},
                {"target": "b", "operation": "copy", "source": "a"},
                {"target": "c", "operation": "uppercase", "source": "b"}
            ]
        }"#;
        let program = compiler().compile(script).unwrap();
        let targets: Vec<_> = program.rules().iter().map(|r| r.target.as_str()).collect();
        assert_eq!(targets, ["a", "b", "c"]);
    }

    #[test]
    fn test_compile_legacy_type_key() {
        let script = r#"{
            "transformations": [
                {"target": "name", "type": "copy", "source": "full_name"}
            ]
        }"#;
        let program = compiler().compile(script).unwrap();
        assert!(matches!(
            program.rules()[0].operation,
            Operation::Copy { .. }
        ));
    }

    #[test]
    fn test_compile_operation_name_case_insensitive() {
        let script = r#"{
            "transformations": [
                {"target": "name", "operation": "UPPERCASE", "source": "name"}
            ]
        }"#;
        let program = compiler().compile(script).unwrap();
        assert!(matches!(
            program.rules()[0].operation,
            Operation::Uppercase { .. }
        ));
    }

    #[test]
    fn test_compile_rejects_bad_json() {
        let err = compiler().compile("not json {{").unwrap_err();
        assert!(matches!(err, ScriptError::Parse(_)));
    }

    #[test]
    fn test_compile_rejects_missing_transformations() {
        let err = compiler().compile(r#"{"rules": []}"#).unwrap_err();
        assert!(matches!(err, ScriptError::MissingTransformations));

        // Present but not an array is just as invalid
        let err = compiler()
            .compile(r#"{"transformations": "nope"}"#)
            .unwrap_err();
        assert!(matches!(err, ScriptError::MissingTransformations));
    }

    #[test]
    fn test_compile_rejects_missing_target() {
        let script = r#"{"transformations": [{"operation": "copy", "source": "x"}]}"#;
        let err = compiler().compile(script).unwrap_err();
        assert!(matches!(err, ScriptError::MissingField { field: "target" }));
    }

    #[test]
    fn test_compile_rejects_unknown_operation() {
        let script = r#"{"transformations": [{"target": "x", "operation": "reverse"}]}"#;
        let err = compiler().compile(script).unwrap_err();
        assert!(matches!(err, ScriptError::UnsupportedOperation(_)));
    }

    #[test]
    fn test_validate_matches_invalid_script_class() {
        let c = compiler();

        // Valid script
        assert!(c.validate(r#"{"transformations": []}"#));

        // Invalid-script failures
        assert!(!c.validate("not json"));
        assert!(!c.validate(r#"{"no_transformations": true}"#));
        assert!(!c.validate(r#"{"transformations": [{"operation": "copy", "source": "x"}]}"#));
        assert!(!c.validate(r#"{"transformations": [{"target": "x", "operation": "copy"}]}"#));

        // Unknown operation is not an invalid script
        assert!(c.validate(r#"{"transformations": [{"target": "x", "operation": "reverse"}]}"#));
    }

    #[test]
    fn test_compile_empty_transformations() {
        let program = compiler().compile(r#"{"transformations": []}"#).unwrap();
        assert!(program.is_empty());
    }
}
