//! Compiled rule representation.

use rf_types::Value;

/// One token of an arithmetic operand list.
///
/// A JSON number in the script is a literal; a string names a column whose
/// value is parsed best-effort at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericToken {
    /// Literal number from the script
    Literal(f64),
    /// Column reference, resolved per row
    Column(String),
}

/// Condition kinds for the `conditional` operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// True iff the source value is non-null
    NotNull,
    /// Stringified equality against an expected value.
    ///
    /// `expected` is optional at compile time; evaluating `equals` without
    /// it is a row-processing error.
    Equals { expected: Option<String> },
    /// Unrecognized condition kind; evaluates to false
    Unknown(String),
}

/// A single transformation operation with its operands.
///
/// Represented as a tagged enum so per-row dispatch is a plain `match`,
/// with no dynamic dispatch on the hot path.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Value at the source column, null if absent
    Copy { source: String },
    /// Append stringified column values and literal tokens into one string
    Concat { sources: Vec<String> },
    /// Stringify then upper-case; null stays null
    Uppercase { source: String },
    /// Stringify then lower-case; null stays null
    Lowercase { source: String },
    /// Sum of numeric tokens; integral results emit as integers
    Add { sources: Vec<NumericToken> },
    /// Product of numeric tokens; integral results emit as integers
    Multiply { sources: Vec<NumericToken> },
    /// Boolean condition over one source column
    Conditional { condition: Condition, source: String },
    /// Literal value regardless of record contents
    Constant { value: Value },
    /// Pluggable external lookup; any failure falls back to the source value
    Enrich { kind: String, source: String },
}

/// One declarative instruction: compute a value for `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub target: String,
    pub operation: Operation,
}

/// Parsed, ordered list of rules derived from one script.
///
/// Immutable after compilation and safe to share read-only across
/// concurrent partition workers. Rules always read the original input
/// record: a rule never observes another rule's output within one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledProgram {
    rules: Vec<Rule>,
}

impl CompiledProgram {
    pub(crate) fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
