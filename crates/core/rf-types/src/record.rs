//! Schema, record, and batch types.

use crate::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered, immutable list of column names shared by every record in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Creates a schema from an ordered column list.
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Column names in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns true if the schema declares this column.
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<const N: usize> From<[&str; N]> for Schema {
    fn from(columns: [&str; N]) -> Self {
        Self::new(columns.iter().map(|c| c.to_string()).collect())
    }
}

/// One flat row: column name -> scalar value.
///
/// Records in a batch carry an entry for every schema column; a missing cell
/// is represented as [`Value::Null`], not an absent key. Token-as-column
/// resolution in the transform layer checks the record's column set, so a
/// properly built record resolves exactly the schema's columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    values: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from column/value pairs.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Builds a placeholder record with every schema column set to an empty
    /// string. Used for the disposable warm-up application before a batch.
    pub fn placeholder(schema: &Schema) -> Self {
        Self {
            values: schema
                .columns()
                .iter()
                .map(|c| (c.clone(), Value::String(String::new())))
                .collect(),
        }
    }

    /// Value at a column, if the column exists in this record.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Returns true if this record carries the column (even with a null value).
    pub fn contains_column(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Sets a column value, inserting the column if absent.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An ordered sequence of records sharing one schema.
///
/// The batch is the unit of atomic processing: a failure on any row fails
/// the whole batch and no partial output is produced.
#[derive(Debug, Clone)]
pub struct Batch {
    schema: Arc<Schema>,
    records: Vec<Record>,
}

impl Batch {
    pub fn new(schema: Arc<Schema>, records: Vec<Record>) -> Self {
        Self { schema, records }
    }

    /// Shared reference to the batch schema.
    pub fn schema(&self) -> Arc<Schema> {
        self.schema.clone()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Decomposes the batch for consumption by a processor.
    pub fn into_parts(self) -> (Arc<Schema>, Vec<Record>) {
        (self.schema, self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
