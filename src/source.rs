//! Record sources and document normalization.
//!
//! A [`DocumentSource`] yields schema-free documents (JSON maps) from some
//! backing store; [`normalize`] turns a batch of documents into a
//! [`Dataset`] the rest of the pipeline can work with:
//!
//! - the store's internal identifier field is dropped
//! - the literal sentinel `"na"` becomes the canonical missing marker
//! - JSON `null` and absent keys become the missing marker
//! - numbers map to `Int`/`Float`, everything else to `Text`
//!
//! [`MemorySource`] is the in-memory implementation used by tests and
//! demos; the MongoDB-backed source lives in [`crate::mongo`] behind the
//! `source-mongodb` feature.

use crate::dataset::{Dataset, Field};
use crate::error::Result;
use serde_json::Value;

/// The identifier field document stores attach to every record.
pub const ID_FIELD: &str = "_id";

/// Sentinel token sources use for a missing value.
const NA_TOKEN: &str = "na";

/// A schema-free record as pulled from a document store.
pub type Document = serde_json::Map<String, Value>;

/// Anything that can hand over the full contents of one collection.
///
/// A single failed fetch aborts the run; implementations do not retry.
pub trait DocumentSource {
    /// Pull every document in the configured collection.
    fn fetch_all(&self) -> Result<Vec<Document>>;
}

/// In-memory source over a fixed set of documents.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Vec<Document>,
}

impl MemorySource {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

impl DocumentSource for MemorySource {
    fn fetch_all(&self) -> Result<Vec<Document>> {
        Ok(self.documents.clone())
    }
}

/// Convert a batch of documents into a [`Dataset`].
///
/// Columns are the union of all document keys in first-seen order, minus
/// `id_field`. A key absent from a document yields a missing cell, so the
/// resulting table is rectangular even over ragged input.
pub fn normalize(documents: &[Document], id_field: &str) -> Result<Dataset> {
    let mut columns: Vec<String> = Vec::new();
    for doc in documents {
        for key in doc.keys() {
            if key != id_field && !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    let mut ds = Dataset::new(columns.clone());
    for doc in documents {
        let row = columns
            .iter()
            .map(|col| doc.get(col).map_or(Field::Missing, json_to_field))
            .collect();
        ds.push_row(row)?;
    }
    Ok(ds)
}

fn json_to_field(value: &Value) -> Field {
    match value {
        Value::Null => Field::Missing,
        Value::String(s) if s == NA_TOKEN => Field::Missing,
        Value::String(s) => Field::Text(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Field::Int(i)
            } else {
                Field::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::Bool(b) => Field::Int(i64::from(*b)),
        // Nested values don't belong in a tabular record; keep them as text.
        other => Field::Text(other.to_string()),
    }
}
