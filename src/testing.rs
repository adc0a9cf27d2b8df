//! Pre-built fixture data for tests and demos.

use crate::source::Document;
use serde_json::json;

/// A small phishing-style corpus: ten documents with a store-assigned
/// `_id`, three numeric features (with scattered `"na"` sentinels), and a
/// -1/1 `Result` label.
///
/// # Example
///
/// ```
/// use millrace::testing::sample_documents;
///
/// let docs = sample_documents();
/// assert_eq!(docs.len(), 10);
/// ```
#[must_use]
pub fn sample_documents() -> Vec<Document> {
    let raw = vec![
        json!({"_id": 1,  "having_ip": 1,  "url_length": 54,   "ssl_state": 1,  "Result": -1}),
        json!({"_id": 2,  "having_ip": 0,  "url_length": "na", "ssl_state": 1,  "Result": 1}),
        json!({"_id": 3,  "having_ip": 1,  "url_length": 77,   "ssl_state": 0,  "Result": -1}),
        json!({"_id": 4,  "having_ip": 0,  "url_length": 23,   "ssl_state": 1,  "Result": 1}),
        json!({"_id": 5,  "having_ip": "na", "url_length": 61, "ssl_state": 0,  "Result": -1}),
        json!({"_id": 6,  "having_ip": 1,  "url_length": 48,   "ssl_state": 1,  "Result": 1}),
        json!({"_id": 7,  "having_ip": 0,  "url_length": 35,   "ssl_state": "na", "Result": 1}),
        json!({"_id": 8,  "having_ip": 1,  "url_length": 92,   "ssl_state": 0,  "Result": -1}),
        json!({"_id": 9,  "having_ip": 0,  "url_length": 18,   "ssl_state": 1,  "Result": 1}),
        json!({"_id": 10, "having_ip": 1,  "url_length": 66,   "ssl_state": 0,  "Result": -1}),
    ];
    raw.into_iter()
        .map(|v| v.as_object().cloned().unwrap_or_default())
        .collect()
}
