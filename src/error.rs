//! Error taxonomy for the pipeline.
//!
//! Every stage reports failures through [`PipelineError`], which keeps a
//! small set of explicit variants instead of a single catch-all wrapper:
//!
//! - [`PipelineError::Connection`] - the document store is unreachable or
//!   the query failed
//! - [`PipelineError::Schema`] - the data does not have the shape a stage
//!   requires (missing target column, non-numeric feature cell, column
//!   count mismatch, out-of-range split ratio)
//! - [`PipelineError::Io`] - file-system failures, annotated with the path
//! - [`PipelineError::Codec`] - (de)serialization failures for persisted
//!   objects and arrays
//!
//! Any stage error aborts the whole run; there are no retries and no
//! partial-success semantics.

use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Uniform error surface of the pipeline, one variant per failure class.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The document store could not be reached or the query failed.
    #[error("document store: {context}")]
    Connection {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The data does not match the shape a stage expects.
    #[error("schema: {0}")]
    Schema(String),

    /// A file-system operation failed.
    #[error("io: {context} ({path})", path = .path.display())]
    Io {
        context: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV row could not be read or written.
    #[error("csv: {context} ({path})", path = .path.display())]
    Csv {
        context: String,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A persisted object or array failed to encode or decode.
    #[error("codec: {context}")]
    Codec {
        context: String,
        #[source]
        source: postcard::Error,
    },
}

impl PipelineError {
    /// Build a [`PipelineError::Connection`] from any source error.
    pub fn connection(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Build a [`PipelineError::Io`] annotated with the path it touched.
    pub fn io(context: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            path: path.into(),
            source,
        }
    }

    /// Build a [`PipelineError::Csv`] annotated with the path it touched.
    pub fn csv(context: impl Into<String>, path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            context: context.into(),
            path: path.into(),
            source,
        }
    }

    /// Build a [`PipelineError::Codec`].
    pub fn codec(context: impl Into<String>, source: postcard::Error) -> Self {
        Self::Codec {
            context: context.into(),
            source,
        }
    }
}
