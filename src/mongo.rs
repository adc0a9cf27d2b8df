//! MongoDB-backed [`DocumentSource`] (feature `source-mongodb`).
//!
//! Uses the driver's synchronous API: the pipeline is single-threaded and
//! blocking, and the connection lives for the duration of the ingestion
//! stage. The connection URI is passed explicitly through
//! [`DataIngestionConfig`] rather than read from the environment.
//!
//! [`MongoSource::push_records`] and
//! [`MongoSource::push_records_from_csv`] are the standalone seeding
//! utility (bulk insert of documents or CSV rows into a collection); the
//! core pipeline itself never writes back to the store.

use crate::config::DataIngestionConfig;
use crate::error::{PipelineError, Result};
use crate::source::{Document, DocumentSource};
use mongodb::bson::{self, Bson};
use mongodb::sync::Client;

/// Source over one collection of one MongoDB database.
pub struct MongoSource {
    client: Client,
    database: String,
    collection: String,
}

impl MongoSource {
    /// Connect to the store. A failed connection aborts the run; there is
    /// no retry.
    pub fn connect(
        uri: &str,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .map_err(|e| PipelineError::connection("connect", e))?;
        Ok(Self {
            client,
            database: database.into(),
            collection: collection.into(),
        })
    }

    /// Connect using the URI and names from the ingestion config.
    pub fn from_config(config: &DataIngestionConfig) -> Result<Self> {
        Self::connect(
            &config.connection_uri,
            &config.database_name,
            &config.collection_name,
        )
    }

    /// Seed the configured collection from a CSV file: each row becomes
    /// one document keyed by the header names.
    ///
    /// # Returns
    /// The number of documents inserted.
    pub fn push_records_from_csv(&self, path: impl AsRef<std::path::Path>) -> Result<usize> {
        let dataset = crate::dataset::Dataset::read_csv(path)?;
        self.push_records(&dataset.to_documents())
    }

    /// Bulk-insert documents into the configured collection.
    ///
    /// # Returns
    /// The number of documents inserted.
    pub fn push_records(&self, documents: &[Document]) -> Result<usize> {
        let mut batch = Vec::with_capacity(documents.len());
        for doc in documents {
            let bson_doc = bson::to_document(doc).map_err(|e| {
                PipelineError::connection("encode document for insert", e)
            })?;
            batch.push(bson_doc);
        }
        let coll = self
            .client
            .database(&self.database)
            .collection::<bson::Document>(&self.collection);
        let result = coll
            .insert_many(batch, None)
            .map_err(|e| PipelineError::connection("insert documents", e))?;
        tracing::info!(
            collection = %self.collection,
            inserted = result.inserted_ids.len(),
            "pushed records to document store"
        );
        Ok(result.inserted_ids.len())
    }
}

impl DocumentSource for MongoSource {
    fn fetch_all(&self) -> Result<Vec<Document>> {
        let coll = self
            .client
            .database(&self.database)
            .collection::<bson::Document>(&self.collection);
        let cursor = coll
            .find(None, None)
            .map_err(|e| PipelineError::connection("query collection", e))?;
        let mut out = Vec::new();
        for doc in cursor {
            let doc = doc.map_err(|e| PipelineError::connection("read cursor", e))?;
            match serde_json::Value::from(Bson::Document(doc)) {
                serde_json::Value::Object(map) => out.push(map),
                other => {
                    return Err(PipelineError::Connection {
                        context: format!("expected a document, got {other}"),
                        source: None,
                    })
                }
            }
        }
        Ok(out)
    }
}
