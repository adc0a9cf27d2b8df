//! # Millrace
//!
//! A **training-data preparation pipeline** for binary classifiers.
//! Millrace pulls records from a document database, materializes them as a
//! CSV feature store, splits train/test sets, imputes missing values with
//! a k-nearest-neighbors imputer, and persists the transformed arrays
//! plus the fitted preprocessor for a downstream model-training stage.
//!
//! ## Key Features
//!
//! - **Document-store ingestion** - pull a whole collection, strip the
//!   store's `_id` field, normalize `"na"` sentinels to a missing marker
//! - **Durable feature store** - the full dataset is persisted as CSV
//!   before any split or transform
//! - **Randomized train/test split** - configurable ratio, optional seed
//!   for reproducible partitions
//! - **Leak-free imputation** - the KNN imputer is fit on training
//!   features only and applied to both splits
//! - **Immutable artifacts** - stages hand off file paths, never shared
//!   state; each run writes into its own timestamped directory
//! - **Crash-safe writes** - every output file is staged and renamed into
//!   place, so interrupted runs never leave partial artifacts
//!
//! ## Quick Start
//!
//! ```
//! use millrace::*;
//! use millrace::testing::sample_documents;
//!
//! # fn main() -> Result<()> {
//! # let root = tempfile::tempdir().unwrap();
//! # let root = root.path();
//! let pipeline_config = TrainingPipelineConfig::new("phishing-prep", root);
//! let mut ingestion_config = DataIngestionConfig::new(
//!     &pipeline_config,
//!     "mongodb://localhost:27017",
//!     "phishing",
//!     "records",
//! );
//! ingestion_config.seed = Some(42);
//! let transformation_config = DataTransformationConfig::new(&pipeline_config);
//!
//! // Any DocumentSource works; MemorySource here, MongoSource in production.
//! let source = MemorySource::new(sample_documents());
//! let artifact = TrainingPipeline::new(
//!     pipeline_config,
//!     ingestion_config,
//!     transformation_config,
//!     source,
//! )
//! .run()?;
//!
//! let train = persist::load_array(&artifact.transformed_train_file_path)?;
//! assert!(train.iter().all(|v| !v.is_nan()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline Stages
//!
//! ### Ingestion
//!
//! [`DataIngestion`] fetches every document from a [`DocumentSource`],
//! normalizes the batch into a [`Dataset`], writes the feature store, and
//! splits train/test by the configured ratio. Its output is a
//! [`DataIngestionArtifact`] of the two split paths.
//!
//! ### Transformation
//!
//! [`DataTransformation`] reads the validated splits, separates the
//! target column (remapping its -1/1 labels to 0/1), fits a
//! [`KnnImputer`] on the training features, imputes both splits, appends
//! the target as the final array column, and persists the arrays and the
//! [`FittedKnnImputer`] - once into the run directory, once to a fixed
//! final-model location.
//!
//! ### Execution model
//!
//! Single-threaded, synchronous, blocking: every stage runs to completion
//! before the next begins. Stages communicate only through files named in
//! artifact records. Any failure aborts the run with a
//! [`PipelineError`] naming the failure class and its origin.
//!
//! ## Feature Flags
//!
//! - `source-mongodb` *(default)* - the MongoDB-backed [`DocumentSource`]

pub mod artifact;
pub mod config;
pub mod dataset;
pub mod error;
pub mod impute;
pub mod ingestion;
pub mod persist;
pub mod pipeline;
pub mod source;
pub mod testing;
pub mod transform;

#[cfg(feature = "source-mongodb")]
pub mod mongo;

pub use artifact::{DataIngestionArtifact, DataTransformationArtifact, DataValidationArtifact};
pub use config::{DataIngestionConfig, DataTransformationConfig, TrainingPipelineConfig};
pub use dataset::{Dataset, Field};
pub use error::{PipelineError, Result};
pub use impute::{FittedKnnImputer, ImputerParams, KnnImputer, Weighting};
pub use ingestion::DataIngestion;
pub use pipeline::TrainingPipeline;
pub use source::{Document, DocumentSource, MemorySource};
pub use transform::DataTransformation;

#[cfg(feature = "source-mongodb")]
pub use mongo::MongoSource;
