//! Artifact records handed between pipeline stages.
//!
//! An artifact is an immutable record of the file paths one stage produced
//! and the next stage consumes. It carries no data itself; the files on
//! disk are the real hand-off. Each run produces fresh artifacts in its
//! own timestamped directory and never mutates earlier ones.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output of the ingestion stage: the persisted train/test splits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataIngestionArtifact {
    pub train_file_path: PathBuf,
    pub test_file_path: PathBuf,
}

/// Input of the transformation stage: the validated splits.
///
/// The validation stage itself is outside this crate, so
/// [`DataValidationArtifact::from_ingestion`] passes the ingested splits
/// through unchanged with `validation_status` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataValidationArtifact {
    pub validation_status: bool,
    pub valid_train_file_path: PathBuf,
    pub valid_test_file_path: PathBuf,
}

impl DataValidationArtifact {
    pub fn from_ingestion(artifact: &DataIngestionArtifact) -> Self {
        Self {
            validation_status: true,
            valid_train_file_path: artifact.train_file_path.clone(),
            valid_test_file_path: artifact.test_file_path.clone(),
        }
    }
}

/// Output of the transformation stage: the imputed arrays and the fitted
/// preprocessor location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTransformationArtifact {
    pub transformed_object_file_path: PathBuf,
    pub transformed_train_file_path: PathBuf,
    pub transformed_test_file_path: PathBuf,
}
