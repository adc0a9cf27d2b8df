//! Configuration value objects for the pipeline stages.
//!
//! These are plain Serde-derived carriers with no behavior beyond
//! construction: a run-level [`TrainingPipelineConfig`] fixes the
//! timestamped artifact directory, and the per-stage configs derive their
//! file paths from it. All paths are explicit; nothing is read from the
//! process environment.

use crate::impute::{ImputerParams, Weighting};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default fraction of rows routed to the test split.
pub const DEFAULT_SPLIT_RATIO: f64 = 0.2;
/// Default label column of the source collection.
pub const DEFAULT_TARGET_COLUMN: &str = "Result";
/// Default neighbor count for the KNN imputer.
pub const DEFAULT_N_NEIGHBORS: usize = 3;

const FEATURE_STORE_FILE: &str = "feature_store/records.csv";
const TRAIN_FILE: &str = "ingested/train.csv";
const TEST_FILE: &str = "ingested/test.csv";
const TRANSFORMED_TRAIN_FILE: &str = "transformed/train.mat";
const TRANSFORMED_TEST_FILE: &str = "transformed/test.mat";
const PREPROCESSOR_FILE: &str = "transformed_object/preprocessor.bin";

/// Run-level settings shared by every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPipelineConfig {
    /// Human-readable pipeline name, used in logs.
    pub pipeline_name: String,
    /// This run's artifact directory (`<root>/<timestamp>`).
    pub artifact_dir: PathBuf,
    /// Fixed location where the final preprocessor copy lands for serving.
    pub final_model_dir: PathBuf,
    /// Run timestamp, `YYYYmmdd_HHMMSS` UTC.
    pub timestamp: String,
}

impl TrainingPipelineConfig {
    /// Create a config whose artifact directory is a fresh timestamped
    /// subdirectory of `artifact_root`. Prior runs' artifacts are left in
    /// place, superseded rather than deleted.
    pub fn new(pipeline_name: impl Into<String>, artifact_root: impl AsRef<Path>) -> Self {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let root = artifact_root.as_ref();
        Self {
            pipeline_name: pipeline_name.into(),
            artifact_dir: root.join(&timestamp),
            final_model_dir: root.join("final_model"),
            timestamp,
        }
    }
}

/// Settings for the ingestion stage: where the records come from and
/// where the feature store and splits land.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataIngestionConfig {
    /// Document-store connection URI, passed explicitly.
    pub connection_uri: String,
    pub database_name: String,
    pub collection_name: String,
    pub feature_store_file_path: PathBuf,
    pub training_file_path: PathBuf,
    pub testing_file_path: PathBuf,
    /// Fraction of rows assigned to the test split, in (0, 1).
    pub train_test_split_ratio: f64,
    /// Seed for the split shuffle. `None` draws from entropy, so set it
    /// whenever a reproducible split matters.
    pub seed: Option<u64>,
}

impl DataIngestionConfig {
    pub fn new(
        pipeline: &TrainingPipelineConfig,
        connection_uri: impl Into<String>,
        database_name: impl Into<String>,
        collection_name: impl Into<String>,
    ) -> Self {
        let stage_dir = pipeline.artifact_dir.join("data_ingestion");
        Self {
            connection_uri: connection_uri.into(),
            database_name: database_name.into(),
            collection_name: collection_name.into(),
            feature_store_file_path: stage_dir.join(FEATURE_STORE_FILE),
            training_file_path: stage_dir.join(TRAIN_FILE),
            testing_file_path: stage_dir.join(TEST_FILE),
            train_test_split_ratio: DEFAULT_SPLIT_RATIO,
            seed: None,
        }
    }
}

/// Settings for the transformation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTransformationConfig {
    /// Label column separated from the features before imputation.
    pub target_column: String,
    pub transformed_train_file_path: PathBuf,
    pub transformed_test_file_path: PathBuf,
    /// Where this run's fitted preprocessor is written.
    pub transformed_object_file_path: PathBuf,
    /// Fixed second copy of the preprocessor for the serving stage.
    pub final_preprocessor_file_path: PathBuf,
    pub imputer_params: ImputerParams,
}

impl DataTransformationConfig {
    pub fn new(pipeline: &TrainingPipelineConfig) -> Self {
        let stage_dir = pipeline.artifact_dir.join("data_transformation");
        Self {
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
            transformed_train_file_path: stage_dir.join(TRANSFORMED_TRAIN_FILE),
            transformed_test_file_path: stage_dir.join(TRANSFORMED_TEST_FILE),
            transformed_object_file_path: stage_dir.join(PREPROCESSOR_FILE),
            final_preprocessor_file_path: pipeline.final_model_dir.join("preprocessor.bin"),
            imputer_params: ImputerParams {
                n_neighbors: DEFAULT_N_NEIGHBORS,
                weights: Weighting::Uniform,
            },
        }
    }
}
