//! Data transformation stage: validated splits -> imputed arrays.
//!
//! The stage moves through three phases in order:
//!
//! 1. **Load** - read the validated train/test CSVs back into datasets
//! 2. **Fit** - separate the target column (a schema error if absent in
//!    either table), remap its -1/1 encoding to 0/1, and fit the KNN
//!    imputer on the training features only
//! 3. **Persist** - apply the fitted imputer to both splits, append the
//!    target as the final array column, and write the arrays plus the
//!    fitted preprocessor (twice: into the run's artifact directory and
//!    to the fixed final-model location for the serving stage)
//!
//! The imputer is never re-fit on test data.

use crate::artifact::{DataTransformationArtifact, DataValidationArtifact};
use crate::config::DataTransformationConfig;
use crate::dataset::{Dataset, Field};
use crate::error::{PipelineError, Result};
use crate::impute::{FittedKnnImputer, KnnImputer};
use crate::persist::{save_array, save_object};
use ndarray::{concatenate, Array2, Axis};
use std::path::Path;

/// Transformation stage, consuming the validation artifact.
pub struct DataTransformation {
    validation_artifact: DataValidationArtifact,
    config: DataTransformationConfig,
}

impl DataTransformation {
    pub fn new(
        validation_artifact: DataValidationArtifact,
        config: DataTransformationConfig,
    ) -> Self {
        Self {
            validation_artifact,
            config,
        }
    }

    pub fn config(&self) -> &DataTransformationConfig {
        &self.config
    }

    /// Read one validated split from disk.
    pub fn read_data(path: impl AsRef<Path>) -> Result<Dataset> {
        Dataset::read_csv(path)
    }

    /// Split a dataset into a feature matrix and the 0/1 target vector.
    fn separate_target(&self, mut dataset: Dataset) -> Result<(Array2<f64>, Array2<f64>)> {
        let target = dataset.take_column(&self.config.target_column)?;
        let n = target.len();
        let mut values = Vec::with_capacity(n);
        for (i, cell) in target.iter().enumerate() {
            match cell {
                Field::Missing | Field::Text(_) => {
                    return Err(PipelineError::Schema(format!(
                        "target column '{}' has a non-numeric value in row #{}",
                        self.config.target_column,
                        i + 1
                    )));
                }
                other => {
                    let v = other.as_f64().unwrap_or(f64::NAN);
                    // The source labels are -1/1; downstream consumers
                    // expect 0/1.
                    values.push(if v == -1.0 { 0.0 } else { v });
                }
            }
        }
        let features = dataset.to_matrix()?;
        let target = Array2::from_shape_vec((n, 1), values)
            .map_err(|e| PipelineError::Schema(format!("target shape: {e}")))?;
        Ok((features, target))
    }

    /// Full transformation workflow; returns the artifact of written paths.
    pub fn run(&self) -> Result<DataTransformationArtifact> {
        let train_df = Self::read_data(&self.validation_artifact.valid_train_file_path)?;
        let test_df = Self::read_data(&self.validation_artifact.valid_test_file_path)?;
        tracing::info!(
            train_rows = train_df.n_rows(),
            test_rows = test_df.n_rows(),
            "loaded validated splits"
        );

        let (train_features, train_target) = self.separate_target(train_df)?;
        let (test_features, test_target) = self.separate_target(test_df)?;

        let fitted: FittedKnnImputer =
            KnnImputer::new(self.config.imputer_params).fit(&train_features)?;
        tracing::info!(
            n_neighbors = self.config.imputer_params.n_neighbors,
            features_in = fitted.n_features_in(),
            features_out = fitted.n_features_out(),
            "fitted KNN imputer on training features"
        );
        let train_imputed = fitted.transform(&train_features)?;
        let test_imputed = fitted.transform(&test_features)?;

        let train_arr = concatenate(Axis(1), &[train_imputed.view(), train_target.view()])
            .map_err(|e| PipelineError::Schema(format!("append target column: {e}")))?;
        let test_arr = concatenate(Axis(1), &[test_imputed.view(), test_target.view()])
            .map_err(|e| PipelineError::Schema(format!("append target column: {e}")))?;

        save_array(&self.config.transformed_train_file_path, &train_arr)?;
        save_array(&self.config.transformed_test_file_path, &test_arr)?;
        save_object(&self.config.transformed_object_file_path, &fitted)?;
        // Second copy at a fixed location for reuse outside this run.
        save_object(&self.config.final_preprocessor_file_path, &fitted)?;
        tracing::info!(
            train_shape = ?train_arr.dim(),
            test_shape = ?test_arr.dim(),
            "persisted transformed arrays and preprocessor"
        );

        Ok(DataTransformationArtifact {
            transformed_object_file_path: self.config.transformed_object_file_path.clone(),
            transformed_train_file_path: self.config.transformed_train_file_path.clone(),
            transformed_test_file_path: self.config.transformed_test_file_path.clone(),
        })
    }
}
