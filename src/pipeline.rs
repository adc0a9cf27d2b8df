//! Top-level orchestration of a training-data preparation run.
//!
//! [`TrainingPipeline::run`] executes the stages strictly in sequence:
//! ingestion (fetch, feature store, split), validation passthrough, then
//! transformation (impute, persist arrays and preprocessor). The first
//! stage error aborts the run and propagates to the caller, which owns
//! logging of the outcome and exit-status reporting.

use crate::artifact::{DataTransformationArtifact, DataValidationArtifact};
use crate::config::{DataIngestionConfig, DataTransformationConfig, TrainingPipelineConfig};
use crate::error::Result;
use crate::ingestion::DataIngestion;
use crate::source::DocumentSource;
use crate::transform::DataTransformation;

/// One pipeline run over any document source.
pub struct TrainingPipeline<S> {
    pipeline_config: TrainingPipelineConfig,
    ingestion_config: DataIngestionConfig,
    transformation_config: DataTransformationConfig,
    source: S,
}

impl<S: DocumentSource> TrainingPipeline<S> {
    pub fn new(
        pipeline_config: TrainingPipelineConfig,
        ingestion_config: DataIngestionConfig,
        transformation_config: DataTransformationConfig,
        source: S,
    ) -> Self {
        Self {
            pipeline_config,
            ingestion_config,
            transformation_config,
            source,
        }
    }

    /// Run ingestion and transformation back to back, returning the final
    /// artifact. Consumes the pipeline; artifacts of this run land under
    /// the config's timestamped directory and supersede earlier runs.
    pub fn run(self) -> Result<DataTransformationArtifact> {
        tracing::info!(
            pipeline = %self.pipeline_config.pipeline_name,
            artifact_dir = %self.pipeline_config.artifact_dir.display(),
            "starting training-data preparation run"
        );
        let ingestion_artifact =
            DataIngestion::new(self.ingestion_config, self.source).run()?;
        let validation_artifact = DataValidationArtifact::from_ingestion(&ingestion_artifact);
        let artifact =
            DataTransformation::new(validation_artifact, self.transformation_config).run()?;
        tracing::info!(
            preprocessor = %artifact.transformed_object_file_path.display(),
            "run complete"
        );
        Ok(artifact)
    }
}

#[cfg(feature = "source-mongodb")]
impl TrainingPipeline<crate::mongo::MongoSource> {
    /// Build a MongoDB-backed pipeline from its configs alone.
    pub fn connect_mongo(
        pipeline_config: TrainingPipelineConfig,
        ingestion_config: DataIngestionConfig,
        transformation_config: DataTransformationConfig,
    ) -> Result<Self> {
        let source = crate::mongo::MongoSource::from_config(&ingestion_config)?;
        Ok(Self::new(
            pipeline_config,
            ingestion_config,
            transformation_config,
            source,
        ))
    }
}
