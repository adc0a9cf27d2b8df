//! End-to-end pipeline runs over the in-memory source.

use millrace::persist::{load_array, load_object};
use millrace::testing::sample_documents;
use millrace::*;

fn build(root: &std::path::Path, seed: u64) -> TrainingPipeline<MemorySource> {
    let pipeline_config = TrainingPipelineConfig::new("e2e", root);
    let mut ingestion_config =
        DataIngestionConfig::new(&pipeline_config, "mem://", "phishing", "records");
    ingestion_config.seed = Some(seed);
    let transformation_config = DataTransformationConfig::new(&pipeline_config);
    TrainingPipeline::new(
        pipeline_config,
        ingestion_config,
        transformation_config,
        MemorySource::new(sample_documents()),
    )
}

#[test]
fn full_run_produces_trainable_arrays() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let artifact = build(root.path(), 11).run()?;

    let train = load_array(&artifact.transformed_train_file_path)?;
    let test = load_array(&artifact.transformed_test_file_path)?;

    // 10 fixture rows at ratio 0.2, 3 features + target column.
    assert_eq!(train.dim(), (8, 4));
    assert_eq!(test.dim(), (2, 4));
    assert!(train.iter().all(|v| !v.is_nan()));
    assert!(test.iter().all(|v| !v.is_nan()));
    // Labels arrive -1/1 and leave 0/1, in the last column.
    assert!(train.column(3).iter().all(|&v| v == 0.0 || v == 1.0));
    assert!(test.column(3).iter().all(|&v| v == 0.0 || v == 1.0));

    let fitted: FittedKnnImputer = load_object(&artifact.transformed_object_file_path)?;
    assert_eq!(fitted.n_features_in(), 3);
    Ok(())
}

#[test]
fn seeded_runs_agree_end_to_end() -> anyhow::Result<()> {
    let root_a = tempfile::tempdir()?;
    let root_b = tempfile::tempdir()?;
    let a = build(root_a.path(), 99).run()?;
    let b = build(root_b.path(), 99).run()?;

    assert_eq!(
        load_array(&a.transformed_train_file_path)?,
        load_array(&b.transformed_train_file_path)?
    );
    assert_eq!(
        load_array(&a.transformed_test_file_path)?,
        load_array(&b.transformed_test_file_path)?
    );
    Ok(())
}

#[test]
fn artifacts_live_under_the_run_directory() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let pipeline_config = TrainingPipelineConfig::new("e2e", root.path());
    let run_dir = pipeline_config.artifact_dir.clone();
    let final_dir = pipeline_config.final_model_dir.clone();
    let mut ingestion_config =
        DataIngestionConfig::new(&pipeline_config, "mem://", "phishing", "records");
    ingestion_config.seed = Some(5);
    let transformation_config = DataTransformationConfig::new(&pipeline_config);
    let final_preprocessor = transformation_config.final_preprocessor_file_path.clone();

    let artifact = TrainingPipeline::new(
        pipeline_config,
        ingestion_config,
        transformation_config,
        MemorySource::new(sample_documents()),
    )
    .run()?;

    assert!(artifact.transformed_train_file_path.starts_with(&run_dir));
    assert!(artifact.transformed_object_file_path.starts_with(&run_dir));
    // The serving copy lands outside the timestamped run directory.
    assert!(final_preprocessor.starts_with(&final_dir));
    assert!(final_preprocessor.exists());
    Ok(())
}
