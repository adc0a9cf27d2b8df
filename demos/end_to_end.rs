//! Complete training-data preparation run, start to finish.
//!
//! This demo walks the whole pipeline over the built-in fixture corpus:
//! 1. **Ingest**: pull documents, normalize, write the feature store
//! 2. **Split**: seeded 80/20 train/test partition
//! 3. **Transform**: fit the KNN imputer on train, impute both splits,
//!    persist arrays and the fitted preprocessor
//!
//! Run with: cargo run --example end_to_end

use anyhow::Result;
use millrace::persist::{load_array, load_object};
use millrace::testing::sample_documents;
use millrace::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let root = tempfile::tempdir()?;
    let pipeline_config = TrainingPipelineConfig::new("phishing-prep", root.path());
    let mut ingestion_config = DataIngestionConfig::new(
        &pipeline_config,
        "mongodb://localhost:27017",
        "phishing",
        "records",
    );
    ingestion_config.seed = Some(42);
    let transformation_config = DataTransformationConfig::new(&pipeline_config);

    // Swap MemorySource for MongoSource::from_config(&ingestion_config)?
    // to run against a live document store.
    let source = MemorySource::new(sample_documents());

    let artifact = TrainingPipeline::new(
        pipeline_config,
        ingestion_config,
        transformation_config,
        source,
    )
    .run()?;

    let train = load_array(&artifact.transformed_train_file_path)?;
    let test = load_array(&artifact.transformed_test_file_path)?;
    println!("train array: {:?}", train.dim());
    println!("test array:  {:?}", test.dim());

    let fitted: FittedKnnImputer = load_object(&artifact.transformed_object_file_path)?;
    let fresh = ndarray::array![[f64::NAN, 50.0, 1.0]];
    let imputed = fitted.transform(&fresh)?;
    println!("imputed fresh row: {:.2}", imputed[[0, 0]]);

    Ok(())
}
