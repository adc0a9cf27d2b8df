//! Tests for the ingestion stage as observed through its files on disk.

use millrace::testing::sample_documents;
use millrace::*;
use serde_json::json;

fn configs(root: &std::path::Path, seed: Option<u64>) -> DataIngestionConfig {
    let tp = TrainingPipelineConfig::new("ingestion-test", root);
    let mut config = DataIngestionConfig::new(&tp, "mem://", "phishing", "records");
    config.seed = seed;
    config
}

#[test]
fn feature_store_mirrors_the_collection() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let config = configs(root.path(), Some(1));
    let feature_store_path = config.feature_store_file_path.clone();
    let stage = DataIngestion::new(config, MemorySource::new(sample_documents()));
    stage.run()?;

    let stored = Dataset::read_csv(&feature_store_path)?;
    assert_eq!(stored.n_rows(), sample_documents().len());
    assert!(stored.column_index("_id").is_none());
    assert_eq!(
        stored.columns(),
        ["having_ip", "url_length", "ssl_state", "Result"]
    );
    Ok(())
}

#[test]
fn na_sentinels_become_missing_cells_through_the_csv() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let docs = vec![json!({"_id": 1, "x": "na", "y": 5})
        .as_object()
        .cloned()
        .unwrap()];
    let mut config = configs(root.path(), Some(1));
    config.train_test_split_ratio = 0.5;
    let feature_store_path = config.feature_store_file_path.clone();
    DataIngestion::new(config, MemorySource::new(docs)).run()?;

    let stored = Dataset::read_csv(&feature_store_path)?;
    assert_eq!(stored.rows()[0], vec![Field::Missing, Field::Int(5)]);
    Ok(())
}

#[test]
fn splits_are_disjoint_and_exhaustive() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let artifact =
        DataIngestion::new(configs(root.path(), Some(3)), MemorySource::new(sample_documents()))
            .run()?;

    let train = Dataset::read_csv(&artifact.train_file_path)?;
    let test = Dataset::read_csv(&artifact.test_file_path)?;
    assert_eq!(train.n_rows() + test.n_rows(), 10);
    assert_eq!(test.n_rows(), 2);

    // Disjoint: no row appears in both splits (fixture rows are unique).
    for row in test.rows() {
        assert!(!train.rows().contains(row));
    }
    Ok(())
}

#[test]
fn unseeded_runs_still_partition_correctly() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let artifact =
        DataIngestion::new(configs(root.path(), None), MemorySource::new(sample_documents()))
            .run()?;
    let train = Dataset::read_csv(&artifact.train_file_path)?;
    let test = Dataset::read_csv(&artifact.test_file_path)?;
    assert_eq!(train.n_rows(), 8);
    assert_eq!(test.n_rows(), 2);
    Ok(())
}

#[test]
fn failing_source_aborts_the_run() {
    struct Unreachable;
    impl DocumentSource for Unreachable {
        fn fetch_all(&self) -> Result<Vec<Document>> {
            Err(PipelineError::Connection {
                context: "refused".into(),
                source: None,
            })
        }
    }

    let root = tempfile::tempdir().unwrap();
    let config = configs(root.path(), None);
    let feature_store_path = config.feature_store_file_path.clone();
    let err = DataIngestion::new(config, Unreachable).run().unwrap_err();
    assert!(matches!(err, PipelineError::Connection { .. }));
    // Nothing was written.
    assert!(!feature_store_path.exists());
}
