//! Data ingestion stage: source collection -> feature store -> splits.
//!
//! The stage runs three steps in order and hands the next stage a
//! [`DataIngestionArtifact`]:
//!
//! 1. [`export_collection_as_dataset`](DataIngestion::export_collection_as_dataset) -
//!    pull every document from the source and normalize it to a [`Dataset`]
//! 2. [`export_to_feature_store`](DataIngestion::export_to_feature_store) -
//!    persist the full dataset, pre-split and pre-transform
//! 3. [`split_train_test`](DataIngestion::split_train_test) - randomized
//!    disjoint partition at the configured ratio, both halves written with
//!    the same CSV semantics as the feature store
//!
//! The shuffle is seeded from `DataIngestionConfig::seed` when set; rows
//! are sampled without replacement and without stratification.

use crate::artifact::DataIngestionArtifact;
use crate::config::DataIngestionConfig;
use crate::dataset::Dataset;
use crate::error::{PipelineError, Result};
use crate::source::{normalize, DocumentSource, ID_FIELD};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Ingestion stage over any [`DocumentSource`].
pub struct DataIngestion<S> {
    config: DataIngestionConfig,
    source: S,
}

impl<S: DocumentSource> DataIngestion<S> {
    pub fn new(config: DataIngestionConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &DataIngestionConfig {
        &self.config
    }

    /// Pull the configured collection and normalize it.
    ///
    /// The resulting dataset has one row per document, no `_id` column,
    /// and the `"na"` sentinel replaced by the missing marker.
    pub fn export_collection_as_dataset(&self) -> Result<Dataset> {
        let documents = self.source.fetch_all()?;
        tracing::info!(
            collection = %self.config.collection_name,
            documents = documents.len(),
            "fetched source collection"
        );
        normalize(&documents, ID_FIELD)
    }

    /// Persist the full dataset to the feature-store path.
    ///
    /// Pass-through: the caller keeps using the in-memory dataset, the
    /// file is the durable pre-split record of this run's input.
    pub fn export_to_feature_store(&self, dataset: &Dataset) -> Result<()> {
        let rows = dataset.write_csv(&self.config.feature_store_file_path)?;
        tracing::info!(
            rows,
            path = %self.config.feature_store_file_path.display(),
            "wrote feature store"
        );
        Ok(())
    }

    /// Partition rows into disjoint train/test subsets and persist both.
    ///
    /// Test row count is `ceil(ratio * n)`; assignment is a uniform random
    /// shuffle, seeded when the config asks for reproducibility.
    ///
    /// # Errors
    /// Returns a schema error if the ratio is outside (0, 1).
    pub fn split_train_test(&self, dataset: &Dataset) -> Result<()> {
        let ratio = self.config.train_test_split_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(PipelineError::Schema(format!(
                "train/test split ratio must be in (0, 1), got {ratio}"
            )));
        }

        let mut indices: Vec<usize> = (0..dataset.n_rows()).collect();
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        indices.shuffle(&mut rng);

        let n_test = ((dataset.n_rows() as f64) * ratio).ceil() as usize;
        let (test_idx, train_idx) = indices.split_at(n_test.min(indices.len()));

        let train = dataset.select_rows(train_idx);
        let test = dataset.select_rows(test_idx);
        train.write_csv(&self.config.training_file_path)?;
        test.write_csv(&self.config.testing_file_path)?;
        tracing::info!(
            train_rows = train.n_rows(),
            test_rows = test.n_rows(),
            "wrote train/test splits"
        );
        Ok(())
    }

    /// Full ingestion workflow: fetch, store, split, return the artifact.
    pub fn run(&self) -> Result<DataIngestionArtifact> {
        let dataset = self.export_collection_as_dataset()?;
        self.export_to_feature_store(&dataset)?;
        self.split_train_test(&dataset)?;
        Ok(DataIngestionArtifact {
            train_file_path: self.config.training_file_path.clone(),
            test_file_path: self.config.testing_file_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainingPipelineConfig;
    use crate::source::MemorySource;
    use crate::testing::sample_documents;

    fn stage(dir: &std::path::Path, seed: Option<u64>) -> DataIngestion<MemorySource> {
        let tp = TrainingPipelineConfig::new("test", dir);
        let mut config = DataIngestionConfig::new(&tp, "mem://", "db", "records");
        config.seed = seed;
        DataIngestion::new(config, MemorySource::new(sample_documents()))
    }

    #[test]
    fn split_counts_honor_the_ratio() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let stage = stage(dir.path(), Some(7));
        let artifact = stage.run()?;
        let train = Dataset::read_csv(&artifact.train_file_path)?;
        let test = Dataset::read_csv(&artifact.test_file_path)?;
        // 10 fixture rows at ratio 0.2.
        assert_eq!(test.n_rows(), 2);
        assert_eq!(train.n_rows(), 8);
        assert_eq!(train.n_rows() + test.n_rows(), 10);
        Ok(())
    }

    #[test]
    fn fixed_seed_reproduces_the_split() -> Result<()> {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        let a = stage(dir_a.path(), Some(42)).run()?;
        let b = stage(dir_b.path(), Some(42)).run()?;
        assert_eq!(
            Dataset::read_csv(&a.train_file_path)?,
            Dataset::read_csv(&b.train_file_path)?
        );
        assert_eq!(
            Dataset::read_csv(&a.test_file_path)?,
            Dataset::read_csv(&b.test_file_path)?
        );
        Ok(())
    }

    #[test]
    fn out_of_range_ratio_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let tp = TrainingPipelineConfig::new("test", dir.path());
        let mut config = DataIngestionConfig::new(&tp, "mem://", "db", "records");
        config.train_test_split_ratio = 1.0;
        let stage = DataIngestion::new(config, MemorySource::new(sample_documents()));
        let ds = stage.export_collection_as_dataset().unwrap();
        assert!(matches!(
            stage.split_train_test(&ds),
            Err(PipelineError::Schema(_))
        ));
    }
}
