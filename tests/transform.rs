//! Tests for the transformation stage over pre-written splits.

use millrace::persist::{load_array, load_object};
use millrace::*;
use std::path::Path;

fn write_csv(path: &Path, header: &[&str], rows: &[&[&str]]) -> anyhow::Result<()> {
    let mut ds = Dataset::new(header.iter().map(|s| s.to_string()).collect());
    for row in rows {
        ds.push_row(row.iter().map(|c| Field::parse(c)).collect())?;
    }
    ds.write_csv(path)?;
    Ok(())
}

fn stage(root: &Path) -> DataTransformation {
    let tp = TrainingPipelineConfig::new("transform-test", root);
    let validation = DataValidationArtifact {
        validation_status: true,
        valid_train_file_path: root.join("train.csv"),
        valid_test_file_path: root.join("test.csv"),
    };
    DataTransformation::new(validation, DataTransformationConfig::new(&tp))
}

#[test]
fn imputed_arrays_have_target_as_last_column() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    write_csv(
        &root.path().join("train.csv"),
        &["a", "b", "Result"],
        &[
            &["1", "10", "-1"],
            &["2", "", "1"],
            &["3", "30", "-1"],
            &["4", "40", "1"],
        ],
    )?;
    write_csv(
        &root.path().join("test.csv"),
        &["a", "b", "Result"],
        &[&["", "20", "1"]],
    )?;

    let artifact = stage(root.path()).run()?;

    let train = load_array(&artifact.transformed_train_file_path)?;
    let test = load_array(&artifact.transformed_test_file_path)?;
    assert_eq!(train.dim(), (4, 3));
    assert_eq!(test.dim(), (1, 3));
    assert!(train.iter().all(|v| !v.is_nan()));
    assert!(test.iter().all(|v| !v.is_nan()));
    assert_eq!(train.column(2).to_vec(), vec![0.0, 1.0, 0.0, 1.0]);
    assert_eq!(test[[0, 2]], 1.0);
    Ok(())
}

#[test]
fn rerun_on_identical_inputs_is_shape_stable() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    write_csv(
        &root.path().join("train.csv"),
        &["a", "b", "Result"],
        &[&["1", "", "1"], &["2", "5", "-1"], &["3", "7", "1"]],
    )?;
    write_csv(
        &root.path().join("test.csv"),
        &["a", "b", "Result"],
        &[&["4", "6", "-1"]],
    )?;

    let first = stage(root.path()).run()?;
    let first_train = load_array(&first.transformed_train_file_path)?;
    let second = stage(root.path()).run()?;
    let second_train = load_array(&second.transformed_train_file_path)?;

    assert_eq!(first_train, second_train);
    assert_eq!(first_train.ncols(), second_train.ncols());
    Ok(())
}

#[test]
fn reloaded_preprocessor_imputes_new_data() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    write_csv(
        &root.path().join("train.csv"),
        &["a", "b", "Result"],
        &[&["1", "2", "1"], &["3", "4", "-1"], &["5", "6", "1"]],
    )?;
    write_csv(
        &root.path().join("test.csv"),
        &["a", "b", "Result"],
        &[&["7", "8", "-1"]],
    )?;

    let artifact = stage(root.path()).run()?;
    let fitted: FittedKnnImputer = load_object(&artifact.transformed_object_file_path)?;

    // Serving-style use: impute a fresh row with a gap.
    let fresh = ndarray::array![[f64::NAN, 4.0]];
    let imputed = fitted.transform(&fresh)?;
    assert!(!imputed[[0, 0]].is_nan());
    Ok(())
}

#[test]
fn mismatched_split_schemas_fail() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    write_csv(
        &root.path().join("train.csv"),
        &["a", "b", "Result"],
        &[&["1", "2", "1"]],
    )?;
    // Test split is missing a feature column.
    write_csv(&root.path().join("test.csv"), &["a", "Result"], &[&["1", "1"]])?;

    let err = stage(root.path()).run().unwrap_err();
    assert!(matches!(err, PipelineError::Schema(_)));
    Ok(())
}
