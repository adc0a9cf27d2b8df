//! On-disk persistence for fitted objects and numeric arrays.
//!
//! Serialization is Serde-backed through `postcard`. Every write in this
//! crate funnels through [`atomic_write`]: the payload is staged in a
//! temporary file inside the destination directory, synced, and renamed
//! into place, so a crash mid-write never leaves a partial artifact behind.

use crate::error::{PipelineError, Result};
use ndarray::Array2;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{create_dir_all, read};
use std::io::Write;
use std::path::Path;

/// Write `bytes` to `path` atomically, creating parent directories.
///
/// # Errors
/// Returns an error if the directories cannot be created, or the staging
/// file cannot be written, synced, or renamed.
pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    create_dir_all(parent).map_err(|e| PipelineError::io("mkdir -p", parent, e))?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| PipelineError::io("create staging file", parent, e))?;
    tmp.write_all(bytes)
        .map_err(|e| PipelineError::io("write staging file", path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| PipelineError::io("sync staging file", path, e))?;
    tmp.persist(path)
        .map_err(|e| PipelineError::io("rename into place", path, e.error))?;
    Ok(())
}

/// Serialize `value` with postcard and write it atomically to `path`.
pub fn save_object<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let encoded = postcard::to_allocvec(value)
        .map_err(|e| PipelineError::codec(format!("encode {}", path.display()), e))?;
    atomic_write(path, &encoded)
}

/// Read and deserialize a value previously written by [`save_object`].
pub fn load_object<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let bytes = read(path).map_err(|e| PipelineError::io("read", path, e))?;
    postcard::from_bytes(&bytes)
        .map_err(|e| PipelineError::codec(format!("decode {}", path.display()), e))
}

/// Persist a numeric matrix.
pub fn save_array(path: impl AsRef<Path>, array: &Array2<f64>) -> Result<()> {
    save_object(path, array)
}

/// Load a numeric matrix previously written by [`save_array`].
pub fn load_array(path: impl AsRef<Path>) -> Result<Array2<f64>> {
    load_object(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn array_roundtrip() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arrays").join("train.mat");
        let arr = array![[1.0, 2.0], [3.0, f64::NAN]];
        save_array(&path, &arr)?;
        let back = load_array(&path)?;
        assert_eq!(back.dim(), (2, 2));
        assert_eq!(back[[1, 0]], 3.0);
        assert!(back[[1, 1]].is_nan());
        Ok(())
    }

    #[test]
    fn atomic_write_replaces_existing_file() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        atomic_write(&path, b"first")?;
        atomic_write(&path, b"second")?;
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        Ok(())
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_array(dir.path().join("absent.mat")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}
