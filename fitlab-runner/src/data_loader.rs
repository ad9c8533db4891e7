//! Input loading for the figure pipelines.
//!
//! Wraps the core readers and fingerprints the raw bytes of every input file
//! with BLAKE3. The fingerprint keys cache freshness: a cached table is reused
//! in `auto` mode only when the inputs hash to the value recorded next to it.

use std::path::{Path, PathBuf};

use fitlab_core::data::{dataset_paths, read_dataset, read_series, DataError};
use fitlab_core::{Dataset, DatasetId};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("hash input {}: {source}", path.display())]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A mutation dataset plus the fingerprint of the files it came from.
#[derive(Debug)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub files: Vec<PathBuf>,
    pub input_hash: String,
}

/// Evolution-run series, one per file, in path order.
#[derive(Debug)]
pub struct LoadedSeries {
    pub series: Vec<Vec<f64>>,
    pub input_hash: String,
}

pub fn load_dataset(
    data_dir: &Path,
    id: &DatasetId,
    files_per_dataset: usize,
) -> Result<LoadedDataset, LoadError> {
    let files = dataset_paths(data_dir, id, files_per_dataset);
    let dataset = read_dataset(data_dir, id, files_per_dataset)?;
    let input_hash = hash_inputs(&files)?;
    Ok(LoadedDataset {
        dataset,
        files,
        input_hash,
    })
}

pub fn load_series(paths: &[PathBuf]) -> Result<LoadedSeries, LoadError> {
    let mut series = Vec::with_capacity(paths.len());
    for path in paths {
        let values = read_series(path)?;
        info!(path = %path.display(), values = values.len(), "loaded series");
        series.push(values);
    }
    let input_hash = hash_inputs(paths)?;
    Ok(LoadedSeries { series, input_hash })
}

/// BLAKE3 over the file names and bytes of `paths`, in order.
///
/// Only the file name enters the hash so that moving the data directory does
/// not invalidate the cache.
pub fn hash_inputs(paths: &[PathBuf]) -> Result<String, LoadError> {
    let mut hasher = blake3::Hasher::new();
    for path in paths {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Hash {
            path: path.clone(),
            source,
        })?;
        if let Some(name) = path.file_name() {
            hasher.update(name.to_string_lossy().as_bytes());
        }
        hasher.update(&(bytes.len() as u64).to_le_bytes());
        hasher.update(&bytes);
    }
    Ok(hasher.finalize().to_hex().to_string())
}
