//! Mutation dataset reader.
//!
//! A dataset is split over a fixed number of trial files named
//! `mutations_{ff}_n{genes}_{trial:02}.csv` (trials numbered from 1). Each file
//! has a header row; the seven required columns may appear in any order and
//! extra columns are ignored.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::error::{open_file, parse_field, require_file, DataError};
use crate::domain::{Column, Dataset, DatasetId, SampleRow};

/// Trial files written per gene count by the mutation simulation.
pub const DEFAULT_FILES_PER_DATASET: usize = 10;

const REQUIRED: [Column; 7] = [
    Column::HammingDistance,
    Column::NumFit,
    Column::SampledStates,
    Column::ProportionFit,
    Column::Exhaustive,
    Column::TotalFit,
    Column::FitPerState,
];

/// Expected trial file paths for a dataset, in trial order.
pub fn dataset_paths(data_dir: &Path, id: &DatasetId, files: usize) -> Vec<PathBuf> {
    (1..=files)
        .map(|trial| {
            data_dir.join(format!(
                "mutations_{}_n{}_{:02}.csv",
                id.fitness_fn, id.gene_count, trial
            ))
        })
        .collect()
}

/// Read every trial file of a dataset and concatenate the rows.
pub fn read_dataset(data_dir: &Path, id: &DatasetId, files: usize) -> Result<Dataset, DataError> {
    let paths = dataset_paths(data_dir, id, files);
    // Check all files up front so a missing trial fails before any parsing.
    for path in &paths {
        require_file(path)?;
    }

    let mut rows = Vec::new();
    for path in &paths {
        let file_rows = read_mutation_csv(path)?;
        debug!(path = %path.display(), rows = file_rows.len(), "read trial file");
        rows.extend(file_rows);
    }

    info!(dataset = %id, files, rows = rows.len(), "loaded mutation dataset");
    Ok(Dataset::new(id.clone(), rows))
}

/// Parse one mutation CSV file.
pub fn read_mutation_csv(path: &Path) -> Result<Vec<SampleRow>, DataError> {
    let file = open_file(path)?;

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = rdr.headers().map_err(|e| DataError::csv(path, e))?.clone();
    let mut index = [0usize; 7];
    for (slot, column) in index.iter_mut().zip(REQUIRED) {
        let name = column.header().unwrap_or_default();
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::malformed(path, 0, name, "column missing from header"))?;
    }

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let row = i + 1;
        let record = record.map_err(|e| DataError::csv(path, e))?;
        let mut values = [0.0f64; 7];
        for ((value, &idx), column) in values.iter_mut().zip(&index).zip(REQUIRED) {
            let name = column.header().unwrap_or_default();
            *value = parse_field(path, row, name, record.get(idx))?;
        }

        let [hamming, num_fit, sampled, proportion, exhaustive, total_fit, per_state] = values;
        if hamming < 0.0 || hamming.fract() != 0.0 || hamming > u32::MAX as f64 {
            return Err(DataError::malformed(
                path,
                row,
                "HammingDist",
                format!("not a non-negative integer: {hamming}"),
            ));
        }

        rows.push(SampleRow::new(
            hamming as u32,
            num_fit,
            sampled,
            proportion,
            exhaustive != 0.0,
            total_fit,
            per_state,
        ));
    }

    Ok(rows)
}
