//! CSV readers for simulation output

pub mod error;
pub mod hm;
pub mod reader;
pub mod series;

pub use error::DataError;
pub use hm::{hm_path, read_hm, HmRow, HmTable};
pub use reader::{dataset_paths, read_dataset, read_mutation_csv, DEFAULT_FILES_PER_DATASET};
pub use series::read_series;
