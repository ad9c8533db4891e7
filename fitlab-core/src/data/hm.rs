//! h(m) tables: columns `k, m, h(m)`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{open_file, parse_field, DataError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HmRow {
    pub k: f64,
    pub m: f64,
    pub h: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HmTable {
    pub rows: Vec<HmRow>,
}

impl HmTable {
    /// Rows for one `k`, in file order.
    pub fn for_k(&self, k: u32) -> Vec<HmRow> {
        self.rows
            .iter()
            .filter(|r| r.k == k as f64)
            .copied()
            .collect()
    }
}

/// Conventional location of the h(m) table for `gene_count` genes.
pub fn hm_path(data_dir: &Path, gene_count: u32) -> PathBuf {
    data_dir.join(format!("h{gene_count}_m.csv"))
}

pub fn read_hm(path: &Path) -> Result<HmTable, DataError> {
    let file = open_file(path)?;

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers = rdr.headers().map_err(|e| DataError::csv(path, e))?.clone();

    let mut index = [0usize; 3];
    for (slot, name) in index.iter_mut().zip(["k", "m", "h(m)"]) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::malformed(path, 0, name, "column missing from header"))?;
    }

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| DataError::csv(path, e))?;
        rows.push(HmRow {
            k: parse_field(path, i + 1, "k", record.get(index[0]))?,
            m: parse_field(path, i + 1, "m", record.get(index[1]))?,
            h: parse_field(path, i + 1, "h(m)", record.get(index[2]))?,
        });
    }
    Ok(HmTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_k() {
        let dir = tempfile::tempdir().unwrap();
        let path = hm_path(dir.path(), 4);
        assert!(path.ends_with("h4_m.csv"));
        std::fs::write(&path, "k,m,h(m)\n10,1,0.9\n10,2,0.8\n21,1,0.95\n").unwrap();
        let table = read_hm(&path).unwrap();
        assert_eq!(table.rows.len(), 3);
        let k10 = table.for_k(10);
        assert_eq!(k10.len(), 2);
        assert_eq!(k10[1].h, 0.8);
        assert!(table.for_k(33).is_empty());
    }

    #[test]
    fn missing_hm_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.csv");
        std::fs::write(&path, "k,m\n1,2\n").unwrap();
        let err = read_hm(&path).unwrap_err();
        assert!(err.to_string().contains("h(m)"));
    }
}
