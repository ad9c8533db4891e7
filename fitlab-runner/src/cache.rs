//! On-disk table cache.
//!
//! Each table is stored as `{key}.txt`: whitespace-delimited floats, one row
//! per line, written with Rust's shortest round-trip formatting so a
//! write/read cycle reproduces every value bit for bit. A JSON sidecar
//! `{key}.meta.json` records the shape, the input fingerprint and the write
//! time. Writes go through a `.tmp` file and a rename.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const TABLE_EXT: &str = "txt";
const META_SUFFIX: &str = ".meta.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheMeta {
    pub key: String,
    pub rows: usize,
    pub columns: usize,
    /// BLAKE3 fingerprint of the inputs the table was computed from.
    pub input_hash: Option<String>,
    pub cached_at: DateTime<Utc>,
}

/// Cache of numeric tables keyed by name, e.g. `m4_ff4_final` or `M2`.
#[derive(Debug, Clone)]
pub struct TableCache {
    cache_dir: PathBuf,
}

impl TableCache {
    /// Opens a cache in `cache_dir`, creating the directory if needed.
    pub fn new(cache_dir: impl AsRef<Path>) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("create cache directory {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn contains(&self, key: &str) -> bool {
        self.table_path(key).exists()
    }

    /// Reads a cached table. `None` when the key is not cached.
    pub fn get_matrix(&self, key: &str) -> Result<Option<Vec<Vec<f64>>>> {
        let path = self.table_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read cached table {}", path.display()))?;
        let matrix = parse_matrix(&text)
            .with_context(|| format!("malformed cached table {}", path.display()))?;
        debug!(key, rows = matrix.len(), "cache read");
        Ok(Some(matrix))
    }

    pub fn get_meta(&self, key: &str) -> Result<Option<CacheMeta>> {
        let path = self.meta_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("read cache sidecar {}", path.display()))?;
        let meta = serde_json::from_str(&json)
            .with_context(|| format!("parse cache sidecar {}", path.display()))?;
        Ok(Some(meta))
    }

    /// True when the table exists and its sidecar records `input_hash`.
    pub fn is_fresh(&self, key: &str, input_hash: &str) -> Result<bool> {
        if !self.contains(key) {
            return Ok(false);
        }
        Ok(self
            .get_meta(key)?
            .and_then(|m| m.input_hash)
            .is_some_and(|h| h == input_hash))
    }

    /// Stores a table, replacing any previous entry under `key`.
    pub fn put_matrix(&self, key: &str, matrix: &[Vec<f64>], input_hash: Option<&str>) -> Result<()> {
        let columns = matrix.first().map_or(0, Vec::len);
        if let Some(i) = matrix.iter().position(|r| r.len() != columns) {
            bail!("table '{key}' row {i} has {} columns, expected {columns}", matrix[i].len());
        }

        write_atomic(&self.table_path(key), &format_matrix(matrix))?;

        let meta = CacheMeta {
            key: key.to_string(),
            rows: matrix.len(),
            columns,
            input_hash: input_hash.map(str::to_string),
            cached_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&meta).context("serialize cache sidecar")?;
        write_atomic(&self.meta_path(key), &json)?;

        info!(key, rows = meta.rows, columns, dir = %self.cache_dir.display(), "cached table");
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        for path in [self.table_path(key), self.meta_path(key)] {
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("remove {}", path.display()))?;
            }
        }
        Ok(())
    }

    /// Removes every cached table and sidecar.
    pub fn clear(&self) -> Result<()> {
        for entry in std::fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.is_file() && (is_table(&path) || is_meta(&path)) {
                std::fs::remove_file(&path)
                    .with_context(|| format!("remove {}", path.display()))?;
            }
        }
        Ok(())
    }

    /// Keys of all cached tables, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = std::fs::read_dir(&self.cache_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_table(path))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Number of cached tables.
    pub fn len(&self) -> Result<usize> {
        Ok(self.keys()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn table_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{key}.{TABLE_EXT}"))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{key}{META_SUFFIX}"))
    }
}

fn is_table(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(TABLE_EXT)
}

fn is_meta(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|n| n.ends_with(META_SUFFIX))
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, contents).with_context(|| format!("write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("rename {} to {}", tmp.display(), path.display()))?;
    Ok(())
}

/// One line per row, values separated by a single space.
pub fn format_matrix(matrix: &[Vec<f64>]) -> String {
    let mut out = String::new();
    for row in matrix {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// Parse a whitespace-delimited table. Blank lines are skipped; every row must
/// have the same number of columns.
pub fn parse_matrix(text: &str) -> Result<Vec<Vec<f64>>> {
    let mut matrix: Vec<Vec<f64>> = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|field| {
                field
                    .parse::<f64>()
                    .with_context(|| format!("line {}: '{field}' is not a number", i + 1))
            })
            .collect::<Result<Vec<_>>>()?;
        if let Some(first) = matrix.first() {
            if first.len() != row.len() {
                bail!(
                    "line {}: {} columns, expected {}",
                    i + 1,
                    row.len(),
                    first.len()
                );
            }
        }
        matrix.push(row);
    }
    Ok(matrix)
}
