// src/config/table.rs
//! The configuration table: one CSV row per unit of work, header row = keys.

use std::{fs::File, io::Read, path::Path};

use tracing::debug;

use super::consts::{CONFIG_KEYS, PARAM_PREFIX};
use crate::error::{ConfigError, Result};

/// `(key, value)` pairs of one table row, in column order. Empty cells are not present.
pub type RawRow = Vec<(String, String)>;

#[derive(Clone, Debug, Default)]
pub struct ConfigTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl ConfigTable {
    pub fn load(path: &Path) -> Result<Self> {
        let table = Self::from_reader(File::open(path)?)?;
        if table.rows.is_empty() {
            return Err(ConfigError::EmptyTable(path.to_path_buf()).into());
        }
        Ok(table)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(rdr);

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let row: RawRow = columns
                .iter()
                .zip(record.iter())
                .filter(|(key, value)| !key.is_empty() && !value.trim().is_empty())
                .map(|(key, value)| (key.clone(), value.trim().to_string()))
                .collect();

            if row.is_empty() {
                debug!("config row {} is blank; skipping", i + 1);
                continue;
            }
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Columns that are neither a known key nor a request parameter.
    pub fn ignored_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !c.is_empty() && !is_recognized(c))
            .collect()
    }
}

pub fn is_recognized(key: &str) -> bool {
    CONFIG_KEYS.contains(&key) || key.starts_with(PARAM_PREFIX)
}
