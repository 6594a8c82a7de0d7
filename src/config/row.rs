// src/config/row.rs
//! One configuration row, parsed into a unit of work.

use std::path::PathBuf;

use encoding_rs::Encoding;

use super::consts::*;
use super::table::RawRow;
use crate::{
    core::encoding,
    error::ConfigError,
    fetch::{ParamValue, Query},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    Path(PathBuf),
    /// Reuse the previous row's resolved path.
    Append,
}

#[derive(Clone, Debug)]
pub struct ConfigRow {
    /// 1-based position in the table.
    pub number: usize,
    pub labels: Vec<String>,
    pub pattern: Option<String>,
    pub query: Query,
    pub destination: Option<Destination>,
    pub sheet_name: Option<String>,
    pub encoding: &'static Encoding,
    pub max_records: Option<usize>,
    pub columns: Vec<String>,
}

impl ConfigRow {
    pub fn parse(number: usize, raw: &RawRow) -> Result<Self, ConfigError> {
        let mut row = ConfigRow {
            number,
            labels: Vec::new(),
            pattern: None,
            query: Query::new(),
            destination: None,
            sheet_name: None,
            encoding: encoding_rs::UTF_8,
            max_records: None,
            columns: DEFAULT_COLUMNS.iter().map(|c| s!(*c)).collect(),
        };

        for (key, value) in raw {
            let value = value.trim();
            if value.is_empty() { continue; }

            match key.as_str() {
                KEY_LABELS => row.labels = split_list(value),
                KEY_REGEX => row.pattern = Some(s!(value)),
                KEY_OUTPUT_PATH => row.destination = Some(parse_destination(value)),
                KEY_SHEET_NAME => row.sheet_name = Some(s!(value)),
                KEY_ENCODING => {
                    row.encoding = encoding::resolve(Some(value)).ok_or_else(|| {
                        ConfigError::UnknownEncoding { row: number, label: s!(value) }
                    })?;
                }
                KEY_COLUMNS => {
                    let cols = split_list(value);
                    if !cols.is_empty() { row.columns = cols; }
                }
                KEY_MAX_RECORDS => row.max_records = parse_max_records(number, value)?,
                k if k.starts_with(PARAM_PREFIX) => {
                    if MULTI_VALUED_PARAMS.contains(&k) {
                        let values = split_list(value);
                        if !values.is_empty() {
                            row.query.set(k, ParamValue::Many(values));
                        }
                    } else {
                        row.query.set_one(k, value);
                    }
                }
                // reported once per table, not per row
                _ => {}
            }
        }

        Ok(row)
    }
}

fn parse_destination(value: &str) -> Destination {
    if value.eq_ignore_ascii_case(APPEND_SENTINEL) {
        Destination::Append
    } else {
        Destination::Path(PathBuf::from(value))
    }
}

/// `0` means unbounded. Spreadsheet-exported tables sometimes write `50.0`.
fn parse_max_records(row: usize, value: &str) -> Result<Option<usize>, ConfigError> {
    let n = match value.parse::<usize>() {
        Ok(n) => n,
        Err(_) => match value.parse::<f64>() {
            Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= usize::MAX as f64 => f as usize,
            _ => return Err(ConfigError::InvalidMaxRecords { row, value: s!(value) }),
        },
    };
    Ok((n > 0).then_some(n))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
