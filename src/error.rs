// src/error.rs
//! Error taxonomy for a harvest run.
//!
//! - `ConfigError` is always fatal for the whole run.
//! - `FetchError` is fatal for the row it happened on; the runner decides
//!   whether that also ends the run.
//! - Extraction anomalies are not errors at all; they are logged.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("row {row}: no output_filepath given")]
    MissingDestination { row: usize },

    #[error("row {row}: output_filepath is APPEND but no earlier row set a destination")]
    NoPreviousDestination { row: usize },

    #[error("could not find a free sheet name for {requested:?} in {path} after {attempts} attempts")]
    SheetNameExhausted { requested: String, path: PathBuf, attempts: usize },

    #[error("labels {first:?} and {second:?} both normalize to identifier {id:?}")]
    DuplicateLabel { first: String, second: String, id: String },

    #[error("no labels given to build a grammar from")]
    NoLabels,

    #[error("label {0:?} has no letters or digits to build an identifier from")]
    EmptyLabelId(String),

    #[error("invalid extraction pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("row {row}: unknown output encoding {label:?}")]
    UnknownEncoding { row: usize, label: String },

    #[error("row {row}: max_records must be a non-negative integer, got {value:?}")]
    InvalidMaxRecords { row: usize, value: String },

    #[error("configuration table {0} has no rows")]
    EmptyTable(PathBuf),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode search response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("row {row}: {source}")]
    Fetch {
        row: usize,
        #[source]
        source: FetchError,
    },

    #[error("could not set up HTTP client: {0}")]
    Client(#[source] FetchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T, E = HarvestError> = std::result::Result<T, E>;
