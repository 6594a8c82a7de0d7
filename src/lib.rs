// src/lib.rs

#[macro_use]
pub mod macros;

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod progress;
pub mod runner;

pub mod csv;
pub mod extract;
pub mod fetch;
pub mod file;
pub mod grammar;
pub mod record;
pub mod sheet;
pub mod store;

pub use error::{ConfigError, FetchError, HarvestError};
pub use runner::{run, run_table, RunSummary};
