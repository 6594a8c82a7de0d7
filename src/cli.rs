// src/cli.rs
use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};

use crate::{
    config::{consts::*, RunOptions},
    log::init_logging,
    progress::Progress,
    runner,
};

#[derive(Parser, Debug)]
#[command(name = "discovery_harvest", version, about = "Harvest catalogue search results into CSV/XLSX, one configuration row at a time")]
pub struct Args {
    /// Configuration table (CSV). Asked for on stdin when omitted.
    pub config: Option<PathBuf>,

    /// Search endpoint.
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Per-request timeout.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Log a failed fetch and continue with the next row.
    #[arg(long)]
    pub skip_failed_rows: bool,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Also write the log to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub fn run() -> color_eyre::Result<()> {
    let args = Args::parse();
    let _guard = init_logging(&args.log_level, args.log_file.as_deref())
        .wrap_err("could not open log file")?;

    let config_path = match args.config {
        Some(p) => p,
        None => prompt_config_path(&mut io::stdin().lock(), &mut io::stderr())?,
    };

    let opts = RunOptions {
        config_path,
        api_url: args.api_url,
        timeout_secs: args.timeout_secs,
        skip_failed_rows: args.skip_failed_rows,
    };

    let mut progress = ConsoleProgress::default();
    let summary = runner::run(&opts, Some(&mut progress))?;

    eprintln!(
        "Done: {} row(s), {} record(s), {} file(s){}",
        summary.rows_processed,
        summary.records_written,
        summary.files_written.len(),
        if summary.rows_failed > 0 { format!(", {} row(s) skipped", summary.rows_failed) } else { s!() }
    );
    for path in &summary.files_written {
        println!("{}", path.display());
    }
    Ok(())
}

/// Ask for the configuration path. Pasted paths often come quoted.
pub fn prompt_config_path(input: &mut impl BufRead, out: &mut impl Write) -> color_eyre::Result<PathBuf> {
    write!(out, "Path to configuration table: ")?;
    out.flush()?;
    let mut line = s!();
    input.read_line(&mut line)?;
    let path = strip_quotes(line.trim());
    if path.is_empty() {
        bail!("no configuration table given");
    }
    Ok(PathBuf::from(path))
}

fn strip_quotes(s: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(q).and_then(|r| r.strip_suffix(q)) {
            return inner.trim();
        }
    }
    s
}

/// Status lines on stderr; stdout carries only the written paths.
#[derive(Default)]
pub struct ConsoleProgress {
    rows: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, rows: usize) {
        self.rows = rows;
        eprintln!("{rows} configuration row(s)");
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn page_fetched(&mut self, row: usize, fetched: usize, expected: u64) {
        eprint!("\r[{row}/{}] {fetched} of {expected} record(s)", self.rows);
    }

    fn row_done(&mut self, row: usize, records: usize, path: &Path) {
        eprintln!("\r[{row}/{}] {records} record(s) -> {}", self.rows, path.display());
    }

    fn row_failed(&mut self, row: usize, msg: &str) {
        eprintln!("\r[{row}/{}] skipped: {msg}", self.rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_strips_quotes_and_whitespace() {
        let mut input = io::Cursor::new(b"  \"C:/data/My Config.csv\"  \n".to_vec());
        let mut out = Vec::new();
        let p = prompt_config_path(&mut input, &mut out).unwrap();
        assert_eq!(p, PathBuf::from("C:/data/My Config.csv"));
        assert!(String::from_utf8(out).unwrap().starts_with("Path to configuration table"));
    }

    #[test]
    fn prompt_rejects_blank() {
        let mut input = io::Cursor::new(b"\n".to_vec());
        assert!(prompt_config_path(&mut input, &mut Vec::new()).is_err());
    }

    #[test]
    fn single_quotes_too() {
        assert_eq!(strip_quotes("'a b.csv'"), "a b.csv");
        assert_eq!(strip_quotes("\"unbalanced"), "\"unbalanced");
    }

    #[test]
    fn args_defaults() {
        let a = Args::try_parse_from(["discovery_harvest", "cfg.csv"]).unwrap();
        assert_eq!(a.config, Some(PathBuf::from("cfg.csv")));
        assert_eq!(a.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(a.api_url, DEFAULT_API_URL);
        assert!(!a.skip_failed_rows);
        assert_eq!(a.log_level, "info");
    }
}
