// src/runner.rs
//! Batch orchestration: configuration rows in, files out.
//!
//! Each row runs the same sequence, strictly one after another:
//!
//! ```text
//! parse row → build or reuse grammar → resolve output → fetch pages
//!           → extract per record → write
//! ```
//!
//! What survives from one row to the next lives in `RunState`: the active
//! grammar and the output router (last path, paths seen, open workbooks).

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::{
    config::{ConfigRow, ConfigTable, RunOptions, table::RawRow},
    core::DiscoveryClient,
    error::{HarvestError, Result},
    fetch::{PagedFetcher, SearchApi},
    file::OutputRouter,
    grammar::{self, Grammar},
    progress::Progress,
    store::DataSet,
};

/// Summary of what was produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub records_written: usize,
    pub files_written: Vec<PathBuf>,
}

#[derive(Default)]
pub struct RunState {
    grammar: Option<Grammar>,
    router: OutputRouter,
}

/// Load the configuration table and run it against the live search API.
pub fn run(opts: &RunOptions, progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
    let table = ConfigTable::load(&opts.config_path)?;
    let client = DiscoveryClient::new(&opts.api_url, opts.timeout_secs).map_err(HarvestError::Client)?;
    info!(config = %opts.config_path.display(), rows = table.rows.len(), api = client.base_url(), "starting run");
    run_table(&table, &client, opts.skip_failed_rows, progress)
}

/// Run every row of `table` against `api`.
///
/// Configuration errors always end the run. A failed fetch ends it too,
/// unless `skip_failed_rows` is set, in which case that row is dropped.
pub fn run_table(
    table: &ConfigTable,
    api: &dyn SearchApi,
    skip_failed_rows: bool,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(table.rows.len());
    }
    for column in table.ignored_columns() {
        warn!(column, "unrecognized configuration column ignored");
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("ignoring column {column:?}"));
        }
    }

    let mut state = RunState::default();
    let mut summary = RunSummary::default();

    for (i, raw) in table.rows.iter().enumerate() {
        let number = i + 1;
        match process_row(&mut state, number, raw, api, progress.as_deref_mut()) {
            Ok((records, path)) => {
                summary.rows_processed += 1;
                summary.records_written += records;
                if let Some(p) = progress.as_deref_mut() {
                    p.row_done(number, records, &path);
                }
            }
            Err(HarvestError::Fetch { row, source }) if skip_failed_rows => {
                let msg = source.to_string();
                error!(row, error = %msg, "fetch failed; skipping row");
                summary.rows_failed += 1;
                if let Some(p) = progress.as_deref_mut() {
                    p.row_failed(row, &msg);
                }
            }
            Err(e) => {
                if let Some(p) = progress.as_deref_mut() {
                    p.finish();
                }
                return Err(e);
            }
        }
    }

    summary.files_written = state.router.finish()?;
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    info!(
        rows = summary.rows_processed,
        failed = summary.rows_failed,
        records = summary.records_written,
        files = summary.files_written.len(),
        "run complete"
    );
    Ok(summary)
}

fn process_row(
    state: &mut RunState,
    number: usize,
    raw: &RawRow,
    api: &dyn SearchApi,
    progress: Option<&mut (dyn Progress + '_)>,
) -> Result<(usize, PathBuf)> {
    let row = ConfigRow::parse(number, raw)?;

    state.grammar = grammar::build_or_reuse(&row.labels, row.pattern.as_deref(), state.grammar.take())?;
    match &state.grammar {
        Some(g) => debug!(row = number, ids = ?g.ids(), explicit = g.is_explicit(), "grammar active"),
        None => debug!(row = number, "no grammar yet; extraction skipped"),
    }

    let target = state
        .router
        .resolve(number, row.destination.as_ref(), row.sheet_name.as_deref())?;

    let records = PagedFetcher::new(api, row.max_records)
        .fetch(&row.query, number, progress)
        .map_err(|source| HarvestError::Fetch { row: number, source })?;

    let data = DataSet::from_records(&records, &row.columns, state.grammar.as_ref());

    state.router.write(&target, &data, row.encoding)?;
    info!(
        row = number,
        records = data.len(),
        path = %target.path.display(),
        sheet = target.sheet.as_deref().unwrap_or("-"),
        append = !target.is_new,
        "row written"
    );

    Ok((data.len(), target.path))
}
