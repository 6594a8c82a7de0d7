// tests/batch_run.rs
mod common;

use std::path::Path;

use common::{described, read_csv, records, ScriptedApi};
use discovery_harvest::{
    config::ConfigTable,
    error::{ConfigError, HarvestError},
    progress::Progress,
    run_table,
};

fn table(text: &str) -> ConfigTable {
    ConfigTable::from_reader(text.as_bytes()).unwrap()
}

fn quoted(p: &Path) -> String {
    format!("\"{}\"", p.display())
}

#[test]
fn grammar_carries_over_and_append_extends_the_csv() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("petitions.csv");
    let config = table(&format!(
        "labels,output_filepath,discovery_columns,sps.searchQuery\n\
         \"Petitioners,Nature of request\",{},\"reference,description\",petition\n\
         ,APPEND,\"reference,description\",land\n",
        quoted(&out)
    ));
    let api = ScriptedApi::new()
        .page(
            vec![
                described("SC 8/1/1", "Petitioners: John Smith. Nature of request: land."),
                described("SC 8/1/2", "Nature of request: pardon. Seal: red"),
            ],
            Some("null"),
        )
        .page(vec![described("SC 8/2/1", "No labels here at all.")], Some("null"));

    let summary = run_table(&config, &api, false, None).unwrap();
    assert_eq!(summary.rows_processed, 2);
    assert_eq!(summary.records_written, 3);
    assert_eq!(summary.files_written.len(), 1);

    // each row sends its own query
    let asked = api.asked.borrow();
    assert_eq!(asked.len(), 2);
    assert!(format!("{:?}", asked[1].get("sps.searchQuery")).contains("land"));
    drop(asked);

    let rows = read_csv(&out);
    assert_eq!(
        rows[0],
        vec![
            "reference",
            "description",
            "petitioners",
            "nature_of_request",
            "no_label_data",
            "possible_unlisted_labels"
        ]
    );
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1][2..], ["John Smith", "land", "False", ""]);
    assert_eq!(rows[2][2..], ["", "pardon", "False", "Seal"]);
    // second row reused the first row's grammar
    assert_eq!(rows[3][2..], ["", "", "True", ""]);
}

#[test]
fn no_grammar_means_plain_projection() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("plain.csv");
    let config = table(&format!(
        "output_filepath,discovery_columns\n{},\"reference,id\"\n",
        quoted(&out)
    ));
    let api = ScriptedApi::new().page(records("A", 2), Some("null"));

    run_table(&config, &api, false, None).unwrap();
    assert_eq!(read_csv(&out), vec![vec!["reference", "id"], vec!["A/1", "C1"], vec!["A/2", "C2"]]);
}

#[test]
fn max_records_caps_each_row() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("capped.csv");
    let config = table(&format!(
        "output_filepath,discovery_columns,max_records\n{},reference,3.0\n",
        quoted(&out)
    ));
    let api = ScriptedApi::new()
        .page(records("A", 2), Some("m1"))
        .page(records("B", 2), Some("m2"))
        .page(records("C", 2), Some("null"));

    let summary = run_table(&config, &api, false, None).unwrap();
    assert_eq!(summary.records_written, 3);
    assert_eq!(api.calls(), 2);
}

#[test]
fn fetch_failure_aborts_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a.csv");
    let config = table(&format!(
        "output_filepath,discovery_columns\n{},reference\nAPPEND,reference\n",
        quoted(&out)
    ));
    let api = ScriptedApi::new().fail(500).page(records("B", 1), Some("null"));

    let err = run_table(&config, &api, false, None).unwrap_err();
    assert!(matches!(err, HarvestError::Fetch { row: 1, .. }));
    assert_eq!(api.calls(), 1);
    assert!(!out.exists());
}

#[derive(Default)]
struct Tally {
    begun: usize,
    logged: Vec<String>,
    done: Vec<usize>,
    failed: Vec<usize>,
    finished: bool,
}

impl Progress for Tally {
    fn begin(&mut self, rows: usize) {
        self.begun = rows;
    }
    fn log(&mut self, msg: &str) {
        self.logged.push(msg.to_string());
    }
    fn row_done(&mut self, row: usize, _records: usize, _path: &Path) {
        self.done.push(row);
    }
    fn row_failed(&mut self, row: usize, _msg: &str) {
        self.failed.push(row);
    }
    fn finish(&mut self) {
        self.finished = true;
    }
}

#[test]
fn skipped_rows_leave_no_trace() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("book.xlsx");
    let config = table(&format!(
        "output_filepath,excel_sheet_name,discovery_columns\n\
         {},Data,reference\n\
         APPEND,Data,reference\n\
         APPEND,Data,reference\n",
        quoted(&out)
    ));
    let api = ScriptedApi::new()
        .page(records("A", 1), Some("null"))
        .fail(502)
        .page(records("C", 1), Some("null"));

    let mut tally = Tally::default();
    let summary = run_table(&config, &api, true, Some(&mut tally)).unwrap();

    assert_eq!(summary.rows_processed, 2);
    assert_eq!(summary.rows_failed, 1);
    assert_eq!(tally.begun, 3);
    assert_eq!(tally.done, vec![1, 3]);
    assert_eq!(tally.failed, vec![2]);
    assert!(tally.finished);
    assert!(out.is_file());
}

#[test]
fn config_errors_are_fatal_even_when_skipping() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a.csv");
    let config = table(&format!(
        "output_filepath,discovery_columns,output_encoding\n\
         {},reference,\n\
         APPEND,reference,not-a-real-encoding\n",
        quoted(&out)
    ));
    let api = ScriptedApi::new().page(records("A", 1), Some("null"));

    let err = run_table(&config, &api, true, None).unwrap_err();
    assert!(matches!(
        err,
        HarvestError::Config(ConfigError::UnknownEncoding { row: 2, .. })
    ));
    // the first row was already written
    assert_eq!(read_csv(&out).len(), 2);
}

#[test]
fn a_row_without_destination_stops_the_run() {
    let config = table("discovery_columns,sps.searchQuery\nreference,petition\n");
    let api = ScriptedApi::new();

    let err = run_table(&config, &api, false, None).unwrap_err();
    assert!(matches!(
        err,
        HarvestError::Config(ConfigError::MissingDestination { row: 1 })
    ));
    assert_eq!(api.calls(), 0);
}

#[test]
fn labels_colliding_on_identifier_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = table(&format!(
        "labels,output_filepath\n\"Nature of request,NATURE OF REQUEST\",{}\n",
        quoted(&dir.path().join("x.csv"))
    ));
    let err = run_table(&config, &ScriptedApi::new(), false, None).unwrap_err();
    assert!(matches!(err, HarvestError::Config(ConfigError::DuplicateLabel { .. })));
}

#[test]
fn an_explicit_pattern_names_its_own_columns() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("explicit.csv");
    let config = table(&format!(
        "regex,output_filepath,discovery_columns\n\"Petitioners:\\s*(?P<who>[^.]*)\",{},reference\n",
        quoted(&out)
    ));
    let api = ScriptedApi::new().page(
        vec![
            described("SC 8/3/1", "Petitioners: Jane Doe. Seal: wax"),
            described("SC 8/3/2", "Addressees: the king"),
        ],
        Some("null"),
    );

    run_table(&config, &api, false, None).unwrap();
    let rows = read_csv(&out);
    assert_eq!(rows[0], vec!["reference", "who", "no_label_data", "possible_unlisted_labels"]);
    assert_eq!(rows[1], vec!["SC 8/3/1", "Jane Doe", "False", "Petitioners; Seal"]);
    // no match: every identifier absent, the run goes on
    assert_eq!(rows[2], vec!["SC 8/3/2", "", "True", "Addressees"]);
}

#[test]
fn ignored_columns_are_reported_to_progress() {
    let dir = tempfile::tempdir().unwrap();
    let config = table(&format!(
        "output_filepath,notes,discovery_columns\n{},check later,reference\n",
        quoted(&dir.path().join("n.csv"))
    ));
    let api = ScriptedApi::new().page(records("A", 1), Some("null"));

    let mut tally = Tally::default();
    run_table(&config, &api, false, Some(&mut tally)).unwrap();
    assert_eq!(tally.logged, vec!["ignoring column \"notes\""]);
    assert_eq!(tally.done, vec![1]);
}

#[test]
fn cap_holds_while_the_reported_count_keeps_rising() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("rising.csv");
    let config = table(&format!(
        "output_filepath,discovery_columns,max_records\n{},reference,50\n",
        quoted(&out)
    ));
    let api = ScriptedApi::new()
        .page_counted(records("A", 20), 20, Some("m1"))
        .page_counted(records("B", 20), 40, Some("m2"))
        .page_counted(records("C", 20), 60, Some("m3"))
        .page_counted(records("D", 20), 80, Some("m4"));

    let summary = run_table(&config, &api, false, None).unwrap();
    assert_eq!(api.calls(), 3);
    assert_eq!(summary.records_written, 50);
    assert_eq!(read_csv(&out).len(), 51);
}
