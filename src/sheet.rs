// src/sheet.rs
//! Spreadsheet side of the output: sheet naming and in-memory workbooks.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::{
    config::consts::{SHEET_DEDUP_ATTEMPTS, SHEET_NAME_FORBIDDEN, SHEET_NAME_MAX},
    error::ConfigError,
    store::DataSet,
};

/// Strip characters the format forbids and cut to the maximum length.
pub fn sanitize_sheet_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| !SHEET_NAME_FORBIDDEN.contains(c) && !c.is_control())
        .collect();
    let cut: String = kept.trim().chars().take(SHEET_NAME_MAX).collect();
    // leading/trailing apostrophes are rejected too, so trim after cutting
    s!(cut.trim().trim_matches('\'').trim())
}

pub fn default_sheet_name(existing: usize) -> String {
    format!("Sheet{}", existing + 1)
}

/// Pick a sheet name not yet used in `existing`.
///
/// No name requested → `Sheet<N+1>`. A taken name gets the next sheet
/// ordinal appended when that still fits, otherwise falls back to
/// `Sheet<N+1>`; this is retried a bounded number of times.
pub fn allocate_sheet_name(
    existing: &[String],
    requested: Option<&str>,
    path: &Path,
) -> Result<String, ConfigError> {
    let n = existing.len();
    let ordinal = (n + 1).to_string();

    let mut candidate = requested
        .map(sanitize_sheet_name)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default_sheet_name(n));

    if !is_taken(existing, &candidate) {
        return Ok(candidate);
    }
    for _ in 0..SHEET_DEDUP_ATTEMPTS {
        candidate = if candidate.chars().count() + ordinal.len() <= SHEET_NAME_MAX {
            join!(&candidate, &ordinal)
        } else {
            default_sheet_name(n)
        };
        if !is_taken(existing, &candidate) {
            return Ok(candidate);
        }
    }

    Err(ConfigError::SheetNameExhausted {
        requested: s!(requested.unwrap_or_default()),
        path: path.to_path_buf(),
        attempts: SHEET_DEDUP_ATTEMPTS,
    })
}

// Sheet names are unique regardless of case.
fn is_taken(existing: &[String], candidate: &str) -> bool {
    let lc = candidate.to_lowercase();
    existing.iter().any(|e| e.to_lowercase() == lc)
}

/// A workbook held in memory until the run finishes.
pub struct SheetBook {
    workbook: Workbook,
    names: Vec<String>,
}

impl Default for SheetBook {
    fn default() -> Self {
        Self { workbook: Workbook::new(), names: Vec::new() }
    }
}

impl SheetBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn add_sheet(&mut self, name: &str, data: &DataSet) -> Result<(), XlsxError> {
        let bold = Format::new().set_bold();
        let mut sheet = Worksheet::new();
        sheet.set_name(name)?;

        for (c, header) in data.headers.iter().enumerate() {
            sheet.write_string_with_format(0, c as u16, header, &bold)?;
        }
        for (r, row) in data.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    sheet.write_string(r as u32 + 1, c as u16, cell)?;
                }
            }
        }

        // only a fully written sheet joins the workbook
        self.workbook.push_worksheet(sheet);
        self.names.push(s!(name));
        Ok(())
    }

    pub fn save(&mut self, path: &Path) -> Result<(), XlsxError> {
        self.workbook.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s!(*s)).collect()
    }

    #[test]
    fn sanitizes_and_truncates() {
        assert_eq!(sanitize_sheet_name("SC 8: [petitions]?"), "SC 8 petitions");
        assert_eq!(sanitize_sheet_name("'quoted'"), "quoted");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40)).len(), SHEET_NAME_MAX);
    }

    #[test]
    fn cut_never_ends_in_an_apostrophe() {
        let name = format!("{}'s petitions", "x".repeat(30));
        let got = sanitize_sheet_name(&name);
        assert_eq!(got, "x".repeat(30));
        assert!(got.chars().count() <= SHEET_NAME_MAX);

        let mut book = SheetBook::new();
        let data = DataSet { headers: vec![s!("reference")], rows: vec![] };
        assert!(book.add_sheet(&got, &data).is_ok());
    }

    #[test]
    fn defaults_count_existing_sheets() {
        let p = Path::new("out.xlsx");
        assert_eq!(allocate_sheet_name(&[], None, p).unwrap(), "Sheet1");
        assert_eq!(allocate_sheet_name(&names(&["Data"]), None, p).unwrap(), "Sheet2");
        assert_eq!(allocate_sheet_name(&[], Some("???"), p).unwrap(), "Sheet1");
    }

    #[test]
    fn collision_gets_ordinal_suffix() {
        let p = Path::new("out.xlsx");
        assert_eq!(allocate_sheet_name(&names(&["Data"]), Some("Data"), p).unwrap(), "Data2");
        assert_eq!(allocate_sheet_name(&names(&["Data", "Data2"]), Some("data"), p).unwrap(), "data3");
    }

    #[test]
    fn long_name_falls_back_to_default_scheme() {
        let p = Path::new("out.xlsx");
        let long = "y".repeat(SHEET_NAME_MAX);
        let got = allocate_sheet_name(&names(&[long.as_str()]), Some(long.as_str()), p).unwrap();
        assert_eq!(got, "Sheet2");
    }

    #[test]
    fn exhausted_attempts_is_config_error() {
        let p = Path::new("out.xlsx");
        let existing = names(&["Data", "Data5", "Data55", "Data555"]);
        let err = allocate_sheet_name(&existing, Some("Data"), p).unwrap_err();
        assert!(matches!(err, ConfigError::SheetNameExhausted { attempts: 3, .. }));
    }
}
