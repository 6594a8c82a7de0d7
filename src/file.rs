// src/file.rs
//! Output routing: which file (and sheet) a row's table lands in, and how.
//!
//! - A path seen for the first time this run is created/overwritten; a path
//!   seen before is appended to. For CSV that means rows without a second
//!   header; for spreadsheets it means another sheet in the same workbook.
//! - CSV is written through immediately. Workbooks are buffered and saved
//!   once, by `finish`, after the last row. An error before that loses them.

use std::{
    collections::{HashMap, HashSet},
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Component, Path, PathBuf},
};

use encoding_rs::Encoding;
use tracing::{debug, info};

use crate::{
    config::{consts::SPREADSHEET_EXT, Destination},
    core::sanitize::sanitize_path,
    csv::to_csv_bytes,
    error::{ConfigError, Result},
    sheet::{allocate_sheet_name, default_sheet_name, SheetBook},
    store::DataSet,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    Delimited,
    Spreadsheet,
}

impl OutputKind {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case(SPREADSHEET_EXT) => OutputKind::Spreadsheet,
            _ => OutputKind::Delimited,
        }
    }
}

/// Where one row's table goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub path: PathBuf,
    pub kind: OutputKind,
    /// First time this run the path is used.
    pub is_new: bool,
    /// Spreadsheets only.
    pub sheet: Option<String>,
}

#[derive(Default)]
pub struct OutputRouter {
    last_path: Option<PathBuf>,
    seen: HashSet<PathBuf>,
    books: HashMap<PathBuf, SheetBook>,
    /// Paths in the order they were first written.
    written: Vec<PathBuf>,
}

impl OutputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }

    /// Resolve a row's destination. Nothing is written yet; the sheet name
    /// is only reserved once `write` succeeds.
    pub fn resolve(
        &mut self,
        row: usize,
        dest: Option<&Destination>,
        sheet: Option<&str>,
    ) -> Result<Target> {
        let path = match dest {
            None => return Err(ConfigError::MissingDestination { row }.into()),
            Some(Destination::Append) => self
                .last_path
                .clone()
                .ok_or(ConfigError::NoPreviousDestination { row })?,
            Some(Destination::Path(p)) => resolve_path(p)?,
        };
        self.last_path = Some(path.clone());

        let kind = OutputKind::for_path(&path);
        let sheet = match kind {
            OutputKind::Spreadsheet => {
                let existing = self.books.get(&path).map(SheetBook::names).unwrap_or(&[]);
                Some(allocate_sheet_name(existing, sheet, &path)?)
            }
            OutputKind::Delimited => None,
        };

        let target = Target { is_new: !self.seen.contains(&path), path, kind, sheet };
        debug!(row, ?target, "output resolved");
        Ok(target)
    }

    pub fn write(&mut self, target: &Target, data: &DataSet, enc: &'static Encoding) -> Result<()> {
        let first = !self.seen.contains(&target.path);

        match target.kind {
            OutputKind::Delimited => {
                if let Some(parent) = target.path.parent() {
                    ensure_directory(parent)?;
                }
                let bytes = to_csv_bytes(data, first, enc)?;
                if first {
                    write_start(&target.path, &bytes)?;
                } else {
                    append(&target.path, &bytes)?;
                }
            }
            OutputKind::Spreadsheet => {
                let book = self.books.entry(target.path.clone()).or_default();
                let name = target
                    .sheet
                    .clone()
                    .unwrap_or_else(|| default_sheet_name(book.names().len()));
                book.add_sheet(&name, data)?;
            }
        }

        if self.seen.insert(target.path.clone()) {
            self.written.push(target.path.clone());
        }
        Ok(())
    }

    /// Save every buffered workbook, once. Returns all paths written this run.
    pub fn finish(mut self) -> Result<Vec<PathBuf>> {
        for path in &self.written {
            if let Some(book) = self.books.get_mut(path) {
                if let Some(parent) = path.parent() {
                    ensure_directory(parent)?;
                }
                book.save(path)?;
                info!(path = %path.display(), sheets = book.names().len(), "workbook saved");
            }
        }
        Ok(self.written)
    }
}

/// Sanitize the segments that don't exist yet, then make the path absolute
/// with `.` and `..` folded away, so every spelling of a file maps to one key.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(sanitize_path(path))?;
    let mut out = PathBuf::new();
    for comp in absolute.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                // `/..` stays `/`
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if dir.exists() && !dir.is_dir() {
        return Err(std::io::Error::other(format!(
            "Path exists but is not a directory: {}",
            dir.display()
        ))
        .into());
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Create/truncate and write.
fn write_start(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut out = File::create(path)?;
    out.write_all(bytes)?;
    out.flush()?;
    Ok(())
}

/// Append to a file created earlier in the run.
fn append(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut out = OpenOptions::new().append(true).open(path)?;
    out.write_all(bytes)?;
    out.flush()?;
    Ok(())
}
