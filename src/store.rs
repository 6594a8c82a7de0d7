// src/store.rs
//! In-memory result table of one configuration row.

use crate::{
    config::consts::{LIST_SEP, NO_LABELS_COLUMN, RESIDUAL_COLUMN},
    extract::{self, ExtractionResult},
    grammar::Grammar,
    record::Record,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    /// Project records onto `columns`, then add one column per grammar
    /// identifier plus the two extraction flags. Without a grammar the
    /// extraction columns are left out entirely.
    pub fn from_records(records: &[Record], columns: &[String], grammar: Option<&Grammar>) -> Self {
        let mut headers: Vec<String> = columns.to_vec();
        if let Some(g) = grammar {
            headers.extend(g.ids().iter().cloned());
            headers.push(s!(NO_LABELS_COLUMN));
            headers.push(s!(RESIDUAL_COLUMN));
        }

        let rows = records
            .iter()
            .map(|rec| {
                let mut row: Vec<String> = columns.iter().map(|c| rec.cell(c)).collect();
                if let Some(g) = grammar {
                    append_extraction(&mut row, &extract_record(rec, g));
                }
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Records without a description extract nothing.
fn extract_record(rec: &Record, grammar: &Grammar) -> ExtractionResult {
    match rec.description() {
        Some(text) => extract::extract(text, grammar),
        None => ExtractionResult {
            values: grammar.ids().iter().map(|id| (id.clone(), None)).collect(),
            nothing_extracted: true,
            residual: None,
        },
    }
}

fn append_extraction(row: &mut Vec<String>, result: &ExtractionResult) {
    row.extend(result.values.iter().map(|(_, v)| v.clone().unwrap_or_default()));
    row.push(s!(if result.nothing_extracted { "True" } else { "False" }));
    row.push(result.residual.as_ref().map(|r| r.join(LIST_SEP)).unwrap_or_default());
}
