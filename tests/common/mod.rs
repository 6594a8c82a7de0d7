// tests/common/mod.rs
#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque};

use discovery_harvest::{
    error::FetchError,
    fetch::{Page, Query, SearchApi},
    record::Record,
};
use serde_json::{json, Value};

/// Search API stand-in: hands out scripted responses in order and keeps
/// every query it was asked. An exhausted script answers with an empty page.
#[derive(Default)]
pub struct ScriptedApi {
    replies: RefCell<VecDeque<Result<Page, FetchError>>>,
    pub asked: RefCell<Vec<Query>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, records: Vec<Value>, next: Option<&str>) -> Self {
        let count = records.len() as u64;
        self.page_counted(records, count, next)
    }

    /// A page whose reported total differs from its own size.
    pub fn page_counted(self, records: Vec<Value>, count: u64, next: Option<&str>) -> Self {
        let page = Page {
            count,
            records: records.into_iter().map(Record::from).collect(),
            next_batch_mark: next.map(str::to_string),
        };
        self.replies.borrow_mut().push_back(Ok(page));
        self
    }

    pub fn fail(self, status: u16) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Err(FetchError::Status { status, body: "upstream unavailable".into() }));
        self
    }

    pub fn cursors(&self) -> Vec<String> {
        self.asked
            .borrow()
            .iter()
            .map(|q| q.cursor().unwrap_or_default().to_string())
            .collect()
    }

    pub fn calls(&self) -> usize {
        self.asked.borrow().len()
    }
}

impl SearchApi for ScriptedApi {
    fn search(&self, query: &Query) -> Result<Page, FetchError> {
        self.asked.borrow_mut().push(query.clone());
        self.replies.borrow_mut().pop_front().unwrap_or_else(|| Ok(Page::default()))
    }
}

/// `n` records with references `<prefix>/1..=n`.
pub fn records(prefix: &str, n: usize) -> Vec<Value> {
    (1..=n)
        .map(|i| json!({ "reference": format!("{prefix}/{i}"), "id": format!("C{i}") }))
        .collect()
}

pub fn described(reference: &str, description: &str) -> Value {
    json!({ "reference": reference, "description": description })
}

/// Read a CSV file back as rows of strings, header included.
pub fn read_csv(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .unwrap();
    rdr.records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}
