// src/fetch.rs
//! Paged retrieval of one configuration row's query.
//!
//! The search API hands back a batch of records plus a `nextBatchMark`.
//! The same query is re-issued with the cursor parameter set to that mark
//! until one of these holds:
//! - the mark equals the cursor just sent (no more pages),
//! - the mark is the literal `"null"` (or missing),
//! - the configured record cap has been reached,
//! - a page came back empty.
//!
//! Records keep the order the API returned them in. Nothing is retried:
//! the first failed request fails the whole fetch.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    config::consts::{CURSOR_END, CURSOR_PARAM, CURSOR_START},
    error::FetchError,
    progress::Progress,
    record::Record,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    One(String),
    Many(Vec<String>),
}

/// Named request parameters, scalar or list-valued.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    params: BTreeMap<String, ParamValue>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) {
        self.params.insert(name.into(), value);
    }

    pub fn set_one(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.set(name, ParamValue::One(value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Current cursor, when it is set as a scalar.
    pub fn cursor(&self) -> Option<&str> {
        match self.params.get(CURSOR_PARAM) {
            Some(ParamValue::One(v)) => Some(v),
            _ => None,
        }
    }

    /// Copy of this query pointing at another page.
    pub fn with_cursor(&self, mark: &str) -> Query {
        let mut next = self.clone();
        next.set_one(CURSOR_PARAM, mark);
        next
    }

    /// Flattened `(name, value)` pairs; list parameters repeat their name.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::with_capacity(self.params.len());
        for (name, value) in &self.params {
            match value {
                ParamValue::One(v) => out.push((name.as_str(), v.as_str())),
                ParamValue::Many(vs) => {
                    out.extend(vs.iter().map(|v| (name.as_str(), v.as_str())));
                }
            }
        }
        out
    }
}

/// One response of the search API.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(rename = "nextBatchMark", default)]
    pub next_batch_mark: Option<String>,
}

/// The request/response contract the pager relies on.
pub trait SearchApi {
    fn search(&self, query: &Query) -> Result<Page, FetchError>;
}

pub struct PagedFetcher<'a> {
    api: &'a dyn SearchApi,
    cap: Option<usize>,
}

impl<'a> PagedFetcher<'a> {
    /// `cap` of `None` or `Some(0)` means fetch until the source runs dry.
    pub fn new(api: &'a dyn SearchApi, cap: Option<usize>) -> Self {
        Self { api, cap: cap.filter(|&c| c > 0) }
    }

    pub fn fetch(
        &self,
        query: &Query,
        row: usize,
        mut progress: Option<&mut (dyn Progress + '_)>,
    ) -> Result<Vec<Record>, FetchError> {
        let mut cursor = s!(CURSOR_START);
        let mut records: Vec<Record> = Vec::new();
        let mut pages = 0usize;

        loop {
            let page = self.api.search(&query.with_cursor(&cursor))?;
            pages += 1;

            let got = page.records.len();
            debug!(row, cursor = %cursor, next = ?page.next_batch_mark, got, count = page.count, "page fetched");
            records.extend(page.records);

            if let Some(p) = progress.as_deref_mut() {
                p.page_fetched(row, records.len(), page.count);
            }

            if let Some(cap) = self.cap {
                if records.len() >= cap {
                    records.truncate(cap);
                    info!(row, cap, "record cap reached");
                    break;
                }
            }
            if got == 0 {
                break;
            }
            match page.next_batch_mark {
                Some(next) if next != cursor && next != CURSOR_END => cursor = next,
                _ => break,
            }
        }

        info!(row, pages, records = records.len(), "fetch complete");
        Ok(records)
    }
}
