// src/record.rs
//! One catalogue entry as returned by the search API.
//!
//! Kept as the raw JSON object so that any configured column can be
//! projected, not only the canonical ones.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::consts::{DESCRIPTION_FIELD, LIST_SEP};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Free-text description, if the record has one.
    pub fn description(&self) -> Option<&str> {
        self.0.get(DESCRIPTION_FIELD).and_then(Value::as_str)
    }

    /// Render one field as a table cell. Missing fields are empty.
    pub fn cell(&self, field: &str) -> String {
        self.0.get(field).map(render).unwrap_or_default()
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => s!(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(render)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(LIST_SEP),
        Value::Object(_) => value.to_string(),
    }
}
