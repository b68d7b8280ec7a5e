use crate::ast::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

/// Named data source instances an expression is evaluated against.
///
/// The JSON form is a single object whose keys are data source ids, e.g.
/// `{"sale": {"Amount": 120}, "allSales": [...]}`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct ExecutionContext {
    sources: BTreeMap<String, Value>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load an execution context from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.sources.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.sources.get(name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl From<serde_json::Value> for ExecutionContext {
    fn from(json: serde_json::Value) -> Self {
        let sources = match Value::from(json) {
            Value::Record(fields) => fields,
            _ => BTreeMap::new(),
        };
        Self { sources }
    }
}
