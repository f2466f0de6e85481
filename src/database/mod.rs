//! Read-only site database.
//!
//! A database is a top-level object whose entries are either single records
//! (bound with `model = "key"`) or arrays of records (bound with
//! `collection = "key"`). Records are opaque: they are only ever read by
//! field name, never copied or mutated.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::core::JsonMap;

/// Key -> record (or array of records).
#[derive(Debug, Clone, Default)]
pub struct Database {
    entries: JsonMap,
}

impl Database {
    pub fn new(entries: JsonMap) -> Self {
        Self { entries }
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(entries) => Ok(Self::new(entries)),
            other => bail!("database must be an object of named entries, found {}", kind_of(&other)),
        }
    }

    /// Load a `.json` or `.toml` database file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read database {}", path.display()))?;

        let value: Value = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("failed to parse database {}", path.display()))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("failed to parse database {}", path.display()))?,
            _ => bail!(
                "unsupported database format {}; use a .json or .toml file",
                path.display()
            ),
        };

        Self::from_value(value)
    }

    /// Look up an entry. `null` entries count as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).filter(|v| !v.is_null())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Why a model field cannot fill a URL placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamIssue {
    /// No field, `null`, or an empty string.
    Missing,
    /// An array or object; carries its [`kind_of`] name.
    Unsupported(&'static str),
}

/// Read a model field as a URL placeholder value.
///
/// Strings are used verbatim; numbers and booleans are formatted.
pub fn param_value<'a>(model: Option<&'a Value>, key: &str) -> Result<Cow<'a, str>, ParamIssue> {
    match model.and_then(|m| m.get(key)) {
        None | Some(Value::Null) => Err(ParamIssue::Missing),
        Some(Value::String(s)) if s.is_empty() => Err(ParamIssue::Missing),
        Some(Value::String(s)) => Ok(Cow::Borrowed(s.as_str())),
        Some(Value::Number(n)) => Ok(Cow::Owned(n.to_string())),
        Some(Value::Bool(b)) => Ok(Cow::Borrowed(if *b { "true" } else { "false" })),
        Some(other) => Err(ParamIssue::Unsupported(kind_of(other))),
    }
}

/// Short JSON type name for diagnostics.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
