//! Entity source seam.
//!
//! The calendar never touches storage itself. A source hands over a full
//! snapshot of component records; decoding is lenient so one bad record
//! cannot blank the calendar.

use chrono::{SecondsFormat, TimeZone, Utc};
use serde_json::Value;
use std::path::PathBuf;

use crate::error::SourceError;
use crate::model::entity::EntityRecord;

/// Supplier of component snapshots.
pub trait EntitySource {
    /// The current snapshot, in source order.
    fn list(&self) -> Result<Vec<EntityRecord>, SourceError>;
}

/// A fixed, already-resolved snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemorySource {
    records: Vec<EntityRecord>,
}

impl InMemorySource {
    #[must_use]
    pub const fn new(records: Vec<EntityRecord>) -> Self {
        Self { records }
    }
}

impl EntitySource for InMemorySource {
    fn list(&self) -> Result<Vec<EntityRecord>, SourceError> {
        Ok(self.records.clone())
    }
}

/// Components exported as a JSON array on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EntitySource for JsonFileSource {
    fn list(&self) -> Result<Vec<EntityRecord>, SourceError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|source| SourceError::Json {
            path: self.path.clone(),
            source,
        })?;
        if !value.is_array() {
            return Err(SourceError::NotAnArray {
                path: self.path.clone(),
                found: json_kind(&value),
            });
        }
        Ok(parse_entities(&value))
    }
}

/// Decode a JSON snapshot leniently.
///
/// A non-array value is an empty snapshot; [`JsonFileSource`] reports that
/// case as [`SourceError::NotAnArray`] before decoding. Elements that are not objects
/// are skipped; missing string fields become empty and `lastModified` may
/// be a string or epoch milliseconds.
#[must_use]
pub fn parse_entities(value: &Value) -> Vec<EntityRecord> {
    let Some(items) = value.as_array() else {
        tracing::warn!(
            kind = json_kind(value),
            "component snapshot is not an array, treating as empty"
        );
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let record = parse_entity(item);
            if record.is_none() {
                tracing::warn!(index, kind = json_kind(item), "skipping non-object component");
            }
            record
        })
        .collect()
}

fn parse_entity(item: &Value) -> Option<EntityRecord> {
    let object = item.as_object()?;
    let text = |key: &str| match object.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    let priority = match object.get("priority") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };

    let last_modified = match object.get("lastModified") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        _ => None,
    };

    Some(EntityRecord {
        id: text("id"),
        name: text("name"),
        status: text("status"),
        priority,
        last_modified,
    })
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
