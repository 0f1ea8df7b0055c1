//! JSON file access for the corpus.

use crate::error::ConfigurationError;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// `{ key: text }`
pub type FlatTable = HashMap<String, String>;
/// `{ sign: { house: text } }`
pub type NestedTable = HashMap<String, FlatTable>;

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// Read and parse a required JSON file.
pub fn read_required<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigurationError> {
    if !path.is_file() {
        return Err(ConfigurationError::MissingFile { path: display(path) });
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigurationError::Unreadable {
        path: display(path),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigurationError::Malformed {
        path: display(path),
        source,
    })
}

/// Read an optional JSON file. Absence is not an error.
pub fn read_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigurationError> {
    if !path.exists() {
        log::info!("Optional corpus file {} not present", path.display());
        return Ok(None);
    }
    read_required(path).map(Some)
}

/// Outcome of checking one profection house file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfectionCheck {
    pub entries: BTreeMap<u8, FlatTable>,
    /// Keys present beyond the required 24, per house
    pub extra_keys: BTreeMap<u8, Vec<String>>,
}

/// Load `profection_house_<n>.json` and check it carries every required key
/// as a string. Missing keys are collected and reported together.
pub fn read_profection_house(
    path: &Path,
    required: &[String],
) -> Result<(FlatTable, Vec<String>), ConfigurationError> {
    let raw: BTreeMap<String, serde_json::Value> = read_required(path)?;

    let missing: Vec<String> = required
        .iter()
        .filter(|key| !raw.contains_key(key.as_str()))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(ConfigurationError::MissingKeys {
            path: display(path),
            keys: missing,
        });
    }

    let mut table = FlatTable::with_capacity(raw.len());
    let mut extra = Vec::new();
    for (key, value) in raw {
        let is_required = required.iter().any(|r| *r == key);
        match value {
            serde_json::Value::String(text) => {
                table.insert(key.clone(), text);
            }
            other if is_required => {
                return Err(ConfigurationError::UnexpectedShape {
                    path: display(path),
                    message: format!("entry {} must be text, found {}", key, json_kind(&other)),
                });
            }
            _ => {}
        }
        if !is_required {
            extra.push(key);
        }
    }
    Ok((table, extra))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "text",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
