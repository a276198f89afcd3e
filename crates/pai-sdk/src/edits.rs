use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of a key/value editor (parameters or secrets).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyValueEdit {
    pub key: String,
    pub value: String,
}

impl KeyValueEdit {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Folds editor rows into a mapping. A later row overwrites an earlier one with
/// the same key in place; rows whose final value (or key) is empty are dropped.
pub fn reduce_key_value_edits(edits: &[KeyValueEdit]) -> Map<String, Value> {
    apply_key_value_edits(&Map::new(), edits)
}

/// Applies editor rows on top of an existing mapping. Untouched entries keep
/// their value and type; an empty value removes the key.
pub fn apply_key_value_edits(
    base: &Map<String, Value>,
    edits: &[KeyValueEdit],
) -> Map<String, Value> {
    let folded = edits.iter().fold(base.clone(), |mut acc, edit| {
        acc.insert(edit.key.clone(), Value::String(edit.value.clone()));
        acc
    });
    folded
        .into_iter()
        .filter(|(key, value)| !key.is_empty() && value.as_str() != Some(""))
        .collect()
}

/// Seeds editor rows from an existing mapping. Non-string values are shown as compact JSON.
pub fn edits_from_mapping(mapping: &Map<String, Value>) -> Vec<KeyValueEdit> {
    mapping
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            KeyValueEdit::new(key.clone(), value)
        })
        .collect()
}

/// Parses `key=value`; the value may be empty (`key=` clears the key on reduce).
pub fn parse_assignment(input: &str) -> Result<KeyValueEdit, String> {
    let Some((key, value)) = input.split_once('=') else {
        return Err(format!("expected KEY=VALUE, got `{input}`"));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{input}`"));
    }
    Ok(KeyValueEdit::new(key, value))
}

#[cfg(test)]
#[path = "edits_test.rs"]
mod tests;
