use pai_core::{FieldPath, StructuredIssue};
use serde_json::{Map, Value};

/// Parses YAML (and therefore JSON) text into a JSON value.
pub fn parse_yaml_value(input: &str) -> Result<Value, Vec<StructuredIssue>> {
    let yaml_value: serde_yaml::Value = serde_yaml::from_str(input).map_err(|err| {
        let message = err.to_string();
        let reference = if message.to_ascii_lowercase().contains("duplicate") {
            "yaml.duplicate_key"
        } else {
            "yaml.parse_error"
        };
        vec![StructuredIssue::error(
            "parse_error",
            FieldPath::root(),
            format!("yaml parse failed: {message}"),
            reference,
        )]
    })?;

    serde_json::to_value(yaml_value).map_err(|err| {
        vec![StructuredIssue::error(
            "parse_error",
            FieldPath::root(),
            format!("yaml-to-json conversion failed: {err}"),
            "yaml.to_json_error",
        )]
    })
}

/// Like [`parse_yaml_value`], but the document root must be a mapping.
pub fn parse_yaml_mapping(input: &str) -> Result<Map<String, Value>, Vec<StructuredIssue>> {
    match parse_yaml_value(input)? {
        Value::Object(object) => Ok(object),
        other => Err(vec![StructuredIssue::error(
            "parse_error",
            FieldPath::root(),
            format!("document root must be a mapping, got {}", value_kind(&other)),
            "parse.root_not_mapping",
        )]),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "an empty document",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
