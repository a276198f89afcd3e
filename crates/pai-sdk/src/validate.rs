use crate::parse::parse_yaml_value;
use pai_core::StructuredIssue;
use pai_schema::validate_schema_instance;
use pai_schema::versions::SCHEMA_JOB_PROTOCOL_2;
use serde_json::Value;

pub fn validate_protocol_value(value: &Value) -> Vec<StructuredIssue> {
    validate_schema_instance(SCHEMA_JOB_PROTOCOL_2, value)
}

/// Parses and schema-checks protocol text. Returns an empty string when the text
/// is valid, otherwise one `<path>: <message>` line per issue.
pub fn validate_protocol_text(input: &str) -> String {
    let issues = match parse_yaml_value(input) {
        Ok(value) => validate_protocol_value(&value),
        Err(issues) => issues,
    };
    if issues.is_empty() {
        tracing::debug!("protocol text passed schema validation");
    } else {
        tracing::debug!(issue_count = issues.len(), "protocol text rejected");
    }
    StructuredIssue::render_lines(&issues)
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
