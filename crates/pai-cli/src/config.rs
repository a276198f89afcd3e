use pai_core::{FieldPath, StructuredIssue};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const PORTAL_CONFIG_SCHEMA: &str = "pai-portal/0.0.1";
const DEFAULT_VIRTUAL_CLUSTER: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_portal_schema")]
    pub schema: String,
    #[serde(default)]
    pub defaults: PortalDefaults,
    #[serde(default)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalDefaults {
    #[serde(default = "default_virtual_cluster")]
    pub virtual_cluster: String,
    #[serde(default)]
    pub deployment: Option<String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            schema: default_portal_schema(),
            defaults: PortalDefaults::default(),
            log_level: None,
        }
    }
}

impl Default for PortalDefaults {
    fn default() -> Self {
        Self {
            virtual_cluster: default_virtual_cluster(),
            deployment: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PortalConfigError {
    #[error("read portal config failed `{path}`: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("portal config parse failed: {0}")]
    Parse(String),
    #[error("portal config validation failed:\n{}", StructuredIssue::render_lines(.0))]
    Validation(Vec<StructuredIssue>),
}

pub fn load_portal_config(path: &Path) -> Result<PortalConfig, PortalConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| PortalConfigError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    let expanded = expand_env_placeholders(raw.as_str()).map_err(PortalConfigError::Parse)?;
    let config: PortalConfig = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(expanded.as_str())
            .map_err(|error| PortalConfigError::Parse(format!("json decode error: {error}")))?,
        _ => serde_yaml::from_str(expanded.as_str())
            .map_err(|error| PortalConfigError::Parse(format!("yaml decode error: {error}")))?,
    };

    let mut issues = validate_portal_config(&config);
    StructuredIssue::sort_stable(&mut issues);
    if !issues.is_empty() {
        return Err(PortalConfigError::Validation(issues));
    }
    tracing::debug!(path = %path.display(), "loaded portal config");
    Ok(config)
}

pub fn validate_portal_config(config: &PortalConfig) -> Vec<StructuredIssue> {
    let mut issues = Vec::new();
    if config.schema != PORTAL_CONFIG_SCHEMA {
        issues.push(config_issue(
            "portal.config.schema",
            FieldPath::from_keys(["schema"]),
            format!(
                "unsupported portal config schema `{}` (expected `{PORTAL_CONFIG_SCHEMA}`)",
                config.schema
            ),
        ));
    }
    if config.defaults.virtual_cluster.trim().is_empty() {
        issues.push(config_issue(
            "portal.config.defaults.virtual_cluster",
            FieldPath::from_keys(["defaults", "virtual_cluster"]),
            "defaults.virtual_cluster must not be empty".to_string(),
        ));
    }
    if matches!(config.defaults.deployment.as_deref(), Some(name) if name.trim().is_empty()) {
        issues.push(config_issue(
            "portal.config.defaults.deployment",
            FieldPath::from_keys(["defaults", "deployment"]),
            "defaults.deployment must be omitted or non-empty".to_string(),
        ));
    }
    if let Some(level) = &config.log_level {
        if let Err(error) = EnvFilter::try_new(level) {
            issues.push(config_issue(
                "portal.config.log_level",
                FieldPath::from_keys(["log_level"]),
                format!("invalid log_level `{level}`: {error}"),
            ));
        }
    }
    issues
}

fn config_issue(reference: &str, path: FieldPath, message: String) -> StructuredIssue {
    StructuredIssue::error("portal_config_error", path, message, reference)
}

fn default_portal_schema() -> String {
    PORTAL_CONFIG_SCHEMA.to_string()
}

fn default_virtual_cluster() -> String {
    DEFAULT_VIRTUAL_CLUSTER.to_string()
}

fn expand_env_placeholders(input: &str) -> Result<String, String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err("unterminated env placeholder `${...`".to_string());
        };
        let key = &after[..end];
        if key.is_empty() {
            return Err("empty env placeholder `${}`".to_string());
        }
        let value = std::env::var(key)
            .map_err(|_| format!("missing env var for placeholder `${{{key}}}`"))?;
        out.push_str(value.as_str());
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
