use crate::cli::{OutputFormat, RenderCommand, UpdateCommand, ValidateCommand};
use crate::config::{PortalConfig, PortalConfigError};
use pai_core::StructuredIssue;
use pai_sdk::{
    roles_from_document, validate_protocol_text, validate_protocol_value, JobBasicInfo,
    ProtocolDocument, ProtocolError,
};
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("read `{path}` failed: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] PortalConfigError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("protocol validation failed:\n{0}")]
    Invalid(String),
}

pub fn execute_validate(command: &ValidateCommand) -> Result<String, CliError> {
    let text = read_text(&command.file)?;
    let errors = validate_protocol_text(&text);
    if !errors.is_empty() {
        tracing::info!(file = %command.file.display(), "protocol document is invalid");
        return Err(CliError::Invalid(errors));
    }
    tracing::info!(file = %command.file.display(), "protocol document is valid");
    Ok("ok".to_string())
}

pub fn execute_render(command: &RenderCommand) -> Result<String, CliError> {
    let document = load_document(&command.file)?;
    render(&document, command.format)
}

pub fn execute_update(command: &UpdateCommand, config: &PortalConfig) -> Result<String, CliError> {
    let mut document = load_document(&command.file)?;
    // Role views read the document's own deployment group, so they are taken
    // before a configured deployment name renames it.
    let roles = roles_from_document(&document);
    if let Some(deployment) = &config.defaults.deployment {
        let current = document.defaults.get("deployment").and_then(Value::as_str);
        if current.map_or(true, str::is_empty) {
            document
                .defaults
                .insert("deployment".to_string(), Value::String(deployment.clone()));
        }
    }

    let mut basic_info = JobBasicInfo::from_protocol(&document);
    if let Some(name) = &command.name {
        basic_info.name = name.clone();
    }
    if let Some(retry) = command.retry {
        basic_info.job_retry_count = retry;
    }
    match &command.virtual_cluster {
        Some(virtual_cluster) => basic_info.virtual_cluster = virtual_cluster.clone(),
        None if basic_info.virtual_cluster.is_empty() => {
            basic_info.virtual_cluster = config.defaults.virtual_cluster.clone();
        }
        None => {}
    }

    let updated = document.derive_with_applied_edits(
        &basic_info,
        &roles,
        &command.params,
        &command.secrets,
    );
    tracing::info!(
        file = %command.file.display(),
        parameter_edits = command.params.len(),
        secret_edits = command.secrets.len(),
        "applied edits to protocol document"
    );

    if command.check {
        let issues = validate_protocol_value(&updated.to_value()?);
        if !issues.is_empty() {
            return Err(CliError::Invalid(StructuredIssue::render_lines(&issues)));
        }
    }
    render(&updated, command.format)
}

fn load_document(path: &Path) -> Result<ProtocolDocument, CliError> {
    let text = read_text(path)?;
    Ok(ProtocolDocument::from_yaml(&text)?)
}

fn render(document: &ProtocolDocument, format: OutputFormat) -> Result<String, CliError> {
    let text = match format {
        OutputFormat::Yaml => document.to_yaml()?,
        OutputFormat::Json => document.to_json()?,
    };
    Ok(text)
}

fn read_text(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
