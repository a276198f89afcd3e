use super::{execute_render, execute_update, execute_validate, CliError};
use crate::cli::{OutputFormat, RenderCommand, UpdateCommand, ValidateCommand};
use crate::config::{PortalConfig, PortalDefaults};
use pai_sdk::{KeyValueEdit, ProtocolDocument};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const JOB_YAML: &str = r#"
protocolVersion: 2
name: mnist
type: job
prerequisites:
  - type: dockerimage
    name: image_0
    uri: train:latest
    auth:
      username: bot
      password: <% $secrets.registry_pass %>
parameters:
  epochs: "10"
secrets:
  registry_pass: hunter2
taskRoles:
  worker:
    instances: 1
    dockerImage: image_0
    commands:
      - python train.py
"#;

fn write_job(prefix: &str, content: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_nanos();
    let path = std::env::temp_dir().join(format!("{prefix}-{}-{nanos}.yaml", std::process::id()));
    fs::write(&path, content).expect("write temp file");
    path
}

fn update_command(file: PathBuf) -> UpdateCommand {
    UpdateCommand {
        file,
        name: None,
        retry: None,
        virtual_cluster: None,
        params: Vec::new(),
        secrets: Vec::new(),
        check: true,
        format: OutputFormat::Yaml,
    }
}

#[test]
fn validate_accepts_valid_document() {
    let file = write_job("run-validate-ok", JOB_YAML);
    let output = execute_validate(&ValidateCommand { file }).expect("must validate");
    assert_eq!(output, "ok");
}

#[test]
fn validate_reports_schema_errors() {
    let file = write_job("run-validate-bad", "protocolVersion: 2\nname: mnist\ntype: job\n");
    let error = execute_validate(&ValidateCommand { file }).expect_err("must fail");
    assert!(matches!(error, CliError::Invalid(_)));
    assert!(error.to_string().contains("taskRoles"));
}

#[test]
fn render_outputs_json_without_empty_fields() {
    let file = write_job("run-render-json", JOB_YAML);
    let output = execute_render(&RenderCommand {
        file,
        format: OutputFormat::Json,
    })
    .expect("must render");
    let value: serde_json::Value = serde_json::from_str(&output).expect("json output");
    assert_eq!(value["protocolVersion"], json!(2));
    assert_eq!(value["taskRoles"]["worker"]["dockerImage"], json!("image_0"));
    assert!(value.get("deployments").is_none());
    assert!(value.get("description").is_none());
}

#[test]
fn update_applies_edits_and_config_defaults() {
    let file = write_job("run-update", JOB_YAML);
    let mut command = update_command(file);
    command.name = Some("mnist-v2".to_string());
    command.params = vec![KeyValueEdit::new("lr", "0.01"), KeyValueEdit::new("epochs", "")];
    command.secrets = vec![KeyValueEdit::new("registry_pass", "rotated")];
    let config = PortalConfig {
        defaults: PortalDefaults {
            virtual_cluster: "research".to_string(),
            deployment: Some("gpu".to_string()),
        },
        ..PortalConfig::default()
    };

    let output = execute_update(&command, &config).expect("must update");
    let updated = ProtocolDocument::from_yaml(&output).expect("output must parse");
    assert_eq!(updated.name, "mnist-v2");
    assert_eq!(updated.parameters.get("epochs"), None);
    assert_eq!(updated.parameters["lr"], json!("0.01"));
    assert_eq!(updated.secrets["registry_pass"], json!("rotated"));
    assert_eq!(updated.defaults["virtualCluster"], json!("research"));
    assert_eq!(updated.defaults["deployment"], json!("gpu"));
    assert_eq!(
        updated.prerequisites[0]["auth"]["password"],
        json!("<% $secrets.registry_pass %>")
    );
}

#[test]
fn update_drops_credential_when_secret_is_removed() {
    let file = write_job("run-update-drop", JOB_YAML);
    let mut command = update_command(file);
    command.secrets = vec![KeyValueEdit::new("registry_pass", "")];

    let output = execute_update(&command, &PortalConfig::default()).expect("must update");
    let updated = ProtocolDocument::from_yaml(&output).expect("output must parse");
    assert!(updated.secrets.is_empty());
    // The reference was resolved before the edit, so the token is still written.
    assert_eq!(
        updated.prerequisites[0]["auth"]["password"],
        json!("<% $secrets.registry_pass %>")
    );

    let reparsed_roles = pai_sdk::roles_from_document(&updated);
    assert!(reparsed_roles[0].container.auth.is_empty());
}

#[test]
fn update_check_rejects_invalid_result() {
    let file = write_job("run-update-invalid", JOB_YAML);
    let mut command = update_command(file);
    command.name = Some("not a valid name".to_string());

    let error = execute_update(&command, &PortalConfig::default()).expect_err("must fail");
    assert!(matches!(error, CliError::Invalid(_)));
}

#[test]
fn missing_file_is_reported() {
    let error = execute_render(&RenderCommand {
        file: PathBuf::from("/nonexistent/job.yaml"),
        format: OutputFormat::Yaml,
    })
    .expect_err("must fail");
    assert!(matches!(error, CliError::ReadFile { .. }));
}

const DEPLOYED_JOB_YAML: &str = r#"
protocolVersion: 2
name: mnist
type: job
prerequisites:
  - type: dockerimage
    name: image_0
    uri: train:latest
parameters:
  epochs: 10
  layers: [64, 32]
secrets:
  registry:
    username: bot
    password: hunter2
taskRoles:
  worker:
    instances: 1
    dockerImage: image_0
    commands:
      - python train.py
deployments:
  - name: defaultDeployment
    taskRoles:
      worker:
        preCommands:
          - pip install -r requirements.txt
"#;

#[test]
fn configured_deployment_name_renames_existing_group() {
    let file = write_job("run-update-deployment", DEPLOYED_JOB_YAML);
    let config = PortalConfig {
        defaults: PortalDefaults {
            virtual_cluster: "default".to_string(),
            deployment: Some("gpu".to_string()),
        },
        ..PortalConfig::default()
    };

    let output = execute_update(&update_command(file), &config).expect("must update");
    let updated = ProtocolDocument::from_yaml(&output).expect("output must parse");
    assert_eq!(updated.deployments.len(), 1);
    assert_eq!(updated.deployments[0].name, "gpu");
    assert_eq!(
        updated.deployments[0].task_roles["worker"]["preCommands"],
        json!(["pip install -r requirements.txt"])
    );
    assert_eq!(updated.defaults["deployment"], json!("gpu"));
}

#[test]
fn single_deployment_group_survives_update_without_config() {
    let content = DEPLOYED_JOB_YAML.replace("name: defaultDeployment", "name: prod");
    let file = write_job("run-update-single-deployment", &content);

    let output = execute_update(&update_command(file), &PortalConfig::default()).expect("must update");
    let updated = ProtocolDocument::from_yaml(&output).expect("output must parse");
    assert_eq!(updated.deployments[0].name, "prod");
    assert_eq!(
        updated.deployments[0].task_roles["worker"]["preCommands"],
        json!(["pip install -r requirements.txt"])
    );
}

#[test]
fn update_without_edits_keeps_value_types() {
    let file = write_job("run-update-typed", DEPLOYED_JOB_YAML);

    let output = execute_update(&update_command(file), &PortalConfig::default()).expect("must update");
    let updated = ProtocolDocument::from_yaml(&output).expect("output must parse");
    assert_eq!(
        updated.secrets["registry"],
        json!({"username": "bot", "password": "hunter2"})
    );
    assert_eq!(updated.parameters["epochs"], json!(10));
    assert_eq!(updated.parameters["layers"], json!([64, 32]));
}

#[test]
fn update_edits_overlay_existing_values() {
    let file = write_job("run-update-overlay", DEPLOYED_JOB_YAML);
    let mut command = update_command(file);
    command.params = vec![KeyValueEdit::new("epochs", "20")];

    let output = execute_update(&command, &PortalConfig::default()).expect("must update");
    let updated = ProtocolDocument::from_yaml(&output).expect("output must parse");
    assert_eq!(updated.parameters["epochs"], json!("20"));
    assert_eq!(updated.parameters["layers"], json!([64, 32]));
    assert_eq!(updated.secrets["registry"]["username"], json!("bot"));
}
