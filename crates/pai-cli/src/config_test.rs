use super::{expand_env_placeholders, load_portal_config, PortalConfig, PortalConfigError};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn write_temp_file(prefix: &str, extension: &str, content: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_nanos();
    let path = std::env::temp_dir().join(format!(
        "{prefix}-{}-{nanos}.{extension}",
        std::process::id()
    ));
    fs::write(&path, content).expect("write temp file");
    path
}

#[test]
fn load_portal_config_parses_yaml() {
    let path = write_temp_file(
        "portal-config-ok",
        "yaml",
        r#"
schema: pai-portal/0.0.1
defaults:
  virtual_cluster: research
  deployment: gpu
log_level: debug
"#,
    );

    let config = load_portal_config(path.as_path()).expect("config must load");
    assert_eq!(config.defaults.virtual_cluster, "research");
    assert_eq!(config.defaults.deployment.as_deref(), Some("gpu"));
    assert_eq!(config.log_level.as_deref(), Some("debug"));
}

#[test]
fn load_portal_config_parses_json_with_defaults() {
    let path = write_temp_file("portal-config-json", "json", r#"{"schema": "pai-portal/0.0.1"}"#);

    let config = load_portal_config(path.as_path()).expect("config must load");
    assert_eq!(config, PortalConfig::default());
    assert_eq!(config.defaults.virtual_cluster, "default");
}

#[test]
fn env_placeholders_are_expanded() {
    std::env::set_var("PAI_CONFIG_TEST_VC", "from-env");
    let path = write_temp_file(
        "portal-config-env",
        "yml",
        "defaults:\n  virtual_cluster: ${PAI_CONFIG_TEST_VC}\n",
    );

    let config = load_portal_config(path.as_path()).expect("config must load");
    assert_eq!(config.defaults.virtual_cluster, "from-env");
}

#[test]
fn missing_env_var_is_a_parse_error() {
    let error = expand_env_placeholders("vc: ${PAI_CONFIG_TEST_DEFINITELY_UNSET}")
        .expect_err("must fail");
    assert!(error.contains("PAI_CONFIG_TEST_DEFINITELY_UNSET"));
    assert!(expand_env_placeholders("vc: ${unterminated").is_err());
    assert!(expand_env_placeholders("vc: ${}").is_err());
}

#[test]
fn invalid_values_are_reported_as_issues() {
    let path = write_temp_file(
        "portal-config-bad",
        "yaml",
        r#"
schema: pai-portal/9
defaults:
  virtual_cluster: ""
  deployment: " "
"#,
    );

    let issues = match load_portal_config(path.as_path()) {
        Err(PortalConfigError::Validation(issues)) => issues,
        other => panic!("expected validation error, got {other:?}"),
    };
    let references = issues
        .iter()
        .filter_map(|issue| issue.reference.as_deref())
        .collect::<Vec<_>>();
    assert!(references.contains(&"portal.config.schema"));
    assert!(references.contains(&"portal.config.defaults.virtual_cluster"));
    assert!(references.contains(&"portal.config.defaults.deployment"));
}

#[test]
fn missing_file_is_a_read_error() {
    let error = load_portal_config(std::path::Path::new("/nonexistent/portal.yaml"))
        .expect_err("must fail");
    assert!(matches!(error, PortalConfigError::ReadFile { .. }));
}
