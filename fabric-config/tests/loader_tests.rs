use fabric_config::{ConfigError, ConfigLoader, FabricConfig};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

const SAMPLE: &str = r#"
api:
  base_url: https://fabric.example.test
  request_timeout_secs: 15
auth:
  tenant_id: tenant-file
  client_id: client-file
principals:
  service_principal_object_id: sp-file
  role: Member
environments:
  dev:
    workspace_name: "[D] Fabric Blueprint"
    capacity_id: cap-dev
  prod:
    workspace_name: "[P] Fabric Blueprint"
"#;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_explicit_path_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.yaml");
    fs::write(&path, SAMPLE).unwrap();

    let config = ConfigLoader::new().with_path(&path).load_with(no_env).unwrap();

    assert_eq!(config.api.base_url, "https://fabric.example.test");
    assert_eq!(config.api.request_timeout_secs, 15);
    assert_eq!(config.api.create_timeout_secs, 60);
    assert_eq!(config.environment("dev").unwrap().capacity_id, "cap-dev");
    assert_eq!(config.principals.role.to_string(), "Member");
}

#[test]
fn test_missing_explicit_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = ConfigLoader::new()
        .with_path(dir.path().join("absent.yaml"))
        .load_with(no_env)
        .unwrap_err();

    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn test_env_var_path_beats_working_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("fabric.yaml"), "api:\n  base_url: https://local.test\n").unwrap();
    let other = dir.path().join("other.yaml");
    fs::write(&other, SAMPLE).unwrap();
    let other_str = other.to_string_lossy().to_string();

    let config = ConfigLoader::new()
        .with_search_dir(dir.path())
        .load_with(|key| (key == "FABRIC_CONFIG").then(|| other_str.clone()))
        .unwrap();

    assert_eq!(config.api.base_url, "https://fabric.example.test");
}

#[test]
fn test_working_directory_file_is_found() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("fabric.yaml"), SAMPLE).unwrap();

    let config = ConfigLoader::new()
        .with_search_dir(dir.path())
        .load_with(no_env)
        .unwrap();

    assert_eq!(config.environments.len(), 2);
}

#[test]
fn test_defaults_when_nothing_is_found() {
    let dir = TempDir::new().unwrap();
    let config = ConfigLoader::new()
        .with_search_dir(dir.path())
        .load_with(no_env)
        .unwrap();

    assert_eq!(config, FabricConfig::default());
}

#[test]
fn test_empty_file_means_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fabric.yaml");
    fs::write(&path, "\n").unwrap();

    let config = ConfigLoader::new().with_path(&path).load_with(no_env).unwrap();
    assert_eq!(config, FabricConfig::default());
}

#[test]
fn test_malformed_yaml_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "api: [unclosed\n").unwrap();

    let err = ConfigLoader::new().with_path(&path).load_with(no_env).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.yaml"));
}

#[test]
fn test_environment_overrides_apply_after_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fabric.yaml");
    fs::write(&path, SAMPLE).unwrap();

    let config = ConfigLoader::new()
        .with_path(&path)
        .load_with(|key| match key {
            "FABRIC_CLIENT_SECRET" => Some("s3cret".to_string()),
            "FABRIC_CAPACITY_ID_PROD" => Some("cap-prod".to_string()),
            "DEPLOYMENT_SP_OBJECT_ID" => Some("".to_string()),
            _ => None,
        })
        .unwrap();

    assert!(config.auth.has_client_secret());
    assert_eq!(config.environment("prod").unwrap().capacity_id, "cap-prod");
    assert_eq!(config.principals.service_principal_object_id, "sp-file");
}

#[test]
fn test_environment_without_workspace_name_is_invalid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fabric.yaml");
    fs::write(&path, "environments:\n  dev:\n    capacity_id: cap-1\n").unwrap();

    let err = ConfigLoader::new().with_path(&path).load_with(no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
#[serial]
fn test_load_reads_process_environment() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fabric.yaml");
    fs::write(&path, SAMPLE).unwrap();

    std::env::set_var("FABRIC_CAPACITY_ID_DEV", "cap-from-process");
    let result = ConfigLoader::new().with_path(&path).load();
    std::env::remove_var("FABRIC_CAPACITY_ID_DEV");

    let config = result.unwrap();
    assert_eq!(config.environment("dev").unwrap().capacity_id, "cap-from-process");
}
