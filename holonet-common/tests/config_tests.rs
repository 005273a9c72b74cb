//! Configuration resolution tests
//!
//! Tests that touch HOLONET_* environment variables are marked #[serial] so
//! they never run in parallel with each other.

use holonet_common::config::{
    load_toml_config, AggregatorConfig, ConfigOverrides, ENV_BASE_URL, ENV_CONFIG, ENV_TIMEOUT_SECS,
};
use holonet_common::Error;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_toml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn test_toml_file_is_loaded() {
    let file = write_toml(
        r#"
base_url = "http://mirror.test/api"
request_timeout_secs = 4
reuse_first_page = true
some_future_key = "ignored"
"#,
    );

    let toml = load_toml_config(file.path()).unwrap();
    assert_eq!(toml.base_url.as_deref(), Some("http://mirror.test/api"));
    assert_eq!(toml.request_timeout_secs, Some(4));
    assert_eq!(toml.reuse_first_page, Some(true));
}

#[test]
fn test_missing_toml_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let toml = load_toml_config(&dir.path().join("absent.toml")).unwrap();
    assert!(toml.base_url.is_none());
    assert!(toml.request_timeout_secs.is_none());
}

#[test]
fn test_malformed_toml_file_is_error() {
    let file = write_toml("base_url = [not toml");
    let err = load_toml_config(file.path()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
#[serial]
fn test_resolve_reads_environment_and_config_file() {
    let file = write_toml("base_url = \"http://file.test/api\"\nrequest_timeout_secs = 25\n");

    env::set_var(ENV_CONFIG, file.path());
    env::set_var(ENV_TIMEOUT_SECS, "7");
    env::remove_var(ENV_BASE_URL);

    let config = AggregatorConfig::resolve(&ConfigOverrides::default()).unwrap();

    env::remove_var(ENV_CONFIG);
    env::remove_var(ENV_TIMEOUT_SECS);

    assert_eq!(config.base_url, "http://file.test/api");
    assert_eq!(config.request_timeout_secs, 7);
}

#[test]
#[serial]
fn test_cli_config_path_beats_environment() {
    let cli_file = write_toml("bind_addr = \"0.0.0.0:9000\"\n");
    let env_file = write_toml("bind_addr = \"0.0.0.0:9999\"\n");

    env::set_var(ENV_CONFIG, env_file.path());
    let cli = ConfigOverrides {
        config_path: Some(cli_file.path().to_path_buf()),
        ..Default::default()
    };
    let config = AggregatorConfig::resolve(&cli).unwrap();
    env::remove_var(ENV_CONFIG);

    assert_eq!(config.bind_addr, "0.0.0.0:9000");
}
