//! Configuration loading tests
//!
//! Tests for YAML parsing, defaults, and fatal validation errors.

use secrecy::ExposeSecret;
use std::io::Write;
use tempfile::NamedTempFile;
use truenas_health_exporter::config::Config;
use truenas_health_exporter::error::ExporterError;

/// Helper to write a config document to a temporary file
fn write_config(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_example_config_loads() {
    // Given: The example config shipped with the repository
    // When: Loading it
    let config = Config::load("config/example.yaml").expect("Failed to load example config");

    // Then: Both targets are present with trailing slashes trimmed
    assert_eq!(config.listen_port, 9814);
    assert_eq!(config.target_names(), vec!["nas01", "backup"]);
    assert_eq!(config.targets[1].api_url, "https://backup.lan");
    assert!(!config.targets[0].verify_ssl);
    assert!(config.targets[1].verify_ssl);
}

#[test]
fn test_full_config_with_comments_and_blank_lines() {
    // Given: A config with comments, blank lines and quoted scalars
    let file = write_config(
        r#"
# exporter settings
listen_port: 9900

targets:
  # primary box
  - name: "nas01"
    api_url: 'https://10.0.0.5'
    api_token: "1-secret"

    verify_ssl: true
  - name: nas02
    api_url: https://10.0.0.6
    api_token: 2-other
"#,
    );

    // When: Loading the config
    let config = Config::load(file.path()).expect("Failed to load config");

    // Then: Scalars are unquoted and coerced
    assert_eq!(config.listen_port, 9900);
    assert_eq!(config.targets.len(), 2);
    assert_eq!(config.targets[0].name, "nas01");
    assert_eq!(config.targets[0].api_url, "https://10.0.0.5");
    assert_eq!(config.targets[0].api_token.expose_secret(), "1-secret");
    assert!(config.targets[0].verify_ssl);
    assert_eq!(config.targets[1].api_token.expose_secret(), "2-other");
}

#[test]
fn test_defaults_applied() {
    // Given: A config without listen_port or verify_ssl
    let file = write_config(
        r#"
targets:
  - name: nas
    api_url: https://nas.lan
    api_token: token
"#,
    );

    // When: Loading the config
    let config = Config::load(file.path()).expect("Failed to load config");

    // Then: Defaults are used
    assert_eq!(config.listen_port, 9814);
    assert_eq!(config.listen_addr, "0.0.0.0");
    assert!(!config.targets[0].verify_ssl);
}

#[test]
fn test_missing_file_is_config_error() {
    // Given: A path that does not exist
    // When: Loading it
    let err = Config::load("/nonexistent/truenas-exporter.yaml").unwrap_err();

    // Then: The error names the path
    assert!(matches!(err, ExporterError::Config(_)));
    let message = err.to_string();
    assert!(message.contains("not found"), "got: {}", message);
    assert!(message.contains("/nonexistent/truenas-exporter.yaml"));
}

#[test]
fn test_missing_targets_is_fatal() {
    // Given: A parseable config without targets
    let file = write_config("listen_port: 9814\n");

    // When: Loading it
    let err = Config::load(file.path()).unwrap_err();

    // Then: Loading fails with a clear message
    assert!(err.to_string().contains("no targets configured"));
}

#[test]
fn test_empty_target_list_is_fatal() {
    let file = write_config("targets: []\n");
    let err = Config::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("no targets configured"));
}

#[test]
fn test_duplicate_target_names_rejected() {
    // Given: Two targets sharing a name
    let file = write_config(
        r#"
targets:
  - name: nas
    api_url: https://a.lan
    api_token: a
  - name: nas
    api_url: https://b.lan
    api_token: b
"#,
    );

    // When: Loading the config
    let err = Config::load(file.path()).unwrap_err();

    // Then: The duplicate is reported
    assert!(err.to_string().contains("duplicate target name: nas"));
}

#[test]
fn test_target_without_token_rejected() {
    let file = write_config(
        r#"
targets:
  - name: nas
    api_url: https://a.lan
"#,
    );

    assert!(Config::load(file.path()).is_err());
}

#[test]
fn test_token_not_exposed_in_debug_output() {
    // Given: A loaded config
    let file = write_config(
        r#"
targets:
  - name: nas
    api_url: https://a.lan
    api_token: super-secret-token
"#,
    );
    let config = Config::load(file.path()).expect("Failed to load config");

    // When: Formatting with Debug
    let debug = format!("{:?}", config);

    // Then: The token is redacted
    assert!(!debug.contains("super-secret-token"));
}
