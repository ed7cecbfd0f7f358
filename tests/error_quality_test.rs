//! Error message quality tests
//!
//! Tests that verify error messages are helpful and distinguishable.

use truenas_health_exporter::error::ExporterError;

#[test]
fn test_config_error_message_clarity() {
    // Given: A configuration error
    let error = ExporterError::Config("no targets configured".to_string());

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should clearly indicate configuration issue
    assert!(message.contains("Configuration error"));
    assert!(message.contains("no targets configured"));
}

#[test]
fn test_status_error_names_endpoint_and_code() {
    // Given: A non-2xx response from the pool endpoint
    let error = ExporterError::Status {
        endpoint: "pool".to_string(),
        status: reqwest::StatusCode::UNAUTHORIZED,
    };

    // When: Converting to string
    let message = error.to_string();

    // Then: Endpoint and status are both visible
    assert!(message.contains("TrueNAS API error"));
    assert!(message.contains("pool"));
    assert!(message.contains("401"));
}

#[test]
fn test_json_error_from_serde() {
    // Given: Malformed JSON from the API
    let serde_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();

    // When: Converting into ExporterError
    let error: ExporterError = serde_err.into();

    // Then: Message should indicate JSON problem
    assert!(matches!(error, ExporterError::Json(_)));
    assert!(error.to_string().contains("JSON error"));
}

#[test]
fn test_server_error_message() {
    let error = ExporterError::Server("failed to bind 0.0.0.0:9814".to_string());

    assert!(error.to_string().contains("HTTP server error"));
    assert!(error.to_string().contains("9814"));
}

#[test]
fn test_error_types_are_distinguishable() {
    let config = ExporterError::Config("x".to_string());
    let server = ExporterError::Server("x".to_string());

    assert_ne!(config.to_string(), server.to_string());
}

#[test]
fn test_error_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<ExporterError>();
}
