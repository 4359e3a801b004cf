use super::*;

#[test]
fn test_auth_error_display() {
    let error = Error::Auth("No personal access token".to_string());
    assert_eq!(
        error.to_string(),
        "Authentication error: No personal access token"
    );
}

#[test]
fn test_config_error_from_configuration_error() {
    let error: Error = ConfigurationError::FileNotFound {
        path: "drift.toml".to_string(),
    }
    .into();

    assert_eq!(
        error.to_string(),
        "Configuration error: Configuration file not found: drift.toml"
    );
}

#[test]
fn test_drift_error_from_drift_error() {
    let error: Error = DriftError::UnknownPattern {
        key: "web".to_string(),
        pattern: "Hardened".to_string(),
    }
    .into();

    assert!(matches!(error, Error::Drift(_)));
    assert!(error.to_string().contains("unknown pattern 'Hardened'"));
}

#[test]
fn test_client_error_from_client_error() {
    let error: Error = devops_client::Error::RateLimitExceeded.into();

    assert!(matches!(error, Error::Client(_)));
}

#[test]
fn test_invalid_arguments_error_display() {
    let error = Error::InvalidArguments("--service-url is required".to_string());
    assert_eq!(
        error.to_string(),
        "Invalid arguments: --service-url is required"
    );
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}
