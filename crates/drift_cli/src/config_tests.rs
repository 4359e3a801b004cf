use super::*;

fn connection() -> ConnectionConfig {
    ConnectionConfig {
        organization_url: Some(Url::parse("https://dev.azure.com/contoso").unwrap()),
        graph_url: Some(Url::parse("https://vssps.dev.azure.com/contoso").unwrap()),
        special_groups: vec!["Project Valid Users".to_string(), "Readers".to_string()],
        timeout_seconds: 45,
    }
}

#[test]
fn test_client_settings_from_configuration() {
    let settings = client_settings(&connection(), None).unwrap();

    assert_eq!(
        settings.organization_url.as_str(),
        "https://dev.azure.com/contoso"
    );
    assert_eq!(
        settings.graph_url.as_ref().map(|u| u.as_str()),
        Some("https://vssps.dev.azure.com/contoso")
    );
    assert_eq!(settings.special_groups, vec!["Project Valid Users", "Readers"]);
    assert_eq!(settings.timeout, Duration::from_secs(45));
}

#[test]
fn test_service_url_overrides_configuration() {
    let override_url = Url::parse("https://dev.azure.com/fabrikam").unwrap();

    let settings = client_settings(&connection(), Some(&override_url)).unwrap();

    assert_eq!(settings.organization_url, override_url);
    assert!(settings.graph_url.is_none());
}

#[test]
fn test_missing_organization_url_is_an_error() {
    let result = client_settings(&ConnectionConfig::default(), None);

    assert!(matches!(result, Err(Error::InvalidArguments(_))));
}

#[test]
fn test_pat_credentials() {
    let result = credentials(AuthType::Pat, Some("secret-token"), None, None).unwrap();

    assert!(matches!(result, Credentials::PersonalAccessToken(_)));
}

#[test]
fn test_pat_requires_token() {
    let missing = credentials(AuthType::Pat, None, Some("jane"), Some("pw"));
    let blank = credentials(AuthType::Pat, Some("  "), None, None);

    assert!(matches!(missing, Err(Error::Auth(_))));
    assert!(matches!(blank, Err(Error::Auth(_))));
}

#[test]
fn test_basic_credentials() {
    let result = credentials(AuthType::Basic, None, Some("jane"), Some("pw")).unwrap();

    match result {
        Credentials::Basic { username, .. } => assert_eq!(username, "jane"),
        other => panic!("Expected basic credentials, got {:?}", other),
    }
}

#[test]
fn test_basic_requires_username_and_password() {
    let no_user = credentials(AuthType::Basic, None, None, Some("pw"));
    let no_password = credentials(AuthType::Basic, Some("token"), Some("jane"), None);

    assert!(matches!(no_user, Err(Error::Auth(msg)) if msg.contains("--username")));
    assert!(matches!(no_password, Err(Error::Auth(msg)) if msg.contains("--password")));
}
