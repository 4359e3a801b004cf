//! Connection settings for the remote platform.

use serde::{Deserialize, Serialize};
use url::Url;

/// The `[connection]` section of the configuration file.
///
/// # Examples
///
/// ```rust
/// use config_manager::ConnectionConfig;
///
/// let config: ConnectionConfig = toml::from_str(
///     r#"
///     organization_url = "https://dev.azure.com/contoso"
///     timeout_seconds = 60
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.timeout_seconds, 60);
/// assert_eq!(config.special_groups, vec!["Project Valid Users"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Organization URL, e.g. `https://dev.azure.com/contoso`. May be
    /// supplied on the command line instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_url: Option<Url>,

    /// Graph service URL. Derived from the organization URL when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_url: Option<Url>,

    /// Built-in groups that are never reported obsolete and are exempt from
    /// namespace checks.
    #[serde(default = "default_special_groups")]
    pub special_groups: Vec<String>,

    /// HTTP request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_special_groups() -> Vec<String> {
    vec!["Project Valid Users".to_string()]
}

fn default_timeout() -> u64 {
    30
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            organization_url: None,
            graph_url: None,
            special_groups: default_special_groups(),
            timeout_seconds: default_timeout(),
        }
    }
}
