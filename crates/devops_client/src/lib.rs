//! Crate for reading security configuration from the Azure DevOps REST API.
//!
//! This crate provides [`DevOpsClient`], which implements the collaborator
//! traits of `drift_core` ([`ProjectService`], [`GraphService`] and
//! [`SecurityService`]) on top of the Azure DevOps projects, graph and
//! security endpoints. The client is read-only; it never changes remote state.
//!
//! ## Examples
//!
//! ```no_run
//! use devops_client::{ClientSettings, Credentials, DevOpsClient};
//! use url::Url;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ClientSettings::new(Url::parse("https://dev.azure.com/contoso")?);
//! let client = DevOpsClient::new(settings, Credentials::personal_access_token("my-pat"))?;
//!
//! let services = client.into_services();
//! # let _ = services;
//! # Ok(())
//! # }
//! ```

use drift_core::Services;
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

pub mod errors;
pub use errors::Error;

pub mod models;
use models::{AccessControlList, ListResponse, SecurityNamespace};

mod graph_service;
mod project_service;
mod security_service;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

const API_VERSION: &str = "7.1";
const GRAPH_API_VERSION: &str = "7.1-preview.1";
const CONTINUATION_TOKEN_HEADER: &str = "x-ms-continuationtoken";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of access control list requests in flight per snapshot.
const ACL_CONCURRENCY: usize = 4;

type AclCell = Arc<OnceCell<Arc<Vec<AccessControlList>>>>;

/// Credentials used to authenticate against Azure DevOps.
#[derive(Debug)]
pub enum Credentials {
    /// A personal access token, sent as basic auth with an empty user name.
    PersonalAccessToken(SecretString),

    /// A user name and password, sent as basic auth.
    Basic {
        username: String,
        password: SecretString,
    },
}

impl Credentials {
    pub fn personal_access_token(token: impl Into<String>) -> Self {
        Self::PersonalAccessToken(SecretString::from(token.into()))
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::PersonalAccessToken(token) => {
                request.basic_auth("", Some(token.expose_secret()))
            }
            Self::Basic { username, password } => {
                request.basic_auth(username, Some(password.expose_secret()))
            }
        }
    }
}

/// Connection settings for [`DevOpsClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Organization URL, e.g. `https://dev.azure.com/contoso`.
    pub organization_url: Url,

    /// Graph (identity) service URL. Derived from the organization URL when
    /// not set.
    pub graph_url: Option<Url>,

    /// Names of the built-in groups that are never reported obsolete.
    pub special_groups: Vec<String>,

    /// Request timeout.
    pub timeout: Duration,
}

impl ClientSettings {
    pub fn new(organization_url: Url) -> Self {
        Self {
            organization_url,
            graph_url: None,
            special_groups: vec!["Project Valid Users".to_string()],
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_graph_url(mut self, graph_url: Url) -> Self {
        self.graph_url = Some(graph_url);
        self
    }

    pub fn with_special_groups(mut self, special_groups: Vec<String>) -> Self {
        self.special_groups = special_groups;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Read-only client for the Azure DevOps REST API.
pub struct DevOpsClient {
    http: reqwest::Client,
    organization_url: Url,
    graph_url: Url,
    credentials: Credentials,
    special_groups: Vec<String>,
    namespace_cache: OnceCell<Arc<Vec<SecurityNamespace>>>,
    acl_cache: Mutex<HashMap<Uuid, AclCell>>,
}

impl DevOpsClient {
    /// Creates a client for the organization in `settings`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if the graph URL cannot be derived from the
    /// organization URL, or `Error::Request` if the HTTP client cannot be built.
    pub fn new(settings: ClientSettings, credentials: Credentials) -> Result<Self, Error> {
        let graph_url = match settings.graph_url {
            Some(url) => url,
            None => derive_graph_url(&settings.organization_url)?,
        };

        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("drift/", env!("CARGO_PKG_VERSION")))
            .build()?;

        debug!(
            organization_url = %settings.organization_url,
            graph_url = %graph_url,
            "Created Azure DevOps client"
        );

        Ok(Self {
            http,
            organization_url: settings.organization_url,
            graph_url,
            credentials,
            special_groups: settings.special_groups,
            namespace_cache: OnceCell::new(),
            acl_cache: Mutex::new(HashMap::new()),
        })
    }

    /// Bundles this client as the collaborators of a reconciliation run.
    pub fn into_services(self) -> Services {
        let client = Arc::new(self);
        Services::new(client.clone(), client.clone(), client)
    }

    pub fn organization_url(&self) -> &Url {
        &self.organization_url
    }

    pub fn graph_url(&self) -> &Url {
        &self.graph_url
    }

    fn organization_endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        endpoint(&self.organization_url, segments, API_VERSION)
    }

    fn graph_endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        endpoint(&self.graph_url, segments, GRAPH_API_VERSION)
    }

    /// Sends an authenticated request and maps failure statuses to errors.
    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, Error> {
        let response = self
            .credentials
            .apply(request.header(reqwest::header::ACCEPT, "application/json"))
            .send()
            .await?;

        let status = response.status();
        // A rejected token is answered with a sign-in page and status 203.
        if status.is_success() && status != StatusCode::NON_AUTHORITATIVE_INFORMATION {
            return Ok(response);
        }

        warn!(
            status = status.as_u16(),
            url = %url,
            "Azure DevOps request failed"
        );

        Err(match status {
            StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::NON_AUTHORITATIVE_INFORMATION => Error::AuthError(format!(
                "request to '{}' was rejected with status {}",
                url,
                status.as_u16()
            )),
            StatusCode::NOT_FOUND => Error::NotFound(url.to_string()),
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimitExceeded,
            _ => Error::Http {
                status: status.as_u16(),
                url: url.to_string(),
            },
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let response = self.send(self.http.get(url.clone()), &url).await?;
        read_json(response).await
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.http.post(url.clone()).json(body), &url)
            .await?;
        read_json(response).await
    }

    /// Reads every page of a list endpoint, following continuation tokens.
    async fn get_paged<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        let mut items = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut page_url = url.clone();
            if let Some(token) = &continuation {
                page_url
                    .query_pairs_mut()
                    .append_pair("continuationToken", token);
            }

            let response = self.send(self.http.get(page_url.clone()), &page_url).await?;
            let next = response
                .headers()
                .get(CONTINUATION_TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
                .map(str::to_string);

            let page: ListResponse<T> = read_json(response).await?;
            debug!(
                url = %page_url,
                page_size = page.value.len(),
                has_more = next.is_some(),
                "Read page"
            );
            items.extend(page.value);

            match next {
                Some(token) if continuation.as_deref() != Some(token.as_str()) => {
                    continuation = Some(token)
                }
                _ => break,
            }
        }

        Ok(items)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Appends `segments` to the path of `base` and sets the API version.
fn endpoint(base: &Url, segments: &[&str], api_version: &str) -> Result<Url, Error> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::InvalidUrl(format!("'{}' cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    url.query_pairs_mut().append_pair("api-version", api_version);
    Ok(url)
}

/// Derives the graph service URL from an organization URL.
///
/// `dev.azure.com/{org}` maps to `vssps.dev.azure.com/{org}` and
/// `{org}.visualstudio.com` maps to `{org}.vssps.visualstudio.com`. Any other
/// host (e.g. an on-premises server) serves the graph API itself.
fn derive_graph_url(organization_url: &Url) -> Result<Url, Error> {
    let mut graph_url = organization_url.clone();
    let Some(host) = organization_url.host_str() else {
        return Err(Error::InvalidUrl(format!(
            "'{}' has no host",
            organization_url
        )));
    };

    let host = host.to_ascii_lowercase();
    let graph_host = if host == "dev.azure.com" {
        Some("vssps.dev.azure.com".to_string())
    } else {
        host.strip_suffix(".visualstudio.com")
            .filter(|account| !account.ends_with(".vssps"))
            .map(|account| format!("{}.vssps.visualstudio.com", account))
    };

    if let Some(graph_host) = graph_host {
        graph_url.set_host(Some(&graph_host))?;
    }

    Ok(graph_url)
}
