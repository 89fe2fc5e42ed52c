//! GitHub infrastructure adapter.
//!
//! Implements [`pipeline::StatusPublisher`] against the GitHub commit status
//! API (`POST /repos/{owner}/{repo}/statuses/{sha}`) using `reqwest`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. Header
//! construction, transport errors and response interpretation are handled
//! here; the [`pipeline`] crate only sees [`pipeline::DeliveryError`].
//!
//! ## Delivery contract
//!
//! - One attempt per call; nothing is retried.
//! - `201 Created` is the only success.
//! - Any other status becomes
//!   [`DeliveryError::UnexpectedUpstreamResponse`] with the response body.

use std::time::Duration;

use async_trait::async_trait;
use pipeline::{Credential, DeliveryError, RevisionLocation, StatusDelivery, StatusPublisher};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("codepipeline-status/", env!("CARGO_PKG_VERSION"));

/// Errors raised while constructing the client.
#[derive(Debug, Error)]
pub enum GitHubClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Settings for [`GitHubStatusClient`].
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    /// Per-request timeout applied by the HTTP client.
    pub timeout: Duration,
    /// Replaces `https://api.<host>` as the base of every request when set.
    pub api_base: Option<String>,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            api_base: None,
        }
    }
}

/// Publishes commit statuses to GitHub.
#[derive(Debug, Clone)]
pub struct GitHubStatusClient {
    http: reqwest::Client,
    api_base: Option<String>,
}

impl GitHubStatusClient {
    pub fn new(config: GitHubClientConfig) -> Result<Self, GitHubClientError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            api_base: config
                .api_base
                .map(|base| base.trim_end_matches('/').to_string()),
        })
    }

    /// Endpoint the status for `location` is posted to.
    pub fn status_url(&self, location: &RevisionLocation) -> String {
        match &self.api_base {
            Some(base) => format!("{base}{}", location.statuses_path()),
            None => location.statuses_url(),
        }
    }
}

fn request_headers(credential: &Credential) -> Result<HeaderMap, DeliveryError> {
    let mut authorization = HeaderValue::from_str(&format!("token {}", credential.expose()))
        .map_err(|_| DeliveryError::DeliveryFailed {
            cause: "access token contains characters not allowed in a header".to_string(),
        })?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    Ok(headers)
}

fn delivery_failed(err: impl std::fmt::Display) -> DeliveryError {
    DeliveryError::DeliveryFailed {
        cause: err.to_string(),
    }
}

#[async_trait]
impl StatusPublisher for GitHubStatusClient {
    async fn publish(&self, delivery: &StatusDelivery) -> Result<(), DeliveryError> {
        let url = self.status_url(&delivery.location);
        let body = serde_json::to_vec(&delivery.report).map_err(delivery_failed)?;
        debug!(%url, state = %delivery.report.state, "posting commit status");

        let response = self
            .http
            .post(&url)
            .headers(request_headers(&delivery.credential)?)
            .body(body)
            .send()
            .await
            .map_err(delivery_failed)?;

        let status = response.status();
        if status == StatusCode::CREATED {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable response body: {e}>"));
        warn!(status = status.as_u16(), %url, "GitHub rejected commit status");
        Err(DeliveryError::UnexpectedUpstreamResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::{CommitSha, RepositoryHost, RepositoryName, RepositoryOwner};

    fn location() -> RevisionLocation {
        RevisionLocation {
            host: RepositoryHost::new("github.com").unwrap(),
            owner: RepositoryOwner::new("acme").unwrap(),
            repository: RepositoryName::new("widgets").unwrap(),
            commit: CommitSha::new("abc123").unwrap(),
        }
    }

    #[test]
    fn default_url_is_derived_from_the_locator_host() {
        let client = GitHubStatusClient::new(GitHubClientConfig::default()).unwrap();
        assert_eq!(
            client.status_url(&location()),
            "https://api.github.com/repos/acme/widgets/statuses/abc123"
        );
    }

    #[test]
    fn api_base_override_replaces_scheme_and_host() {
        let client = GitHubStatusClient::new(GitHubClientConfig {
            api_base: Some("http://127.0.0.1:9999/".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            client.status_url(&location()),
            "http://127.0.0.1:9999/repos/acme/widgets/statuses/abc123"
        );
    }

    #[test]
    fn authorization_header_uses_token_scheme_and_is_sensitive() {
        let headers = request_headers(&Credential::new("ghp_abc")).unwrap();
        let auth = headers.get(AUTHORIZATION).unwrap();
        assert_eq!(auth.to_str().unwrap(), "token ghp_abc");
        assert!(auth.is_sensitive());
        assert_eq!(
            headers.get(CONTENT_TYPE).unwrap(),
            "application/json; charset=utf-8"
        );
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn token_with_newline_is_rejected_before_sending() {
        let err = request_headers(&Credential::new("ghp\nabc")).unwrap_err();
        assert!(matches!(err, DeliveryError::DeliveryFailed { .. }));
    }
}
