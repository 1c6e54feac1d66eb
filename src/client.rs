//! Thin client for the gitignore template service.
//!
//! The service exposes two endpoints:
//!
//! - `GET {base}/list` returns every template name as one comma separated body
//! - `GET {base}/{a,b,c}` returns the server-side merge of the named templates
//!
//! Unknown names do not produce an HTTP error. The body instead carries
//! [`ERROR_MARKER`](crate::template::ERROR_MARKER), so callers of
//! [`TemplateClient::fetch_templates`] must run [`TemplateContent::is_valid`].

use crate::error::{GitignoreError, Result};
use crate::template::{TemplateCatalog, TemplateContent, TemplateName, TemplateQuery};
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, warn};

/// Public endpoint of the gitignore.io service
pub const DEFAULT_BASE_URL: &str = "https://www.toptal.com/developers/gitignore/api";

/// Applied to every request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`TemplateClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root, without the trailing `/list` or template path
    pub base_url: String,
    /// Whole-request timeout, body included
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client for the template service. Clones share one connection pool.
#[derive(Debug, Clone)]
pub struct TemplateClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl TemplateClient {
    /// Builds a client from `config`
    ///
    /// # Errors
    ///
    /// - `GitignoreError::InvalidBaseUrl` if `config.base_url` is not an absolute http(s) URL.
    /// - `GitignoreError::Network` if the TLS backend cannot be initialised.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/');
        let base = Url::parse(base_url).map_err(|e| GitignoreError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(GitignoreError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "expected an http or https URL".to_string(),
            });
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| GitignoreError::Network {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self {
            http,
            base,
            timeout: config.timeout,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// `{base}/{segment}`, with `segment` percent-encoded as a single path segment
    fn endpoint(&self, segment: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(segment);
        }
        url
    }

    /// Fetches the combined template for `query` in a single request.
    ///
    /// Bodies of 2xx and 4xx responses are returned untouched; only 5xx is an error.
    ///
    /// # Errors
    ///
    /// - `GitignoreError::Timeout` if the request exceeds the configured timeout.
    /// - `GitignoreError::Network` for connection or decoding failures.
    /// - `GitignoreError::ServerError` for a 5xx status.
    pub async fn fetch_templates(&self, query: &TemplateQuery) -> Result<TemplateContent> {
        let url = self.endpoint(&query.joined());
        debug!(url = %url, "fetching templates");

        let response = self.send(&url).await?;
        let status = response.status();
        if status.is_server_error() {
            warn!(url = %url, status = status.as_u16(), "template service failed");
            return Err(GitignoreError::ServerError {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&url, e))?;
        debug!(url = %url, status = status.as_u16(), bytes = body.len(), "templates fetched");
        Ok(TemplateContent::new(body))
    }

    /// Like [`fetch_templates`](Self::fetch_templates), but also rejects bodies
    /// carrying the service's error marker.
    ///
    /// # Errors
    ///
    /// Everything `fetch_templates` returns, plus `GitignoreError::TemplateNotFound`.
    pub async fn fetch_valid(&self, query: &TemplateQuery) -> Result<TemplateContent> {
        let content = self.fetch_templates(query).await?;
        if content.is_valid() {
            Ok(content)
        } else {
            Err(GitignoreError::TemplateNotFound {
                names: query.joined(),
            })
        }
    }

    /// Fetches the full catalog of template names.
    ///
    /// # Errors
    ///
    /// - `GitignoreError::Timeout` / `GitignoreError::Network` on transport failure.
    /// - `GitignoreError::UnexpectedStatus` for any non-2xx status.
    pub async fn list_catalog(&self) -> Result<TemplateCatalog> {
        let url = self.endpoint("list");
        debug!(url = %url, "listing catalog");

        let response = self.send(&url).await?;
        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "catalog request failed");
            return Err(GitignoreError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&url, e))?;
        let catalog = TemplateCatalog::parse(&body);
        debug!(templates = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Lists the catalog and keeps names containing `query`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Same as [`list_catalog`](Self::list_catalog).
    pub async fn search_catalog(&self, query: &str) -> Result<Vec<TemplateName>> {
        let catalog = self.list_catalog().await?;
        Ok(catalog.search(query))
    }

    async fn send(&self, url: &Url) -> Result<reqwest::Response> {
        self.http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))
    }

    fn transport_error(&self, url: &Url, source: reqwest::Error) -> GitignoreError {
        if source.is_timeout() {
            warn!(url = %url, "request timed out");
            GitignoreError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs_f64(),
            }
        } else {
            warn!(url = %url, error = %source, "request failed");
            GitignoreError::Network {
                url: url.to_string(),
                source,
            }
        }
    }
}
