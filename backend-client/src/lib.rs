mod error;

pub use error::RequestError;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use srcview_protocol::ImplResults;
use srcview_protocol::SearchResults;
use srcview_protocol::SourceFile;
use srcview_protocol::SourceResponse;
use srcview_protocol::SummaryData;
use std::time::Duration;
use tracing::debug;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Talks to the analysis server. Every call resolves to the decoded payload
/// or a [`RequestError`]; nothing is retried.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, RequestError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized).map_err(|source| RequestError::InvalidUrl {
            endpoint: base_url.to_string(),
            source,
        })?;
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|source| RequestError::Network {
                endpoint: base_url.to_string(),
                source,
            })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, RequestError> {
        let mut url = self
            .base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|source| RequestError::InvalidUrl {
                endpoint: endpoint.to_string(),
                source,
            })?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    /// Issues one request and decodes the body as JSON. An empty success
    /// body decodes to `null`.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, RequestError> {
        let url = self.endpoint_url(endpoint, params)?;
        debug!(%method, %url, "backend request");
        let network = |source| RequestError::Network {
            endpoint: endpoint.to_string(),
            source,
        };
        let resp = self
            .http
            .request(method, url)
            .send()
            .await
            .map_err(network)?;
        let status = resp.status();
        let body = resp.text().await.map_err(network)?;
        if !status.is_success() {
            return Err(RequestError::Server {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|source| RequestError::Parse {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, RequestError> {
        let value = self.request(method, endpoint, params).await?;
        serde_json::from_value(value).map_err(|source| RequestError::Parse {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    pub async fn summary(&self, id: &str) -> Result<SummaryData, RequestError> {
        self.request_as(Method::POST, "summary", &[("id", id)]).await
    }

    pub async fn source(&self, file: &str) -> Result<SourceFile, RequestError> {
        let endpoint = format!("src/{}", file.trim_start_matches('/'));
        let SourceResponse::Source(file) = self.request_as(Method::GET, &endpoint, &[]).await?;
        Ok(file)
    }

    pub async fn find_uses(&self, id: &str) -> Result<SearchResults, RequestError> {
        self.request_as(Method::GET, "search", &[("id", id)]).await
    }

    pub async fn find_impls(&self, id: &str) -> Result<SearchResults, RequestError> {
        let impls: ImplResults = self.request_as(Method::GET, "find", &[("impls", id)]).await?;
        Ok(impls.into())
    }

    /// Asks the server to open `link` (`<file>:<line>`) in the user's editor.
    pub async fn edit(&self, link: &str) -> Result<(), RequestError> {
        self.request(Method::POST, "edit", &[("file", link)]).await?;
        Ok(())
    }
}
