//! HTTP utilities for the provisioning API client.
//!
//! [`HttpClient`] wraps a shared `reqwest` client with the base URL, default
//! headers, bearer authentication and the status handling every endpoint
//! needs.

use std::{collections::HashMap, sync::Arc, time::Duration};

use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, trace};
use url::Url;

use crate::client::ApiError;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for HTTP requests with common settings
#[derive(Debug, Clone)]
pub struct HttpRequestConfig {
    /// Base URL for the API
    pub base_url: Url,
    /// Default headers to include with all requests
    pub default_headers: HashMap<String, String>,
    pub timeout: Duration,
    /// Log response bodies as well as status lines
    pub log_bodies: bool,
}

impl HttpRequestConfig {
    pub fn new(base_url: Url) -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert(
            "User-Agent".to_string(),
            format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        );

        Self {
            base_url,
            default_headers,
            timeout: DEFAULT_TIMEOUT,
            log_bodies: false,
        }
    }
}

/// HTTP client wrapper with common request handling logic
#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    config: HttpRequestConfig,
    auth_token: Option<String>,
}

impl HttpClient {
    pub fn new(config: HttpRequestConfig, auth_token: Option<String>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            config,
            auth_token,
        })
    }

    /// Builds the URL of an endpoint from its path segments.
    ///
    /// Segments are percent-encoded, so identifiers can be passed as they are.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get<T>(&self, url: Url) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::GET, url)).await?;
        self.parse(response).await
    }

    pub async fn post<T, B>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(self.request(Method::POST, url).json(body)).await?;
        self.parse(response).await
    }

    pub async fn put<T, B>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(self.request(Method::PUT, url).json(body)).await?;
        self.parse(response).await
    }

    /// DELETE ignores the response body.
    pub async fn delete(&self, url: Url) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        let mut request = self.client.request(method, url);

        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        for (key, value) in &self.config.default_headers {
            request = request.header(key, value);
        }
        request
    }

    /// Sends the request and turns any non-2xx status into an error.
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        debug!("Response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if self.config.log_bodies {
            debug!("Response body: {}", body);
        }
        Err(ApiError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }

    async fn parse<T>(&self, response: reqwest::Response) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let text = response.text().await?;
        if self.config.log_bodies {
            debug!("Response body: {}", text);
        } else {
            trace!("Raw response text for deserialization: {}", text);
        }

        serde_json::from_str::<T>(&text).map_err(|e| {
            error!("Failed to deserialize response: {}. Raw response: {}", e, text);
            ApiError::JsonError(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(HttpRequestConfig::new(Url::parse(base).unwrap()), None).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = HttpRequestConfig::new(Url::parse("https://api.example.com").unwrap());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.default_headers["User-Agent"].starts_with("cloud-cli/"));
        assert!(!config.log_bodies);
    }

    #[test]
    fn endpoint_appends_segments_to_the_base_path() {
        let url = client("https://api.example.com/")
            .endpoint(&["api", "v1", "organizations", "org-1"])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/v1/organizations/org-1");

        let url = client("https://example.com/cloud").endpoint(&["api", "v1"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/cloud/api/v1");
    }

    #[test]
    fn endpoint_encodes_identifiers() {
        let url = client("https://api.example.com").endpoint(&["assets", "a b/c"]).unwrap();
        assert_eq!(url.path(), "/assets/a%20b%2Fc");
    }

    #[test]
    fn cannot_be_a_base_urls_are_rejected() {
        let error = client("mailto:ops@example.com").endpoint(&["x"]).unwrap_err();
        assert!(matches!(error, ApiError::InvalidUrl(_)));
    }
}
