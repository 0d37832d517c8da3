use std::env;
use std::pin::Pin;
use std::time::Duration;

use futures::Stream;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, header};
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::sse::process_sse;
use crate::types::{AgentEvent, RunRequest};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Client for a streaming research-agent backend.
///
/// The backend exposes a single endpoint, `POST /run_sse`, which answers
/// with an SSE-framed stream of agent events.
#[derive(Debug, Clone)]
pub struct AgentClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl AgentClient {
    /// Create a new client.
    ///
    /// The base URL can be provided directly or read from the
    /// TEAMCHAT_BASE_URL environment variable; without either, the client
    /// targets a local backend.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url
            .or_else(|| env::var("TEAMCHAT_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url)
            .map_err(|e| Error::url(format!("Invalid base URL '{base_url}': {e}"), Some(e)))?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {e}"),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Create and return default headers for backend requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/event-stream"),
        );
        headers
    }

    /// Start an agent run and stream its events.
    ///
    /// Issues one POST to `/run_sse` with the request envelope. A non-2xx
    /// status fails uniformly with [`Error::Api`] carrying the status
    /// code; the code is not otherwise inspected. On success the response
    /// body is handed to the SSE processor and the resulting event stream
    /// returned.
    pub async fn run_sse(
        &self,
        request: &RunRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<AgentEvent>> + Send>>> {
        let url = self.base_url.join("run_sse")?;

        CLIENT_REQUESTS.click();
        let response = self
            .client
            .post(url)
            .headers(self.default_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                CLIENT_REQUEST_ERRORS.click();
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {e}"),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {e}"), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {e}"), Some(Box::new(e)))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            CLIENT_REQUEST_ERRORS.click();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(status.as_u16(), body));
        }

        let stream = response.bytes_stream();
        Ok(Box::pin(process_sse(stream)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation_defaults() {
        let client = AgentClient::new(Some(DEFAULT_BASE_URL.to_string())).unwrap();
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn client_creation_custom() {
        let client = AgentClient::with_options(
            Some("https://agents.example.com/".to_string()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(client.base_url().as_str(), "https://agents.example.com/");
        assert_eq!(client.timeout, Duration::from_secs(30));
    }

    #[test]
    fn endpoint_join() {
        let client = AgentClient::new(Some("http://localhost:8000/".to_string())).unwrap();
        let url = client.base_url().join("run_sse").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/run_sse");
    }

    #[test]
    fn invalid_base_url_rejected() {
        let result = AgentClient::new(Some("not a url".to_string()));
        assert!(result.is_err());
    }
}
