//! HTTP transport for fetching item bodies.
//!
//! This module provides the [`Transport`] seam used by the fetcher and
//! its production implementation, [`HttpClient`], which performs one
//! plain GET per call with timeouts and an identifying User-Agent.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, MAX_BODY_BYTES, REQUEST_TIMEOUT_SECS};
use super::error::DownloadError;
use crate::user_agent;

/// Retrieves the raw body behind a URL.
///
/// One call is exactly one network attempt; retries are the caller's
/// business.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Performs a single GET and returns the full body.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] for network failures, timeouts,
    /// non-success statuses and oversized bodies.
    async fn get(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

/// Options for building an [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpClientOptions {
    /// TCP/TLS connect timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout for one attempt.
    pub request_timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Largest body accepted into memory.
    pub max_body_bytes: u64,
}

impl Default for HttpClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            user_agent: user_agent::default_fetch_user_agent(),
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}

/// HTTP client for fetching item bodies.
///
/// This client is designed to be created once and reused for every item,
/// taking advantage of connection pooling.
///
/// # Example
///
/// ```no_run
/// use corpus_fetcher_core::download::{HttpClient, HttpClientOptions, Transport};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new(HttpClientOptions::default())?;
/// let body = client.get("https://www.gutenberg.org/cache/epub/798/pg798.txt").await?;
/// println!("{} bytes", body.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    max_body_bytes: u64,
}

impl HttpClient {
    /// Creates a client from options.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the TLS backend or the
    /// User-Agent header value cannot be initialized.
    pub fn new(options: HttpClientOptions) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.request_timeout)
            .gzip(true)
            .user_agent(options.user_agent)
            .build()?;
        Ok(Self {
            client,
            max_body_bytes: options.max_body_bytes,
        })
    }
}

#[async_trait]
impl Transport for HttpClient {
    #[instrument(skip(self), fields(url = %url))]
    async fn get(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_reqwest_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        if response
            .content_length()
            .is_some_and(|length| length > self.max_body_bytes)
        {
            return Err(DownloadError::body_too_large(url, self.max_body_bytes));
        }

        let body = read_body(response, url, self.max_body_bytes).await?;
        debug!(bytes = body.len(), "response body received");
        Ok(body)
    }
}

/// Buffers the response body, enforcing the size cap while streaming.
async fn read_body(
    response: reqwest::Response,
    url: &str,
    max_body_bytes: u64,
) -> Result<Vec<u8>, DownloadError> {
    let capacity = response
        .content_length()
        .and_then(|length| usize::try_from(length).ok())
        .unwrap_or(0);
    let mut body = Vec::with_capacity(capacity);
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| map_reqwest_error(url, e))?;
        let new_len = u64::try_from(body.len() + chunk.len()).unwrap_or(u64::MAX);
        if new_len > max_body_bytes {
            return Err(DownloadError::body_too_large(url, max_body_bytes));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

fn map_reqwest_error(url: &str, error: reqwest::Error) -> DownloadError {
    if error.is_timeout() {
        DownloadError::timeout(url)
    } else {
        DownloadError::network(url, error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_body(route: &str, template: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(template)
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_get_returns_body() {
        let mock_server = mock_body(
            "/pg1.txt",
            ResponseTemplate::new(200).set_body_bytes(b"Call me Ishmael."),
        )
        .await;

        let client = HttpClient::new(HttpClientOptions::default()).unwrap();
        let body = client
            .get(&format!("{}/pg1.txt", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(body, b"Call me Ishmael.");
    }

    #[tokio::test]
    async fn test_get_maps_404_to_http_status() {
        let mock_server = mock_body("/pg404.txt", ResponseTemplate::new(404)).await;

        let client = HttpClient::new(HttpClientOptions::default()).unwrap();
        let result = client
            .get(&format!("{}/pg404.txt", mock_server.uri()))
            .await;
        match result {
            Err(DownloadError::HttpStatus { status, .. }) => assert_eq!(status, 404),
            other => panic!("Expected HttpStatus error, got: {other:?}"),
        }
    }

    #[test]
    fn test_get_invalid_url() {
        let client = HttpClient::new(HttpClientOptions::default()).unwrap();
        let result = tokio_test::block_on(client.get("not-a-valid-url"));
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_get_rejects_oversized_body() {
        let mock_server = mock_body(
            "/big.txt",
            ResponseTemplate::new(200).set_body_bytes(vec![b'x'; 4096]),
        )
        .await;

        let options = HttpClientOptions {
            max_body_bytes: 1024,
            ..HttpClientOptions::default()
        };
        let client = HttpClient::new(options).unwrap();
        let result = client.get(&format!("{}/big.txt", mock_server.uri())).await;
        assert!(matches!(
            result,
            Err(DownloadError::BodyTooLarge {
                limit_bytes: 1024,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_get_times_out() {
        let mock_server = mock_body(
            "/slow.txt",
            ResponseTemplate::new(200)
                .set_body_bytes(b"late")
                .set_delay(Duration::from_secs(5)),
        )
        .await;

        let options = HttpClientOptions {
            request_timeout: Duration::from_millis(200),
            ..HttpClientOptions::default()
        };
        let client = HttpClient::new(options).unwrap();
        let result = client.get(&format!("{}/slow.txt", mock_server.uri())).await;
        assert!(
            matches!(result, Err(DownloadError::Timeout { .. })),
            "Expected Timeout, got: {result:?}"
        );
    }

    #[tokio::test]
    async fn test_default_client_sends_identifying_user_agent() {
        use wiremock::{Match, Request};

        struct CorpusUaMatcher;

        impl Match for CorpusUaMatcher {
            fn matches(&self, request: &Request) -> bool {
                request
                    .headers
                    .get("User-Agent")
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|ua| {
                        ua.starts_with("corpus-fetcher/") && ua.contains(env!("CARGO_PKG_VERSION"))
                    })
            }
        }

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ua.txt"))
            .and(CorpusUaMatcher)
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new(HttpClientOptions::default()).unwrap();
        let result = client.get(&format!("{}/ua.txt", mock_server.uri())).await;
        assert!(result.is_ok(), "Default client must send User-Agent; got: {result:?}");
    }
}
