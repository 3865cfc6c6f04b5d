use std::future::Future;
use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;

use crate::feed::parser::{parse_feed, FetchedFeed, ParseError};

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Default upper bound for one feed fetch, request and body included.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur while fetching a feed.
///
/// Any of these leaves the subscription's checkpoint untouched for the run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Fetch exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// Feed XML could not be parsed, or an entry had no timestamp
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// Source of feed contents.
///
/// Implementations return entries in the feed's own order, which is newest
/// first for practically every publisher.
pub trait FeedFetcher {
    fn fetch(&self, source: &str) -> impl Future<Output = Result<FetchedFeed, FetchError>> + Send;
}

/// Fetches feeds over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

impl FeedFetcher for HttpFetcher {
    /// GETs and parses `source`.
    ///
    /// The whole fetch, body included, is bounded by the configured timeout.
    /// There is no retry: a failing feed is simply tried again next run.
    async fn fetch(&self, source: &str) -> Result<FetchedFeed, FetchError> {
        let bytes = tokio::time::timeout(self.timeout, fetch_bytes(&self.client, source))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??;

        let feed = parse_feed(&bytes)?;
        tracing::debug!(
            source = %source,
            title = %feed.title,
            entries = feed.entries.len(),
            "Fetched feed"
        );
        Ok(feed)
    }
}

async fn fetch_bytes(client: &reqwest::Client, source: &str) -> Result<Vec<u8>, FetchError> {
    let response = client.get(source).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    read_limited_bytes(response, MAX_FEED_SIZE).await
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
