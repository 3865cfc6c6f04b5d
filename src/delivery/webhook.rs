use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use thiserror::Error;

use crate::delivery::embed::{Embed, WebhookPayload};

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Status line returned by the webhook receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResponse {
    pub status: u16,
    pub reason: String,
}

impl DeliveryResponse {
    pub fn new(status: u16) -> Self {
        let reason = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_owned();
        Self { status, reason }
    }

    /// Only `200 OK` and `204 No Content` count as delivered.
    pub fn is_accepted(&self) -> bool {
        self.status == StatusCode::OK.as_u16() || self.status == StatusCode::NO_CONTENT.as_u16()
    }
}

impl std::fmt::Display for DeliveryResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.reason)
    }
}

/// Destination for formatted entry messages.
///
/// A transport failure is an `Err`; any HTTP answer, successful or not, is
/// reported as a [`DeliveryResponse`] and judged by the caller.
pub trait DeliverySink {
    fn deliver(
        &self,
        destination: &str,
        embed: &Embed,
    ) -> impl Future<Output = Result<DeliveryResponse, DeliveryError>> + Send;
}

/// Posts embeds to Discord-compatible webhook URLs.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl DeliverySink for WebhookSink {
    async fn deliver(
        &self,
        destination: &str,
        embed: &Embed,
    ) -> Result<DeliveryResponse, DeliveryError> {
        let body = serde_json::to_vec(&WebhookPayload {
            embeds: std::slice::from_ref(embed),
        })?;

        let response = self
            .client
            .post(destination)
            .header(CONTENT_TYPE, "application/json; charset=UTF-8")
            .body(body)
            .send()
            .await
            .map_err(|e| DeliveryError::Network(e.without_url()))?;

        Ok(DeliveryResponse::new(response.status().as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::Entry;
    use chrono::{TimeZone, Utc};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn embed() -> Embed {
        let entry = Entry {
            id: "1".to_string(),
            title: "Hello".to_string(),
            link: "https://blog.example.com/1".to_string(),
            published: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        Embed::for_entry(&entry, "Blog", 0x00ff00)
    }

    #[test]
    fn test_accepted_statuses() {
        assert!(DeliveryResponse::new(200).is_accepted());
        assert!(DeliveryResponse::new(204).is_accepted());
        assert!(!DeliveryResponse::new(201).is_accepted());
        assert!(!DeliveryResponse::new(429).is_accepted());
        assert!(!DeliveryResponse::new(500).is_accepted());
    }

    #[test]
    fn test_response_display() {
        assert_eq!(DeliveryResponse::new(404).to_string(), "404 Not Found");
        assert_eq!(DeliveryResponse::new(599).to_string(), "599 Unknown Status");
    }

    #[tokio::test]
    async fn test_posts_embed_json() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("content-type", "application/json; charset=UTF-8"))
            .and(body_partial_json(serde_json::json!({
                "embeds": [{ "title": "Hello", "type": "rich", "footer": { "text": "Blog" } }]
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let sink = WebhookSink::new(reqwest::Client::new());
        let response = sink
            .deliver(&format!("{}/hook", mock_server.uri()), &embed())
            .await
            .unwrap();
        assert_eq!(response.status, 204);
        assert!(response.is_accepted());
    }

    #[tokio::test]
    async fn test_transport_error_hides_webhook_token() {
        // Nothing listens on port 1, so the connection is refused.
        let destination = "http://127.0.0.1:1/api/webhooks/1/super-secret-token";

        let sink = WebhookSink::new(reqwest::Client::new());
        let err = sink.deliver(destination, &embed()).await.unwrap_err();

        assert!(matches!(err, DeliveryError::Network(_)));
        assert!(!err.to_string().contains("super-secret-token"));
        assert!(!format!("{:?}", err).contains("super-secret-token"));
    }

    #[tokio::test]
    async fn test_server_error_is_reported_not_raised() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let sink = WebhookSink::new(reqwest::Client::new());
        let response = sink
            .deliver(&format!("{}/hook", mock_server.uri()), &embed())
            .await
            .unwrap();
        assert_eq!(response.status, 500);
        assert!(!response.is_accepted());
    }
}
