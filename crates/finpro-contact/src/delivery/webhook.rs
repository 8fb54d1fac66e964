use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::form::SubmissionPayload;

use super::channel::{DeliveryChannel, DeliveryResult, WebhookChannelConfig};

/// Fixed per-call timeout after which a webhook POST is abandoned.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport failure for a webhook call.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("timed out after {}s", WEBHOOK_TIMEOUT.as_secs())]
    Timeout,
    #[error("request failed: {0}")]
    Network(String),
}

/// HTTP seam so the dispatcher can be exercised without a network.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// POST the JSON body and return the HTTP status code.
    async fn post_json(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: &serde_json::Value,
    ) -> Result<u16, TransportError>;
}

/// Production transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .expect("reqwest client with static configuration");
        Self { client }
    }

    /// Channel headers replace same-named defaults (notably the
    /// `Content-Type` set by the JSON body) instead of appending next
    /// to them.
    fn build_request(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: &serde_json::Value,
    ) -> Result<reqwest::Request, TransportError> {
        let mut extra = HeaderMap::new();
        for (name, value) in headers {
            let header_name: HeaderName = name
                .parse()
                .map_err(|_| TransportError::Network(format!("invalid header name '{name}'")))?;
            let header_value: HeaderValue = value
                .parse()
                .map_err(|_| TransportError::Network(format!("invalid value for header '{name}'")))?;
            extra.insert(header_name, header_value);
        }

        self.client
            .post(url)
            .json(body)
            .headers(extra)
            .build()
            .map_err(|err| TransportError::Network(err.to_string()))
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebhookTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: &serde_json::Value,
    ) -> Result<u16, TransportError> {
        let request = self.build_request(url, headers, body)?;

        let response = self.client.execute(request).await.map_err(|err| {
            if err.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Network(err.to_string())
            }
        })?;

        Ok(response.status().as_u16())
    }
}

/// A loopback target cannot be reached by the notification fan-out; the
/// call is refused up front with a descriptive error instead of attempted.
pub fn is_loopback_url(url: &str) -> bool {
    url.contains("localhost") || url.contains("127.0.0.1") || url.contains("[::1]")
}

pub(crate) async fn send_to_webhook(
    transport: &dyn WebhookTransport,
    channel: &DeliveryChannel,
    config: &WebhookChannelConfig,
    payload: &SubmissionPayload,
) -> DeliveryResult {
    if is_loopback_url(&config.url) {
        return DeliveryResult::failure(
            channel,
            None,
            "URL localhost détectée — utilisez une URL publique (Zapier, Make.com, webhook.site, …)",
        );
    }

    let body = match serde_json::to_value(payload) {
        Ok(body) => body,
        Err(err) => {
            return DeliveryResult::failure(channel, None, format!("payload serialization: {err}"))
        }
    };

    match transport.post_json(&config.url, &config.headers, &body).await {
        Ok(status) if (200..300).contains(&status) => DeliveryResult::success(channel, Some(status)),
        Ok(status) => DeliveryResult::failure(channel, Some(status), format!("HTTP {status}")),
        Err(err) => DeliveryResult::failure(channel, None, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_content_type_replaces_the_json_default() {
        let transport = ReqwestTransport::new();
        let mut headers = BTreeMap::new();
        headers.insert(
            "Content-Type".to_string(),
            "application/json; charset=utf-8".to_string(),
        );
        headers.insert("X-Api-Key".to_string(), "secret".to_string());

        let request = transport
            .build_request(
                "https://hooks.example.com/catch",
                &headers,
                &serde_json::json!({ "ok": true }),
            )
            .expect("request");

        let content_types: Vec<_> = request
            .headers()
            .get_all(reqwest::header::CONTENT_TYPE)
            .iter()
            .collect();
        assert_eq!(content_types.len(), 1);
        assert_eq!(content_types[0], "application/json; charset=utf-8");
        assert_eq!(request.headers().get("x-api-key").expect("api key"), "secret");
    }

    #[test]
    fn malformed_channel_headers_are_refused() {
        let transport = ReqwestTransport::new();
        let mut headers = BTreeMap::new();
        headers.insert("bad header".to_string(), "value".to_string());

        let err = transport
            .build_request(
                "https://hooks.example.com/catch",
                &headers,
                &serde_json::json!({}),
            )
            .expect_err("header name with a space");
        assert!(err.to_string().contains("bad header"));
    }

    #[test]
    fn loopback_urls_are_detected() {
        assert!(is_loopback_url("http://localhost:8000/hook"));
        assert!(is_loopback_url("https://127.0.0.1/hook"));
        assert!(is_loopback_url("http://[::1]:3000/hook"));
        assert!(!is_loopback_url("https://hooks.example.com/catch"));
    }
}
