use std::collections::VecDeque;

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use url::Url;

use crate::models::payment::{PaymentLinkResponse, PaymentStatusReport, StatusKeys, StreamEvent};

use super::interface::{EventStream, GatewayError, PaymentGateway};
use super::models::{extract_link_response, GatewayErrorBody, PaymentLinkRequest, TripPayload};

const DEFAULT_API_URL: &str = "https://api.wetravel.example/v1/trips";

pub struct WeTravelProvider {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
    status_url: String,
    stream_url: String,
}

impl WeTravelProvider {
    pub fn new(
        api_url: impl Into<String>,
        api_token: impl Into<String>,
        status_url: impl Into<String>,
        stream_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_token: api_token.into(),
            status_url: status_url.into(),
            stream_url: stream_url.into(),
        }
    }

    pub fn from_env() -> Self {
        let api_url =
            std::env::var("WETRAVEL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_token = std::env::var("WETRAVEL_API_TOKEN").unwrap_or_default();
        let status_url = std::env::var("WETRAVEL_STATUS_URL")
            .unwrap_or_else(|_| format!("{}/payment-status", api_url.trim_end_matches('/')));
        let stream_url = std::env::var("WETRAVEL_STREAM_URL")
            .unwrap_or_else(|_| format!("{}/payment-status-stream", api_url.trim_end_matches('/')));
        Self::new(api_url, api_token, status_url, stream_url)
    }

    /// A placeholder token means the checkout flow should synthesize a demo
    /// confirmation instead of calling out.
    pub fn is_configured(&self) -> bool {
        !self.api_token.is_empty()
            && self.api_token.len() > 20
            && !self.api_token.contains("placeholder")
            && !self.api_url.contains("example")
    }
}

#[async_trait]
impl PaymentGateway for WeTravelProvider {
    async fn create_payment_link(
        &self,
        request: &PaymentLinkRequest,
    ) -> Result<PaymentLinkResponse, GatewayError> {
        if !self.is_configured() {
            return Err(GatewayError::NotConfigured);
        }

        let payload = TripPayload::from_request(request);
        println!(
            "Requesting payment link for {} (deposit ${})",
            request.internal_reference, request.deposit
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<GatewayErrorBody>().await {
                Ok(body) => body
                    .message
                    .or(body.error)
                    .unwrap_or_else(|| status.to_string()),
                Err(_) => status.to_string(),
            };
            eprintln!("Payment gateway error ({}): {}", status, message);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        extract_link_response(&body)
    }

    async fn fetch_status(&self, keys: &StatusKeys) -> Result<PaymentStatusReport, GatewayError> {
        let mut url = Url::parse(&self.status_url)
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        url.query_pairs_mut().append_pair("order_id", &keys.order_id);
        if let Some(trip_id) = &keys.trip_id {
            url.query_pairs_mut().append_pair("trip_id", trip_id);
        }
        if let Some(trip_uuid) = &keys.trip_uuid {
            url.query_pairs_mut().append_pair("trip_uuid", trip_uuid);
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }

        response
            .json::<PaymentStatusReport>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }

    async fn open_event_stream(&self, order_id: &str) -> Result<EventStream, GatewayError> {
        let mut url = Url::parse(&self.stream_url)
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        url.query_pairs_mut().append_pair("order_id", order_id);

        let response = self
            .client
            .get(url)
            .header("Accept", "text/event-stream")
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Api {
                status: response.status().as_u16(),
                message: response.status().to_string(),
            });
        }

        let bytes = response.bytes_stream();
        // Re-chunk the byte stream into SSE events. The stream ends (and the
        // listener falls back to polling) on any transport error.
        let events = futures::stream::unfold(
            (bytes, String::new(), VecDeque::new()),
            |(mut bytes, mut buffer, mut pending)| async move {
                loop {
                    if let Some(event) = pending.pop_front() {
                        return Some((event, (bytes, buffer, pending)));
                    }
                    match bytes.next().await {
                        Some(Ok(chunk)) => {
                            buffer.push_str(&String::from_utf8_lossy(&chunk));
                            while let Some(newline) = buffer.find('\n') {
                                let line: String = buffer.drain(..=newline).collect();
                                if let Some(event) = parse_stream_line(line.trim()) {
                                    pending.push_back(event);
                                }
                            }
                        }
                        Some(Err(_)) | None => return None,
                    }
                }
            },
        );
        Ok(events.boxed())
    }
}

/// Parse one SSE line. Only `data:` lines carry events; keep-alive comments
/// and blank separators are dropped.
pub fn parse_stream_line(line: &str) -> Option<StreamEvent> {
    let data = line.strip_prefix("data:")?.trim();
    let value: Value = serde_json::from_str(data).ok()?;
    match value.get("type").and_then(Value::as_str) {
        Some("connected") => Some(StreamEvent::Connected),
        Some("reservation_complete") => Some(StreamEvent::ReservationComplete),
        Some(other) => Some(StreamEvent::Other(other.to_string())),
        None => None,
    }
}
