use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::models::payment::{PaymentLinkResponse, PaymentStatusReport, StatusKeys, StreamEvent};

use super::models::PaymentLinkRequest;

#[derive(Debug)]
pub enum GatewayError {
    NotConfigured,
    Transport(String),
    Api { status: u16, message: String },
    InvalidResponse(String),
}

pub type EventStream = BoxStream<'static, StreamEvent>;

/// Everything the engine needs from the trip-payment provider: a payment
/// link, a pollable status endpoint, and a push event stream per order.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_link(
        &self,
        request: &PaymentLinkRequest,
    ) -> Result<PaymentLinkResponse, GatewayError>;

    async fn fetch_status(&self, keys: &StatusKeys) -> Result<PaymentStatusReport, GatewayError>;

    async fn open_event_stream(&self, order_id: &str) -> Result<EventStream, GatewayError>;
}
