use crate::domain::payment::PaymentStatus;
use crate::error::PaymentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod mock;
pub mod payos;

/// Amounts in this module are gateway minor units, never decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayItem {
    pub name: String,
    pub quantity: u32,
    pub price: i64,
}

#[derive(Debug, Clone)]
pub struct GatewayLinkRequest {
    pub order_code: i64,
    pub amount_minor: i64,
    pub description: String,
    pub items: Vec<GatewayItem>,
    pub return_url: String,
    pub cancel_url: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct GatewayLink {
    pub order_code: i64,
    pub amount_minor: i64,
    pub checkout_url: Option<String>,
    pub qr_code: Option<String>,
    pub account_number: Option<String>,
    pub account_name: Option<String>,
    pub payment_link_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct GatewayPaymentInfo {
    pub order_code: i64,
    pub amount_minor: i64,
    pub status_code: String,
    pub transaction_id: String,
    pub reference: String,
    pub account_number: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct GatewayWebhookEvent {
    pub order_code: i64,
    pub amount_minor: i64,
    pub status_code: String,
    pub transaction_id: String,
    pub reference: String,
}

/// All network interaction with one remote gateway. Implementations keep
/// no state between calls beyond their configuration.
#[async_trait::async_trait]
pub trait GatewayClient: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_payment_link(&self, request: GatewayLinkRequest) -> Result<GatewayLink, PaymentError>;

    async fn get_payment_info(&self, order_code: i64) -> Result<GatewayPaymentInfo, PaymentError>;

    async fn cancel_payment(&self, order_code: i64, reason: &str) -> Result<(), PaymentError>;

    /// Never fails; malformed input is simply not authentic.
    fn verify_signature(&self, signature: &str, raw_body: &[u8]) -> bool;

    fn parse_webhook(&self, raw_body: &[u8]) -> Result<GatewayWebhookEvent, PaymentError>;

    /// This gateway's own code table. Codes are not comparable across gateways.
    fn map_status(&self, code: &str) -> PaymentStatus;
}
