use crate::error::PaymentError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum PaymentMethod {
    OnlineGateway,
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::OnlineGateway => "ONLINE_GATEWAY",
            PaymentMethod::CashOnDelivery => "CASH_ON_DELIVERY",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ONLINE_GATEWAY" | "PAYOS" => Ok(PaymentMethod::OnlineGateway),
            "CASH_ON_DELIVERY" | "COD" => Ok(PaymentMethod::CashOnDelivery),
            _ => Err(PaymentError::UnsupportedMethod(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    /// `Paid`, `Failed` and `Cancelled` admit no further transition here.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

/// Result of initiating a payment. Fields a method has no use for are
/// `None` or zero and mean "not applicable".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentLinkResponse {
    pub payment_url: Option<String>,
    pub qr_code: Option<String>,
    pub order_code: i64,
    pub amount: Decimal,
    pub account_number: Option<String>,
    pub account_name: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInfoResponse {
    pub order_code: i64,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub reference: String,
    pub account_number: Option<String>,
    pub description: String,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentWebhookResponse {
    pub order_code: i64,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub reference: String,
    pub payment_method: PaymentMethod,
    /// Body exactly as received, kept for audit and replay.
    pub raw_payload: Vec<u8>,
}

impl PaymentWebhookResponse {
    /// True for the zero-valued response cash on delivery produces, since it
    /// never receives real webhooks. Such a response is not a zero-amount payment.
    /// Gateway-backed responses are never placeholders, whatever their values.
    pub fn is_placeholder(&self) -> bool {
        self.payment_method == PaymentMethod::CashOnDelivery
            && self.order_code == 0
            && self.amount.is_zero()
            && self.transaction_id.is_empty()
    }
}
