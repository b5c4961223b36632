use crate::domain::payment::PaymentStatus;
use chrono::{DateTime, Utc};
use crate::error::PaymentError;
use crate::gateways::payos::{map_code, parse_webhook_body, verify_hex};
use crate::gateways::{GatewayClient, GatewayLink, GatewayLinkRequest, GatewayPaymentInfo, GatewayWebhookEvent};

/// What `create_payment_link` reports as the link's expiry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportedExpiry {
    /// The expiry the caller asked for.
    #[default]
    Requested,
    At(DateTime<Utc>),
    /// The gateway omits `expiredAt`.
    Omitted,
}

/// In-process stand-in for the QR gateway. Speaks the same webhook and
/// signature format so strategies behave exactly as against the real one.
pub struct MockGatewayClient {
    pub behavior: String,
    pub checksum_key: String,
    /// Amount reported by `get_payment_info`, in minor units.
    pub paid_amount_minor: i64,
    pub reported_expiry: ReportedExpiry,
}

impl MockGatewayClient {
    pub fn new(behavior: &str, checksum_key: &str) -> Self {
        Self {
            behavior: behavior.to_string(),
            checksum_key: checksum_key.to_string(),
            paid_amount_minor: 0,
            reported_expiry: ReportedExpiry::Requested,
        }
    }

    fn fail(&self, operation: &'static str, order_code: i64) -> Option<PaymentError> {
        match self.behavior.as_str() {
            "ALWAYS_REJECT" => Some(PaymentError::GatewayRejected {
                operation,
                code: "MOCK_DECLINED".to_string(),
                detail: "mock decline".to_string(),
            }),
            "ALWAYS_UNAVAILABLE" => Some(PaymentError::GatewayUnavailable {
                operation,
                detail: "mock timeout".to_string(),
            }),
            "NOT_FOUND" => Some(PaymentError::NotFound { order_code }),
            _ => None,
        }
    }
}

#[async_trait::async_trait]
impl GatewayClient for MockGatewayClient {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_payment_link(&self, request: GatewayLinkRequest) -> Result<GatewayLink, PaymentError> {
        if let Some(err) = self.fail("create_payment_link", request.order_code) {
            return Err(err);
        }

        Ok(GatewayLink {
            order_code: request.order_code,
            amount_minor: request.amount_minor,
            checkout_url: Some(format!("https://mock.pay/checkout/{}", request.order_code)),
            qr_code: Some(format!("MOCKQR|{}|{}", request.order_code, request.amount_minor)),
            account_number: Some("0000000000".to_string()),
            account_name: Some("MOCK MERCHANT".to_string()),
            payment_link_id: Some(format!("mock_link_{}", uuid::Uuid::new_v4())),
            expires_at: match self.reported_expiry {
                ReportedExpiry::Requested => Some(request.expires_at),
                ReportedExpiry::At(at) => Some(at),
                ReportedExpiry::Omitted => None,
            },
        })
    }

    async fn get_payment_info(&self, order_code: i64) -> Result<GatewayPaymentInfo, PaymentError> {
        if let Some(err) = self.fail("get_payment_info", order_code) {
            return Err(err);
        }

        let status_code = match self.behavior.as_str() {
            "ALWAYS_PENDING" => "PENDING",
            _ => "PAID",
        };
        Ok(GatewayPaymentInfo {
            order_code,
            amount_minor: self.paid_amount_minor,
            status_code: status_code.to_string(),
            transaction_id: format!("mock_txn_{order_code}"),
            reference: format!("MOCKREF{order_code}"),
            account_number: Some("0000000000".to_string()),
            description: format!("mock payment {order_code}"),
        })
    }

    async fn cancel_payment(&self, order_code: i64, _reason: &str) -> Result<(), PaymentError> {
        match self.fail("cancel_payment", order_code) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn verify_signature(&self, signature: &str, raw_body: &[u8]) -> bool {
        verify_hex(&self.checksum_key, signature, raw_body)
    }

    fn parse_webhook(&self, raw_body: &[u8]) -> Result<GatewayWebhookEvent, PaymentError> {
        parse_webhook_body(raw_body)
    }

    fn map_status(&self, code: &str) -> PaymentStatus {
        map_code(code)
    }
}
