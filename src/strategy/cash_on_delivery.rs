use crate::domain::order::Order;
use crate::domain::payment::{
    PaymentInfoResponse, PaymentLinkResponse, PaymentMethod, PaymentStatus, PaymentWebhookResponse,
};
use crate::error::PaymentError;
use crate::strategy::PaymentStrategy;
use crate::templates::{cod_reference, cod_transaction_id};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing::info;

const METHOD: PaymentMethod = PaymentMethod::CashOnDelivery;
const DELIVERY_WINDOW_DAYS: i64 = 7;

/// Cash collected by the courier. Nothing here contacts a remote system and
/// nothing here fails; collection is confirmed out of band.
#[derive(Debug, Default, Clone, Copy)]
pub struct CashOnDeliveryStrategy;

#[async_trait::async_trait]
impl PaymentStrategy for CashOnDeliveryStrategy {
    fn method(&self) -> PaymentMethod {
        METHOD
    }

    async fn create_link(&self, order: &Order) -> Result<PaymentLinkResponse, PaymentError> {
        Ok(PaymentLinkResponse {
            payment_url: None,
            qr_code: None,
            order_code: order.id,
            amount: order.total_amount,
            account_number: None,
            account_name: None,
            expires_at: Utc::now() + Duration::days(DELIVERY_WINDOW_DAYS),
            payment_method: METHOD,
        })
    }

    async fn process_payment(&self, order_code: i64) -> Result<PaymentInfoResponse, PaymentError> {
        Ok(PaymentInfoResponse {
            order_code,
            amount: Decimal::ZERO,
            status: PaymentStatus::Pending,
            transaction_id: cod_transaction_id(order_code),
            reference: cod_reference(order_code),
            account_number: None,
            description: "cash on delivery, collected at handover".to_string(),
            payment_method: METHOD,
        })
    }

    async fn cancel(&self, order_code: i64, reason: &str) -> Result<(), PaymentError> {
        info!(target: "payments_core::audit", method = %METHOD, order_code, reason, "payment cancelled");
        Ok(())
    }

    fn verify_webhook(&self, _signature: &str, _raw_body: &[u8]) -> bool {
        true
    }

    /// Callers should check `is_placeholder()` on the result.
    fn handle_webhook(&self, raw_body: &[u8]) -> Result<PaymentWebhookResponse, PaymentError> {
        Ok(PaymentWebhookResponse {
            order_code: 0,
            amount: Decimal::ZERO,
            status: PaymentStatus::Pending,
            transaction_id: String::new(),
            reference: String::new(),
            payment_method: METHOD,
            raw_payload: raw_body.to_vec(),
        })
    }
}
