use crate::domain::order::Order;
use crate::domain::payment::{PaymentInfoResponse, PaymentLinkResponse, PaymentMethod, PaymentWebhookResponse};
use crate::error::PaymentError;

pub mod cash_on_delivery;
pub mod online;

/// The operation set every payment method provides. Adding a method means
/// adding one implementation and registering it with the gateway façade.
#[async_trait::async_trait]
pub trait PaymentStrategy: Send + Sync {
    fn method(&self) -> PaymentMethod;

    async fn create_link(&self, order: &Order) -> Result<PaymentLinkResponse, PaymentError>;

    async fn process_payment(&self, order_code: i64) -> Result<PaymentInfoResponse, PaymentError>;

    async fn cancel(&self, order_code: i64, reason: &str) -> Result<(), PaymentError>;

    fn verify_webhook(&self, signature: &str, raw_body: &[u8]) -> bool;

    fn handle_webhook(&self, raw_body: &[u8]) -> Result<PaymentWebhookResponse, PaymentError>;
}
