use crate::domain::order::Order;
use crate::domain::payment::{PaymentInfoResponse, PaymentLinkResponse, PaymentMethod, PaymentWebhookResponse};
use crate::error::PaymentError;
use crate::gateways::{GatewayClient, GatewayItem, GatewayLinkRequest};
use crate::money::MoneyConverter;
use crate::strategy::PaymentStrategy;
use crate::templates::{callback_url, payment_description};
use chrono::{Duration, Utc};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info};

const METHOD: PaymentMethod = PaymentMethod::OnlineGateway;
const LINK_TTL_HOURS: i64 = 24;

pub struct OnlineGatewayStrategy {
    client: Arc<dyn GatewayClient>,
    converter: MoneyConverter,
    return_url: String,
    cancel_url: String,
}

impl OnlineGatewayStrategy {
    pub fn new(
        client: Arc<dyn GatewayClient>,
        converter: MoneyConverter,
        return_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            converter,
            return_url: return_url.into(),
            cancel_url: cancel_url.into(),
        }
    }

    fn build_request(&self, order: &Order, order_code: i64) -> Result<GatewayLinkRequest, PaymentError> {
        let amount_minor = self.converter.to_minor_units(order.total_amount)?;
        let items = order
            .items
            .iter()
            .map(|item| {
                Ok(GatewayItem {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    price: self.converter.to_minor_units(item.unit_price)?,
                })
            })
            .collect::<Result<Vec<_>, PaymentError>>()?;

        Ok(GatewayLinkRequest {
            order_code,
            amount_minor,
            description: payment_description(&order.order_number),
            items,
            return_url: callback_url(&self.return_url, &order.order_number),
            cancel_url: callback_url(&self.cancel_url, &order.order_number),
            expires_at: Utc::now() + Duration::hours(LINK_TTL_HOURS),
        })
    }
}

/// Millisecond clock plus a random suffix: unique per attempt and below
/// 2^53 so the code survives JSON number handling on the gateway side.
pub fn fresh_order_code() -> i64 {
    let millis = Utc::now().timestamp_millis();
    let suffix: i64 = rand::thread_rng().gen_range(0..1000);
    millis * 1000 + suffix
}

#[async_trait::async_trait]
impl PaymentStrategy for OnlineGatewayStrategy {
    fn method(&self) -> PaymentMethod {
        METHOD
    }

    async fn create_link(&self, order: &Order) -> Result<PaymentLinkResponse, PaymentError> {
        let order_code = fresh_order_code();
        let wrap = move |e: PaymentError| e.context("failed to create payment link", METHOD, order_code);

        let request = self.build_request(order, order_code).map_err(wrap)?;
        let requested_expiry = request.expires_at;
        let link = self.client.create_payment_link(request).await.map_err(wrap)?;
        let amount = self.converter.to_decimal(link.amount_minor).map_err(wrap)?;

        info!(
            gateway = self.client.name(),
            order_id = order.id,
            order_code = link.order_code,
            "payment link created"
        );

        Ok(PaymentLinkResponse {
            payment_url: link.checkout_url,
            qr_code: link.qr_code,
            order_code: link.order_code,
            amount,
            account_number: link.account_number,
            account_name: link.account_name,
            // The gateway invalidates the link on its own clock; prefer it when reported.
            expires_at: link.expires_at.unwrap_or(requested_expiry),
            payment_method: METHOD,
        })
    }

    async fn process_payment(&self, order_code: i64) -> Result<PaymentInfoResponse, PaymentError> {
        let wrap = move |e: PaymentError| e.context("failed to fetch payment info", METHOD, order_code);

        let info = self.client.get_payment_info(order_code).await.map_err(wrap)?;
        let status = self.client.map_status(&info.status_code);
        debug!(order_code, code = %info.status_code, ?status, "payment status fetched");

        Ok(PaymentInfoResponse {
            order_code: info.order_code,
            amount: self.converter.to_decimal(info.amount_minor).map_err(wrap)?,
            status,
            transaction_id: info.transaction_id,
            reference: info.reference,
            account_number: info.account_number,
            description: info.description,
            payment_method: METHOD,
        })
    }

    async fn cancel(&self, order_code: i64, reason: &str) -> Result<(), PaymentError> {
        self.client
            .cancel_payment(order_code, reason)
            .await
            .map_err(|e| e.context("failed to cancel payment", METHOD, order_code))?;
        info!(gateway = self.client.name(), order_code, reason, "payment cancelled");
        Ok(())
    }

    fn verify_webhook(&self, signature: &str, raw_body: &[u8]) -> bool {
        self.client.verify_signature(signature, raw_body)
    }

    fn handle_webhook(&self, raw_body: &[u8]) -> Result<PaymentWebhookResponse, PaymentError> {
        let event = self.client.parse_webhook(raw_body)?;
        let amount = self
            .converter
            .to_decimal(event.amount_minor)
            .map_err(|e| e.context("failed to handle webhook", METHOD, event.order_code))?;
        let status = self.client.map_status(&event.status_code);
        info!(order_code = event.order_code, code = %event.status_code, ?status, "webhook handled");

        Ok(PaymentWebhookResponse {
            order_code: event.order_code,
            amount,
            status,
            transaction_id: event.transaction_id,
            reference: event.reference,
            payment_method: METHOD,
            raw_payload: raw_body.to_vec(),
        })
    }
}
