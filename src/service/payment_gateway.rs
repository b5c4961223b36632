use crate::config::GatewayConfig;
use crate::domain::order::Order;
use crate::domain::payment::{PaymentInfoResponse, PaymentLinkResponse, PaymentMethod, PaymentWebhookResponse};
use crate::error::PaymentError;
use crate::gateways::payos::{self, PayosClient};
use crate::strategy::cash_on_delivery::CashOnDeliveryStrategy;
use crate::strategy::online::OnlineGatewayStrategy;
use crate::strategy::PaymentStrategy;
use std::collections::HashMap;
use std::sync::Arc;

/// Single entry point for callers. Routes each call to the strategy
/// registered for the requested method and adds nothing else.
#[derive(Clone, Default)]
pub struct PaymentGateway {
    strategies: Arc<HashMap<PaymentMethod, Arc<dyn PaymentStrategy>>>,
}

#[derive(Default)]
pub struct PaymentGatewayBuilder {
    strategies: HashMap<PaymentMethod, Arc<dyn PaymentStrategy>>,
}

impl PaymentGatewayBuilder {
    /// Registers under `strategy.method()`, replacing any earlier registration.
    pub fn register<S: PaymentStrategy + 'static>(self, strategy: S) -> Self {
        self.register_shared(Arc::new(strategy))
    }

    pub fn register_shared(mut self, strategy: Arc<dyn PaymentStrategy>) -> Self {
        self.strategies.insert(strategy.method(), strategy);
        self
    }

    pub fn build(self) -> PaymentGateway {
        PaymentGateway {
            strategies: Arc::new(self.strategies),
        }
    }
}

impl PaymentGateway {
    pub fn builder() -> PaymentGatewayBuilder {
        PaymentGatewayBuilder::default()
    }

    /// Both built-in methods, with the online one talking to the QR gateway.
    pub fn from_config(config: &GatewayConfig, http: reqwest::Client) -> Self {
        let client = Arc::new(PayosClient::new(config, http));
        Self::builder()
            .register(OnlineGatewayStrategy::new(
                client,
                payos::converter(),
                config.return_url.clone(),
                config.cancel_url.clone(),
            ))
            .register(CashOnDeliveryStrategy)
            .build()
    }

    pub fn supports(&self, method: PaymentMethod) -> bool {
        self.strategies.contains_key(&method)
    }

    fn strategy(&self, method: PaymentMethod) -> Result<&dyn PaymentStrategy, PaymentError> {
        self.strategies
            .get(&method)
            .map(|s| &**s)
            .ok_or_else(|| PaymentError::UnsupportedMethod(method.to_string()))
    }

    pub async fn create_payment_link(
        &self,
        order: &Order,
        method: PaymentMethod,
    ) -> Result<PaymentLinkResponse, PaymentError> {
        self.strategy(method)?.create_link(order).await
    }

    pub async fn process_payment(
        &self,
        order_code: i64,
        method: PaymentMethod,
    ) -> Result<PaymentInfoResponse, PaymentError> {
        self.strategy(method)?.process_payment(order_code).await
    }

    pub async fn cancel_payment(
        &self,
        order_code: i64,
        method: PaymentMethod,
        reason: &str,
    ) -> Result<(), PaymentError> {
        self.strategy(method)?.cancel(order_code, reason).await
    }

    /// Call before `handle_webhook`; the body must be the bytes exactly as received.
    pub fn verify_webhook(
        &self,
        method: PaymentMethod,
        signature: &str,
        raw_body: &[u8],
    ) -> Result<bool, PaymentError> {
        Ok(self.strategy(method)?.verify_webhook(signature, raw_body))
    }

    pub fn handle_webhook(
        &self,
        method: PaymentMethod,
        raw_body: &[u8],
    ) -> Result<PaymentWebhookResponse, PaymentError> {
        self.strategy(method)?.handle_webhook(raw_body)
    }
}
