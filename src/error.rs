use crate::domain::payment::PaymentMethod;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("unsupported payment method: {0}")]
    UnsupportedMethod(String),

    #[error("gateway unavailable during {operation}: {detail}")]
    GatewayUnavailable {
        operation: &'static str,
        detail: String,
    },

    #[error("gateway rejected {operation} with code {code}: {detail}")]
    GatewayRejected {
        operation: &'static str,
        code: String,
        detail: String,
    },

    #[error("gateway has no payment for order code {order_code}")]
    NotFound { order_code: i64 },

    #[error("malformed webhook payload: {reason}")]
    MalformedWebhook { reason: String, raw: Vec<u8> },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("{operation} (method={method}, order_code={order_code}): {source}")]
    Context {
        operation: &'static str,
        method: PaymentMethod,
        order_code: i64,
        #[source]
        source: Box<PaymentError>,
    },
}

impl PaymentError {
    pub fn context(self, operation: &'static str, method: PaymentMethod, order_code: i64) -> Self {
        PaymentError::Context {
            operation,
            method,
            order_code,
            source: Box::new(self),
        }
    }

    /// Innermost error with any `Context` layers peeled off.
    pub fn root(&self) -> &PaymentError {
        match self {
            PaymentError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Only transient gateway failures are worth retrying, and only by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self.root(), PaymentError::GatewayUnavailable { .. })
    }
}
