pub mod config;
pub mod domain {
    pub mod order;
    pub mod payment;
}
pub mod error;
pub mod gateways;
pub mod money;
pub mod service {
    pub mod payment_gateway;
}
pub mod strategy;
pub mod templates;

pub use domain::order::{Order, OrderItem};
pub use domain::payment::{
    PaymentInfoResponse, PaymentLinkResponse, PaymentMethod, PaymentStatus, PaymentWebhookResponse,
};
pub use error::PaymentError;
pub use service::payment_gateway::PaymentGateway;
