use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read-only view of an order as the persistence layer hands it over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub total_amount: Decimal,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}
