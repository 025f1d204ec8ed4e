use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ClientId = i64;
pub type OrderId = i64;
pub type ProductId = i64;

/// productId -> most recent unit price paid by one client
/// Serializes as a JSON object with string keys and numeric values
pub type PriceHistory = BTreeMap<ProductId, Decimal>;

/// One order ("pedido") with its line items already attached
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub client_id: ClientId,
    pub issued_at: DateTime<Utc>,
    // Stored sequence (ascending order_items.id)
    pub items: Vec<LineItem>,
}

/// One product line within an order
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: i32,
    // NULL in storage is kept as None so pricing can reject it
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Factory {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Body of POST /api/factories
#[derive(Debug, Clone, Deserialize)]
pub struct NewFactory {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdminUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Outcome of seeding the admin account
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeedOutcome {
    pub created: bool,
    pub email: String,
}

/// Rows removed by a data reset, per table
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct ResetSummary {
    pub order_items: u64,
    pub orders: u64,
}
