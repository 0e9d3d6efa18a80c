use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Complete,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Complete => "COMPLETE",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "COMPLETE" => Ok(OrderStatus::Complete),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// Postal address, used for billing and for return pickups
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub country: Option<String>,
    pub state_province: Option<String>,
    pub city: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub zip_postal_code: Option<String>,
    pub phone_number: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        *self == Address::default()
    }
}

/// A placed order. Monetary amounts are in minor units (cents).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub order_number: i32,
    pub store_id: String,
    pub customer_id: String,
    pub customer_email: Option<String>,
    /// Language the customer used when placing the order.
    pub customer_language_id: String,
    pub status: OrderStatus,
    pub order_shipping_incl_tax_cents: i64,
    pub order_shipping_excl_tax_cents: i64,
    pub order_tax_cents: i64,
    pub order_total_cents: i64,
    pub billing_address: Address,
    pub items: Vec<OrderItem>,
    pub created_on_utc: DateTime<Utc>,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        store_id: impl Into<String>,
        customer_id: impl Into<String>,
        customer_language_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            order_number: 0,
            store_id: store_id.into(),
            customer_id: customer_id.into(),
            customer_email: None,
            customer_language_id: customer_language_id.into(),
            status: OrderStatus::Pending,
            order_shipping_incl_tax_cents: 0,
            order_shipping_excl_tax_cents: 0,
            order_tax_cents: 0,
            order_total_cents: 0,
            billing_address: Address::default(),
            items: Vec::new(),
            created_on_utc: Utc::now(),
        }
    }

    /// Add a line and fold its price into the order total
    pub fn add_item(&mut self, item: OrderItem) {
        self.order_total_cents += item.price_incl_tax_cents;
        self.order_tax_cents += item.price_incl_tax_cents - item.price_excl_tax_cents;
        self.items.push(item);
    }

    pub fn item(&self, id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

/// One product line within an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    pub id: String,
    pub product_id: String,
    pub quantity: i32,
    pub unit_price_incl_tax_cents: i64,
    pub unit_price_excl_tax_cents: i64,
    pub price_incl_tax_cents: i64,
    pub price_excl_tax_cents: i64,
}

impl OrderItem {
    pub fn new(
        id: impl Into<String>,
        product_id: impl Into<String>,
        quantity: i32,
        unit_price_incl_tax_cents: i64,
        unit_price_excl_tax_cents: i64,
    ) -> Self {
        Self {
            id: id.into(),
            product_id: product_id.into(),
            quantity,
            unit_price_incl_tax_cents,
            unit_price_excl_tax_cents,
            price_incl_tax_cents: unit_price_incl_tax_cents * quantity as i64,
            price_excl_tax_cents: unit_price_excl_tax_cents * quantity as i64,
        }
    }
}
