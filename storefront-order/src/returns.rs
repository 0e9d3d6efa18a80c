use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::{localize, LocalizedProperty, Settings};

use crate::models::{Address, Order, OrderStatus};

/// Return request status. New requests always start as `Pending`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnRequestStatus {
    Pending,
    Received,
    ReturnAuthorized,
    ItemsRepaired,
    ItemsRefunded,
    RequestRejected,
    Cancelled,
}

impl ReturnRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnRequestStatus::Pending => "PENDING",
            ReturnRequestStatus::Received => "RECEIVED",
            ReturnRequestStatus::ReturnAuthorized => "RETURN_AUTHORIZED",
            ReturnRequestStatus::ItemsRepaired => "ITEMS_REPAIRED",
            ReturnRequestStatus::ItemsRefunded => "ITEMS_REFUNDED",
            ReturnRequestStatus::RequestRejected => "REQUEST_REJECTED",
            ReturnRequestStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ReturnRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ReturnRequestStatus::Pending),
            "RECEIVED" => Ok(ReturnRequestStatus::Received),
            "RETURN_AUTHORIZED" => Ok(ReturnRequestStatus::ReturnAuthorized),
            "ITEMS_REPAIRED" => Ok(ReturnRequestStatus::ItemsRepaired),
            "ITEMS_REFUNDED" => Ok(ReturnRequestStatus::ItemsRefunded),
            "REQUEST_REJECTED" => Ok(ReturnRequestStatus::RequestRejected),
            "CANCELLED" => Ok(ReturnRequestStatus::Cancelled),
            other => Err(format!("unknown return request status: {}", other)),
        }
    }
}

/// A customer's request to send back part of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRequest {
    /// Empty until persisted.
    pub id: String,
    /// Sequential per deployment, assigned on insert.
    pub return_number: i32,
    pub store_id: String,
    pub order_id: String,
    pub customer_id: String,
    pub customer_comments: String,
    pub staff_notes: String,
    pub status: ReturnRequestStatus,
    pub created_on_utc: DateTime<Utc>,
    pub updated_on_utc: DateTime<Utc>,
    pub pickup_date: Option<DateTime<Utc>>,
    pub pickup_address: Address,
    pub items: Vec<ReturnRequestItem>,
}

impl ReturnRequest {
    /// Widened so customer-supplied quantities cannot overflow.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity)).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReturnRequestItem {
    pub order_item_id: String,
    pub quantity: i32,
    pub reason_for_return: String,
    pub requested_action: String,
}

/// Selectable "why are you returning this" entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReturnRequestReason {
    pub id: String,
    pub name: String,
    pub display_order: i32,
    pub locales: Vec<LocalizedProperty>,
}

impl ReturnRequestReason {
    pub fn localized_name(&self, language_id: &str) -> &str {
        localize(&self.locales, "Name", language_id, &self.name)
    }
}

/// Selectable "what should happen" entry (refund, replacement, store credit)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReturnRequestAction {
    pub id: String,
    pub name: String,
    pub display_order: i32,
    pub locales: Vec<LocalizedProperty>,
}

impl ReturnRequestAction {
    pub fn localized_name(&self, language_id: &str) -> &str {
        localize(&self.locales, "Name", language_id, &self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReturnRequestSettings {
    pub enabled: bool,
    /// Days after purchase during which returns are accepted; 0 means unlimited.
    pub days_limit: i64,
}

impl Default for ReturnRequestSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            days_limit: 0,
        }
    }
}

impl Settings for ReturnRequestSettings {
    const KEY: &'static str = "returnrequestsettings";
}

/// Whether the customer may open a return request for `order` at `now`.
pub fn is_return_request_allowed(
    order: &Order,
    settings: &ReturnRequestSettings,
    now: DateTime<Utc>,
) -> bool {
    if !settings.enabled || order.status != OrderStatus::Complete {
        return false;
    }

    if settings.days_limit > 0 {
        return now - order.created_on_utc < Duration::days(settings.days_limit);
    }

    true
}
