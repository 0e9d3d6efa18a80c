use uuid::Uuid;

use crate::pii::Masked;

/// Who a workflow notification is addressed to.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationRecipient {
    StoreOwner,
    Customer,
}

impl NotificationRecipient {
    pub fn template_name(&self) -> &'static str {
        match self {
            NotificationRecipient::StoreOwner => "NewReturnRequest.StoreOwnerNotification",
            NotificationRecipient::Customer => "NewReturnRequest.CustomerNotification",
        }
    }
}

/// Published once per recipient after a return request is persisted.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ReturnRequestNotificationEvent {
    pub event_id: Uuid,
    pub recipient: NotificationRecipient,
    pub template: String,
    pub return_request_id: String,
    pub return_number: i32,
    pub order_id: String,
    pub order_number: i32,
    pub store_id: String,
    pub customer_id: String,
    pub customer_email: Option<Masked<String>>,
    pub language_id: String,
    pub item_count: usize,
    pub timestamp: i64,
}
