use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use storefront_core::BoxError;
use storefront_order::{Order, ReturnRequest, WorkflowMessageService};
use storefront_shared::models::events::{NotificationRecipient, ReturnRequestNotificationEvent};
use storefront_shared::Masked;
use tracing::info;
use uuid::Uuid;

use crate::events::EventSink;

/// Queues workflow messages by publishing them as events; a mailer service consumes the topic.
pub struct EventWorkflowMessageService {
    sink: Arc<dyn EventSink>,
    topic: String,
}

impl EventWorkflowMessageService {
    pub fn new(sink: Arc<dyn EventSink>, topic: impl Into<String>) -> Self {
        Self {
            sink,
            topic: topic.into(),
        }
    }

    async fn send(
        &self,
        recipient: NotificationRecipient,
        request: &ReturnRequest,
        order: &Order,
        language_id: &str,
    ) -> Result<usize, BoxError> {
        let event = ReturnRequestNotificationEvent {
            event_id: Uuid::new_v4(),
            recipient,
            template: recipient.template_name().to_string(),
            return_request_id: request.id.clone(),
            return_number: request.return_number,
            order_id: order.id.clone(),
            order_number: order.order_number,
            store_id: request.store_id.clone(),
            customer_id: request.customer_id.clone(),
            customer_email: order.customer_email.clone().map(Masked::from),
            language_id: language_id.to_string(),
            item_count: request.items.len(),
            timestamp: Utc::now().timestamp(),
        };

        let payload = serde_json::to_string(&event)?;
        self.sink.publish(&self.topic, &request.id, &payload).await?;

        info!(
            "Queued {} for return request {} (language '{}')",
            event.template, request.return_number, language_id
        );
        Ok(1)
    }
}

#[async_trait]
impl WorkflowMessageService for EventWorkflowMessageService {
    async fn send_new_return_request_store_owner_notification(
        &self,
        request: &ReturnRequest,
        order: &Order,
        language_id: &str,
    ) -> Result<usize, BoxError> {
        self.send(NotificationRecipient::StoreOwner, request, order, language_id)
            .await
    }

    async fn send_new_return_request_customer_notification(
        &self,
        request: &ReturnRequest,
        order: &Order,
        language_id: &str,
    ) -> Result<usize, BoxError> {
        self.send(NotificationRecipient::Customer, request, order, language_id)
            .await
    }
}
