use async_trait::async_trait;
use storefront_core::BoxError;

use crate::models::Order;
use crate::returns::ReturnRequest;

/// Sends workflow messages (emails, pushes) triggered by order events.
///
/// Each method returns the number of messages queued.
#[async_trait]
pub trait WorkflowMessageService: Send + Sync {
    async fn send_new_return_request_store_owner_notification(
        &self,
        request: &ReturnRequest,
        order: &Order,
        language_id: &str,
    ) -> Result<usize, BoxError>;

    async fn send_new_return_request_customer_notification(
        &self,
        request: &ReturnRequest,
        order: &Order,
        language_id: &str,
    ) -> Result<usize, BoxError>;
}
