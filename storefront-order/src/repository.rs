use async_trait::async_trait;
use storefront_core::BoxError;

use crate::models::Order;
use crate::returns::{ReturnRequest, ReturnRequestAction, ReturnRequestReason};

/// Repository trait for order data access
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn get_order_by_id(&self, id: &str) -> Result<Option<Order>, BoxError>;
}

/// Repository trait for return requests and their lookup lists
#[async_trait]
pub trait ReturnRequestRepository: Send + Sync {
    /// Persist a new request, returning it with `id` and `return_number` assigned.
    async fn insert_return_request(&self, request: ReturnRequest) -> Result<ReturnRequest, BoxError>;

    async fn get_return_request_reason_by_id(
        &self,
        id: &str,
    ) -> Result<Option<ReturnRequestReason>, BoxError>;

    async fn get_return_request_action_by_id(
        &self,
        id: &str,
    ) -> Result<Option<ReturnRequestAction>, BoxError>;

    /// Ordered by display order.
    async fn get_all_return_request_reasons(&self) -> Result<Vec<ReturnRequestReason>, BoxError>;

    /// Ordered by display order.
    async fn get_all_return_request_actions(&self) -> Result<Vec<ReturnRequestAction>, BoxError>;
}
