use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_catalog::ProductRepository;
use storefront_core::{
    BoxError, CoreError, LocalizationService, LocalizationSettings, Request, RequestHandler,
    WorkContext,
};
use tracing::{debug, info};

use crate::form::FormCollection;
use crate::models::{Address, Order};
use crate::notifications::WorkflowMessageService;
use crate::repository::ReturnRequestRepository;
use crate::returns::{ReturnRequest, ReturnRequestItem, ReturnRequestStatus};

/// Text stored on an item whose reason or action id did not resolve.
pub const NOT_AVAILABLE: &str = "not available";

/// Locale resource shown when no line had a positive quantity.
pub const NO_ITEMS_SUBMITTED: &str = "ReturnRequests.NoItemsSubmitted";

/// What the return form shows back to the customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReturnRequestModel {
    pub order_id: String,
    pub comments: String,
    pub pickup_date: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

pub struct ReturnRequestSubmitCommand {
    pub context: WorkContext,
    pub order: Order,
    pub form: FormCollection,
    pub address: Address,
    pub model: ReturnRequestModel,
}

impl Request for ReturnRequestSubmitCommand {
    /// The request is empty (and unsaved) when `model.error` is set.
    type Response = (ReturnRequestModel, ReturnRequest);
}

#[derive(Clone)]
pub struct ReturnRequestSubmitDeps {
    pub products: Arc<dyn ProductRepository>,
    pub return_requests: Arc<dyn ReturnRequestRepository>,
    pub messages: Arc<dyn WorkflowMessageService>,
    pub localization: LocalizationService,
    pub localization_settings: LocalizationSettings,
}

/// Turns a submitted return form into a persisted return request
pub struct ReturnRequestSubmitHandler {
    deps: ReturnRequestSubmitDeps,
}

impl ReturnRequestSubmitHandler {
    pub fn new(deps: ReturnRequestSubmitDeps) -> Self {
        Self { deps }
    }

    async fn reason_name(&self, id: &str, language_id: &str) -> Result<String, ReturnRequestError> {
        if id.is_empty() {
            return Ok(NOT_AVAILABLE.to_string());
        }
        let reason = self
            .deps
            .return_requests
            .get_return_request_reason_by_id(id)
            .await
            .map_err(ReturnRequestError::Storage)?;

        Ok(reason
            .map(|r| r.localized_name(language_id).to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()))
    }

    async fn action_name(&self, id: &str, language_id: &str) -> Result<String, ReturnRequestError> {
        if id.is_empty() {
            return Ok(NOT_AVAILABLE.to_string());
        }
        let action = self
            .deps
            .return_requests
            .get_return_request_action_by_id(id)
            .await
            .map_err(ReturnRequestError::Storage)?;

        Ok(action
            .map(|a| a.localized_name(language_id).to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()))
    }
}

#[async_trait]
impl RequestHandler<ReturnRequestSubmitCommand> for ReturnRequestSubmitHandler {
    type Error = ReturnRequestError;

    async fn handle(
        &self,
        request: ReturnRequestSubmitCommand,
    ) -> Result<(ReturnRequestModel, ReturnRequest), ReturnRequestError> {
        let ReturnRequestSubmitCommand {
            context,
            order,
            form,
            address,
            mut model,
        } = request;
        let language_id = context.working_language_id.as_str();

        let now = Utc::now();
        let mut rr = ReturnRequest {
            id: String::new(),
            return_number: 0,
            store_id: context.store.store_id.clone(),
            order_id: order.id.clone(),
            customer_id: context.customer_id.clone(),
            customer_comments: model.comments.clone(),
            staff_notes: String::new(),
            status: ReturnRequestStatus::Pending,
            created_on_utc: now,
            updated_on_utc: now,
            pickup_date: model.pickup_date,
            pickup_address: address,
            items: Vec::new(),
        };

        for order_item in &order.items {
            let product = self
                .deps
                .products
                .get_product_by_id(&order_item.product_id)
                .await
                .map_err(ReturnRequestError::Storage)?
                .ok_or_else(|| ReturnRequestError::ProductNotFound(order_item.product_id.clone()))?;

            if product.not_returnable {
                debug!("Order item {} is not returnable", order_item.id);
                continue;
            }

            let line = form.return_line(&order_item.id);
            if line.quantity <= 0 {
                continue;
            }

            let reason_for_return = self.reason_name(&line.reason_id, language_id).await?;
            let requested_action = self.action_name(&line.action_id, language_id).await?;
            rr.items.push(ReturnRequestItem {
                order_item_id: order_item.id.clone(),
                quantity: line.quantity,
                reason_for_return,
                requested_action,
            });
        }

        if rr.items.is_empty() {
            model.error = Some(
                self.deps
                    .localization
                    .get_resource(NO_ITEMS_SUBMITTED, language_id)
                    .await?,
            );
            return Ok((model, rr));
        }

        let rr = self
            .deps
            .return_requests
            .insert_return_request(rr)
            .await
            .map_err(ReturnRequestError::Storage)?;
        info!(
            "Return request #{} created for order {} ({} items, {} units)",
            rr.return_number,
            order.id,
            rr.items.len(),
            rr.total_quantity()
        );

        self.deps
            .messages
            .send_new_return_request_store_owner_notification(
                &rr,
                &order,
                &self.deps.localization_settings.default_admin_language_id,
            )
            .await
            .map_err(ReturnRequestError::Notification)?;
        self.deps
            .messages
            .send_new_return_request_customer_notification(&rr, &order, &order.customer_language_id)
            .await
            .map_err(ReturnRequestError::Notification)?;

        Ok((model, rr))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReturnRequestError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Return request storage failed: {0}")]
    Storage(BoxError),

    #[error("Return request notification failed: {0}")]
    Notification(BoxError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderItem;
    use crate::returns::{ReturnRequestAction, ReturnRequestReason};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use storefront_catalog::{Product, ProductSpecificationAttribute};
    use storefront_core::localization::{LocaleResourceRepository, LocaleStringResource};
    use storefront_core::{LocalizedProperty, StoreContext};

    const NO_ITEMS_TEXT: &str = "You haven't chosen any items.";

    #[derive(Default)]
    struct FakeProducts {
        products: HashMap<String, Product>,
    }

    #[async_trait]
    impl ProductRepository for FakeProducts {
        async fn get_product_by_id(&self, id: &str) -> Result<Option<Product>, BoxError> {
            Ok(self.products.get(id).cloned())
        }

        async fn update_product_specification_attribute(
            &self,
            _product_id: &str,
            _attribute: &ProductSpecificationAttribute,
        ) -> Result<(), BoxError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeReturns {
        saved: Mutex<Vec<ReturnRequest>>,
        reasons: Vec<ReturnRequestReason>,
        actions: Vec<ReturnRequestAction>,
    }

    #[async_trait]
    impl ReturnRequestRepository for FakeReturns {
        async fn insert_return_request(&self, mut request: ReturnRequest) -> Result<ReturnRequest, BoxError> {
            let mut saved = self.saved.lock().unwrap();
            request.return_number = saved.len() as i32 + 1;
            request.id = format!("rr-{}", request.return_number);
            saved.push(request.clone());
            Ok(request)
        }

        async fn get_return_request_reason_by_id(
            &self,
            id: &str,
        ) -> Result<Option<ReturnRequestReason>, BoxError> {
            Ok(self.reasons.iter().find(|r| r.id == id).cloned())
        }

        async fn get_return_request_action_by_id(
            &self,
            id: &str,
        ) -> Result<Option<ReturnRequestAction>, BoxError> {
            Ok(self.actions.iter().find(|a| a.id == id).cloned())
        }

        async fn get_all_return_request_reasons(&self) -> Result<Vec<ReturnRequestReason>, BoxError> {
            Ok(self.reasons.clone())
        }

        async fn get_all_return_request_actions(&self) -> Result<Vec<ReturnRequestAction>, BoxError> {
            Ok(self.actions.clone())
        }
    }

    #[derive(Default)]
    struct RecordingMessages {
        // (recipient, return request id, language)
        sent: Mutex<Vec<(&'static str, String, String)>>,
    }

    #[async_trait]
    impl WorkflowMessageService for RecordingMessages {
        async fn send_new_return_request_store_owner_notification(
            &self,
            request: &ReturnRequest,
            _order: &Order,
            language_id: &str,
        ) -> Result<usize, BoxError> {
            self.sent
                .lock()
                .unwrap()
                .push(("owner", request.id.clone(), language_id.to_string()));
            Ok(1)
        }

        async fn send_new_return_request_customer_notification(
            &self,
            request: &ReturnRequest,
            _order: &Order,
            language_id: &str,
        ) -> Result<usize, BoxError> {
            self.sent
                .lock()
                .unwrap()
                .push(("customer", request.id.clone(), language_id.to_string()));
            Ok(1)
        }
    }

    struct FakeResources;

    #[async_trait]
    impl LocaleResourceRepository for FakeResources {
        async fn get_resource(
            &self,
            resource_name: &str,
            language_id: &str,
        ) -> Result<Option<LocaleStringResource>, BoxError> {
            if resource_name.eq_ignore_ascii_case(NO_ITEMS_SUBMITTED) && language_id == "en" {
                return Ok(Some(LocaleStringResource::new("en", NO_ITEMS_SUBMITTED, NO_ITEMS_TEXT)));
            }
            Ok(None)
        }

        async fn insert_resource(&self, _resource: &LocaleStringResource) -> Result<(), BoxError> {
            Ok(())
        }

        async fn update_resource(&self, _resource: &LocaleStringResource) -> Result<(), BoxError> {
            Ok(())
        }

        async fn delete_resource(&self, _id: &str) -> Result<(), BoxError> {
            Ok(())
        }
    }

    struct Fixture {
        handler: ReturnRequestSubmitHandler,
        returns: Arc<FakeReturns>,
        messages: Arc<RecordingMessages>,
    }

    /// Products p-10 and p-11 are returnable, p-12 is not.
    fn fixture() -> Fixture {
        let mut products = FakeProducts::default();
        for id in ["p-10", "p-11", "p-12"] {
            let mut product = Product::new(id, format!("Product {}", id), id.to_uppercase());
            product.not_returnable = id == "p-12";
            products.products.insert(id.to_string(), product);
        }

        let returns = Arc::new(FakeReturns {
            saved: Mutex::new(Vec::new()),
            reasons: vec![ReturnRequestReason {
                id: "R1".to_string(),
                name: "Received a wrong product".to_string(),
                display_order: 1,
                locales: vec![LocalizedProperty::new("de", "Name", "Falsches Produkt")],
            }],
            actions: vec![ReturnRequestAction {
                id: "A1".to_string(),
                name: "Refund".to_string(),
                display_order: 1,
                locales: vec![LocalizedProperty::new("de", "Name", "Erstattung")],
            }],
        });
        let messages = Arc::new(RecordingMessages::default());

        let handler = ReturnRequestSubmitHandler::new(ReturnRequestSubmitDeps {
            products: Arc::new(products),
            return_requests: returns.clone(),
            messages: messages.clone(),
            localization: LocalizationService::new(Arc::new(FakeResources)),
            localization_settings: LocalizationSettings {
                default_admin_language_id: "admin-lang".to_string(),
                default_language_id: "en".to_string(),
            },
        });

        Fixture {
            handler,
            returns,
            messages,
        }
    }

    fn order() -> Order {
        let mut order = Order::new("o-1", "store-1", "c-1", "customer-lang");
        order.add_item(OrderItem::new("10", "p-10", 2, 1200, 1000));
        order.add_item(OrderItem::new("11", "p-11", 1, 600, 500));
        order.add_item(OrderItem::new("12", "p-12", 3, 120, 100));
        order
    }

    fn command(pairs: &[(&str, &str)], language_id: &str) -> ReturnRequestSubmitCommand {
        let order = order();
        ReturnRequestSubmitCommand {
            context: WorkContext {
                store: StoreContext::new("store-1", "https://shop.example.com"),
                customer_id: "c-1".to_string(),
                working_language_id: language_id.to_string(),
            },
            model: ReturnRequestModel {
                order_id: order.id.clone(),
                comments: "Box was damaged".to_string(),
                ..Default::default()
            },
            order,
            form: pairs.iter().copied().collect(),
            address: Address {
                city: Some("Gdansk".to_string()),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_only_positive_returnable_lines_become_items() {
        let fx = fixture();
        let cmd = command(
            &[
                ("quantity10", "2"),
                ("reason10", "R1"),
                ("action10", "A1"),
                ("quantity11", "abc"),
                ("quantity12", "3"),
            ],
            "en",
        );

        let (model, rr) = fx.handler.handle(cmd).await.unwrap();

        assert!(model.error.is_none());
        assert_eq!(rr.items.len(), 1);
        assert_eq!(rr.items[0].order_item_id, "10");
        assert_eq!(rr.items[0].quantity, 2);
        assert_eq!(rr.items[0].reason_for_return, "Received a wrong product");
        assert_eq!(rr.items[0].requested_action, "Refund");
        assert_eq!(rr.status, ReturnRequestStatus::Pending);
        assert_eq!(rr.store_id, "store-1");
        assert_eq!(rr.customer_id, "c-1");
        assert_eq!(rr.customer_comments, "Box was damaged");
        assert_eq!(rr.staff_notes, "");
        assert_eq!(rr.pickup_address.city.as_deref(), Some("Gdansk"));
        assert!(rr.pickup_date.is_none());
        assert_eq!(rr.id, "rr-1");

        assert_eq!(fx.returns.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_notifications_sent_once_each_in_their_languages() {
        let fx = fixture();
        let cmd = command(&[("quantity10", "1"), ("quantity11", "1")], "en");

        let (_, rr) = fx.handler.handle(cmd).await.unwrap();
        assert_eq!(rr.items.len(), 2);

        let sent = fx.messages.sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![
                ("owner", "rr-1".to_string(), "admin-lang".to_string()),
                ("customer", "rr-1".to_string(), "customer-lang".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_maximum_quantities_are_accepted() {
        let fx = fixture();
        let max = i32::MAX.to_string();
        let cmd = command(&[("quantity10", max.as_str()), ("quantity11", max.as_str())], "en");

        let (model, rr) = fx.handler.handle(cmd).await.unwrap();

        assert!(model.error.is_none());
        assert_eq!(rr.items.len(), 2);
        assert_eq!(rr.total_quantity(), 2 * i64::from(i32::MAX));
        assert_eq!(fx.messages.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_non_returnable_product_is_ignored() {
        let fx = fixture();
        let cmd = command(&[("quantity12", "3"), ("reason12", "R1")], "en");

        let (model, rr) = fx.handler.handle(cmd).await.unwrap();

        assert!(rr.items.is_empty());
        assert_eq!(model.error.as_deref(), Some(NO_ITEMS_TEXT));
    }

    #[tokio::test]
    async fn test_empty_submission_is_not_persisted() {
        let fx = fixture();
        let cmd = command(&[("quantity10", "0"), ("quantity11", "-1"), ("comments", "x")], "en");

        let (model, rr) = fx.handler.handle(cmd).await.unwrap();

        assert!(rr.items.is_empty());
        assert!(rr.id.is_empty());
        assert_eq!(model.error.as_deref(), Some(NO_ITEMS_TEXT));
        assert!(fx.returns.saved.lock().unwrap().is_empty());
        assert!(fx.messages.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_reason_and_action_read_not_available() {
        let fx = fixture();
        let cmd = command(&[("quantity11", "1"), ("reason11", "R404"), ("action11", "")], "en");

        let (_, rr) = fx.handler.handle(cmd).await.unwrap();

        assert_eq!(rr.items[0].reason_for_return, NOT_AVAILABLE);
        assert_eq!(rr.items[0].requested_action, NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_names_use_working_language() {
        let fx = fixture();
        let cmd = command(&[("QUANTITY10", "1"), ("Reason10", "R1"), ("ACTION10", "A1")], "de");

        let (_, rr) = fx.handler.handle(cmd).await.unwrap();

        assert_eq!(rr.items[0].reason_for_return, "Falsches Produkt");
        assert_eq!(rr.items[0].requested_action, "Erstattung");
    }

    #[tokio::test]
    async fn test_pickup_date_carried_from_model() {
        let fx = fixture();
        let mut cmd = command(&[("quantity10", "1")], "en");
        let pickup = Utc::now() + chrono::Duration::days(3);
        cmd.model.pickup_date = Some(pickup);

        let (_, rr) = fx.handler.handle(cmd).await.unwrap();

        assert_eq!(rr.pickup_date, Some(pickup));
    }

    #[tokio::test]
    async fn test_missing_product_is_an_error() {
        let fx = fixture();
        let mut cmd = command(&[("quantity10", "1")], "en");
        cmd.order.items.push(OrderItem::new("13", "p-gone", 1, 100, 100));

        let err = fx.handler.handle(cmd).await.unwrap_err();

        assert!(matches!(err, ReturnRequestError::ProductNotFound(id) if id == "p-gone"));
        assert!(fx.returns.saved.lock().unwrap().is_empty());
    }
}
