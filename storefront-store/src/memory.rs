//! In-process store backing every repository trait, for tests and demo runs.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use storefront_catalog::{Product, ProductRepository, ProductSpecificationAttribute};
use storefront_core::localization::{
    Language, LanguageRepository, LocaleResourceRepository, LocaleStringResource,
};
use storefront_core::{BoxError, SettingRepository};
use storefront_order::{
    Order, OrderRepository, ReturnRequest, ReturnRequestAction, ReturnRequestReason,
    ReturnRequestRepository,
};
use uuid::Uuid;

#[derive(Default)]
struct State {
    products: HashMap<String, Product>,
    orders: HashMap<String, Order>,
    return_requests: Vec<ReturnRequest>,
    reasons: Vec<ReturnRequestReason>,
    actions: Vec<ReturnRequestAction>,
    settings: HashMap<(String, String), Value>,
    languages: Vec<Language>,
    resources: Vec<LocaleStringResource>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with one published language per id.
    pub fn with_languages(ids: &[&str]) -> Self {
        let store = Self::new();
        for (order, id) in ids.iter().enumerate() {
            store.add_language(Language {
                id: id.to_string(),
                name: id.to_uppercase(),
                language_culture: id.to_string(),
                unique_seo_code: id.to_string(),
                published: true,
                display_order: order as i32,
            });
        }
        store
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_product(&self, product: Product) {
        self.state().products.insert(product.id.clone(), product);
    }

    pub fn add_order(&self, order: Order) {
        self.state().orders.insert(order.id.clone(), order);
    }

    pub fn add_reason(&self, reason: ReturnRequestReason) {
        self.state().reasons.push(reason);
    }

    pub fn add_action(&self, action: ReturnRequestAction) {
        self.state().actions.push(action);
    }

    pub fn add_language(&self, language: Language) {
        self.state().languages.push(language);
    }

    pub fn add_resource(&self, resource: LocaleStringResource) {
        self.state().resources.push(resource);
    }

    pub fn product(&self, id: &str) -> Option<Product> {
        self.state().products.get(id).cloned()
    }

    pub fn return_requests(&self) -> Vec<ReturnRequest> {
        self.state().return_requests.clone()
    }

    pub fn locale_resource_count(&self) -> usize {
        self.state().resources.len()
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn get_product_by_id(&self, id: &str) -> Result<Option<Product>, BoxError> {
        Ok(self.product(id))
    }

    async fn update_product_specification_attribute(
        &self,
        product_id: &str,
        attribute: &ProductSpecificationAttribute,
    ) -> Result<(), BoxError> {
        let mut state = self.state();
        let product = state
            .products
            .get_mut(product_id)
            .ok_or_else(|| format!("product {} not found", product_id))?;
        let slot = product
            .specification_attributes
            .iter_mut()
            .find(|a| a.id == attribute.id)
            .ok_or_else(|| format!("specification attribute {} not found", attribute.id))?;
        *slot = attribute.clone();
        product.updated_on_utc = chrono::Utc::now();
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn get_order_by_id(&self, id: &str) -> Result<Option<Order>, BoxError> {
        Ok(self.state().orders.get(id).cloned())
    }
}

#[async_trait]
impl ReturnRequestRepository for InMemoryStore {
    async fn insert_return_request(&self, mut request: ReturnRequest) -> Result<ReturnRequest, BoxError> {
        let mut state = self.state();
        let next_number = state
            .return_requests
            .iter()
            .map(|r| r.return_number)
            .max()
            .unwrap_or(0)
            + 1;

        request.id = Uuid::new_v4().simple().to_string();
        request.return_number = next_number;
        state.return_requests.push(request.clone());
        Ok(request)
    }

    async fn get_return_request_reason_by_id(
        &self,
        id: &str,
    ) -> Result<Option<ReturnRequestReason>, BoxError> {
        Ok(self.state().reasons.iter().find(|r| r.id == id).cloned())
    }

    async fn get_return_request_action_by_id(
        &self,
        id: &str,
    ) -> Result<Option<ReturnRequestAction>, BoxError> {
        Ok(self.state().actions.iter().find(|a| a.id == id).cloned())
    }

    async fn get_all_return_request_reasons(&self) -> Result<Vec<ReturnRequestReason>, BoxError> {
        let mut reasons = self.state().reasons.clone();
        reasons.sort_by_key(|r| r.display_order);
        Ok(reasons)
    }

    async fn get_all_return_request_actions(&self) -> Result<Vec<ReturnRequestAction>, BoxError> {
        let mut actions = self.state().actions.clone();
        actions.sort_by_key(|a| a.display_order);
        Ok(actions)
    }
}

#[async_trait]
impl SettingRepository for InMemoryStore {
    async fn get_setting(&self, key: &str, store_id: &str) -> Result<Option<Value>, BoxError> {
        Ok(self
            .state()
            .settings
            .get(&(key.to_string(), store_id.to_string()))
            .cloned())
    }

    async fn set_setting(&self, key: &str, store_id: &str, value: Value) -> Result<(), BoxError> {
        self.state()
            .settings
            .insert((key.to_string(), store_id.to_string()), value);
        Ok(())
    }

    async fn delete_setting(&self, key: &str, store_id: &str) -> Result<bool, BoxError> {
        Ok(self
            .state()
            .settings
            .remove(&(key.to_string(), store_id.to_string()))
            .is_some())
    }
}

#[async_trait]
impl LanguageRepository for InMemoryStore {
    async fn get_all_languages(&self, show_hidden: bool) -> Result<Vec<Language>, BoxError> {
        let mut languages: Vec<Language> = self
            .state()
            .languages
            .iter()
            .filter(|l| show_hidden || l.published)
            .cloned()
            .collect();
        languages.sort_by_key(|l| l.display_order);
        Ok(languages)
    }
}

#[async_trait]
impl LocaleResourceRepository for InMemoryStore {
    async fn get_resource(
        &self,
        resource_name: &str,
        language_id: &str,
    ) -> Result<Option<LocaleStringResource>, BoxError> {
        Ok(self
            .state()
            .resources
            .iter()
            .find(|r| {
                r.language_id == language_id && r.resource_name.eq_ignore_ascii_case(resource_name)
            })
            .cloned())
    }

    async fn insert_resource(&self, resource: &LocaleStringResource) -> Result<(), BoxError> {
        self.state().resources.push(resource.clone());
        Ok(())
    }

    async fn update_resource(&self, resource: &LocaleStringResource) -> Result<(), BoxError> {
        let mut state = self.state();
        let slot = state
            .resources
            .iter_mut()
            .find(|r| r.id == resource.id)
            .ok_or_else(|| format!("locale resource {} not found", resource.id))?;
        *slot = resource.clone();
        Ok(())
    }

    async fn delete_resource(&self, id: &str) -> Result<(), BoxError> {
        self.state().resources.retain(|r| r.id != id);
        Ok(())
    }
}
