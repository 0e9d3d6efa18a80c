use async_trait::async_trait;
use storefront_core::BoxError;

use crate::product::{Product, ProductSpecificationAttribute};

/// Repository trait for product catalog access
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get_product_by_id(&self, id: &str) -> Result<Option<Product>, BoxError>;

    async fn update_product_specification_attribute(
        &self,
        product_id: &str,
        attribute: &ProductSpecificationAttribute,
    ) -> Result<(), BoxError>;
}
