use std::sync::Arc;

use async_trait::async_trait;
use storefront_core::{BoxError, Request, RequestHandler};
use tracing::{info, warn};

use crate::product::{ProductDto, ProductSpecificationAttributeDto};
use crate::repository::ProductRepository;

/// Update one specification attribute of a product. Responds with whether
/// the attribute existed and was written.
#[derive(Debug, Clone)]
pub struct UpdateProductSpecificationCommand {
    pub product: ProductDto,
    pub model: ProductSpecificationAttributeDto,
}

impl Request for UpdateProductSpecificationCommand {
    type Response = bool;
}

#[derive(Clone)]
pub struct ProductSpecificationDeps {
    pub products: Arc<dyn ProductRepository>,
}

pub struct UpdateProductSpecificationHandler {
    deps: ProductSpecificationDeps,
}

impl UpdateProductSpecificationHandler {
    pub fn new(deps: ProductSpecificationDeps) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl RequestHandler<UpdateProductSpecificationCommand> for UpdateProductSpecificationHandler {
    type Error = CatalogError;

    async fn handle(&self, request: UpdateProductSpecificationCommand) -> Result<bool, CatalogError> {
        let product = self
            .deps
            .products
            .get_product_by_id(&request.product.id)
            .await
            .map_err(CatalogError::Storage)?
            .ok_or_else(|| CatalogError::ProductNotFound(request.product.id.clone()))?;

        let Some(existing) = product.specification_attribute(&request.model.id) else {
            warn!(
                "Specification attribute {} not found on product {}",
                request.model.id, product.id
            );
            return Ok(false);
        };

        let mut attribute = existing.clone();
        let model = request.model;
        attribute.attribute_type = model.attribute_type;
        attribute.specification_attribute_id = model.specification_attribute_id;
        attribute.specification_attribute_option_id = model.specification_attribute_option_id;
        attribute.custom_value = model.custom_value;
        attribute.allow_filtering = model.allow_filtering;
        attribute.show_on_product_page = model.show_on_product_page;
        attribute.display_order = model.display_order;

        self.deps
            .products
            .update_product_specification_attribute(&product.id, &attribute)
            .await
            .map_err(CatalogError::Storage)?;

        info!("Updated specification attribute {} of product {}", attribute.id, product.id);
        Ok(true)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Catalog storage failed: {0}")]
    Storage(BoxError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{Product, ProductSpecificationAttribute, SpecificationAttributeType};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeProducts {
        products: Mutex<HashMap<String, Product>>,
        writes: Mutex<Vec<(String, ProductSpecificationAttribute)>>,
    }

    #[async_trait]
    impl ProductRepository for FakeProducts {
        async fn get_product_by_id(&self, id: &str) -> Result<Option<Product>, BoxError> {
            Ok(self.products.lock().unwrap().get(id).cloned())
        }

        async fn update_product_specification_attribute(
            &self,
            product_id: &str,
            attribute: &ProductSpecificationAttribute,
        ) -> Result<(), BoxError> {
            self.writes
                .lock()
                .unwrap()
                .push((product_id.to_string(), attribute.clone()));
            Ok(())
        }
    }

    fn laptop() -> Product {
        let mut product = Product::new("p-1", "Laptop", "LP-15");
        product.specification_attributes.push(ProductSpecificationAttribute {
            id: "psa-1".to_string(),
            attribute_type: SpecificationAttributeType::Option,
            specification_attribute_id: "screen".to_string(),
            specification_attribute_option_id: "13in".to_string(),
            custom_value: None,
            allow_filtering: true,
            show_on_product_page: true,
            display_order: 1,
        });
        product
    }

    fn setup() -> (Arc<FakeProducts>, UpdateProductSpecificationHandler) {
        let repo = Arc::new(FakeProducts::default());
        repo.products.lock().unwrap().insert("p-1".to_string(), laptop());
        let handler = UpdateProductSpecificationHandler::new(ProductSpecificationDeps {
            products: repo.clone(),
        });
        (repo, handler)
    }

    #[tokio::test]
    async fn test_updates_existing_attribute() {
        let (repo, handler) = setup();
        let product = laptop();

        let mut model = ProductSpecificationAttributeDto::from(&product.specification_attributes[0]);
        model.specification_attribute_option_id = "15in".to_string();
        model.allow_filtering = false;
        model.display_order = 4;

        let ok = handler
            .handle(UpdateProductSpecificationCommand {
                product: ProductDto::from(&product),
                model,
            })
            .await
            .unwrap();

        assert!(ok);
        let writes = repo.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, "p-1");
        assert_eq!(writes[0].1.specification_attribute_option_id, "15in");
        assert!(!writes[0].1.allow_filtering);
        assert_eq!(writes[0].1.display_order, 4);
    }

    #[tokio::test]
    async fn test_unknown_attribute_returns_false() {
        let (repo, handler) = setup();
        let product = laptop();

        let mut model = ProductSpecificationAttributeDto::from(&product.specification_attributes[0]);
        model.id = "psa-missing".to_string();

        let ok = handler
            .handle(UpdateProductSpecificationCommand {
                product: ProductDto::from(&product),
                model,
            })
            .await
            .unwrap();

        assert!(!ok);
        assert!(repo.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_is_an_error() {
        let (_repo, handler) = setup();
        let mut product = laptop();
        product.id = "p-404".to_string();
        let model = ProductSpecificationAttributeDto::from(&product.specification_attributes[0]);

        let err = handler
            .handle(UpdateProductSpecificationCommand {
                product: ProductDto::from(&product),
                model,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::ProductNotFound(id) if id == "p-404"));
    }
}
