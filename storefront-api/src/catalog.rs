use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use storefront_catalog::{ProductDto, ProductSpecificationAttributeDto, UpdateProductSpecificationCommand};
use storefront_core::RequestHandler;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
pub struct UpdateSpecificationResponse {
    pub success: bool,
}

/// PUT /v1/admin/products/{product_id}/specifications/{attribute_id}
/// Overwrite one specification attribute of a product
pub async fn update_product_specification(
    State(state): State<AppState>,
    Path((product_id, attribute_id)): Path<(String, String)>,
    Json(mut model): Json<ProductSpecificationAttributeDto>,
) -> Result<Json<UpdateSpecificationResponse>, AppError> {
    let product = state
        .products
        .get_product_by_id(&product_id)
        .await
        .map_err(AppError::storage)?
        .ok_or_else(|| AppError::NotFoundError(format!("Product not found: {}", product_id)))?;

    model.id = attribute_id;

    let success = state
        .update_specification
        .handle(UpdateProductSpecificationCommand {
            product: ProductDto::from(&product),
            model,
        })
        .await
        .map_err(AppError::from_catalog)?;

    Ok(Json(UpdateSpecificationResponse { success }))
}
