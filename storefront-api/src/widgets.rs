use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use storefront_widgets::{CompletedOrder, WidgetContent, WidgetContext};

use crate::{error::AppError, middleware::auth::CustomerClaims, state::AppState};

/// GET /v1/widgets/{zone}
/// Markup installed widgets contribute to a page zone
pub async fn widget_zone(
    State(state): State<AppState>,
    Path(zone): Path<String>,
) -> Result<Json<Vec<WidgetContent>>, AppError> {
    let context = WidgetContext {
        store: state.store.clone(),
        completed_order: None,
    };

    let contents = state
        .plugins
        .render_zone(&zone, &context)
        .await
        .map_err(AppError::from_plugin)?;

    Ok(Json(contents))
}

/// GET /v1/orders/{order_id}/widgets/{zone}
/// Zone markup for the checkout-completed page of an order
pub async fn order_widget_zone(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path((order_id, zone)): Path<(String, String)>,
) -> Result<Json<Vec<WidgetContent>>, AppError> {
    let order = state
        .orders
        .get_order_by_id(&order_id)
        .await
        .map_err(AppError::storage)?
        .ok_or_else(|| AppError::NotFoundError(format!("Order not found: {}", order_id)))?;

    if order.customer_id != claims.sub {
        return Err(AppError::AuthorizationError(
            "Order belongs to another customer".to_string(),
        ));
    }

    let mut products = HashMap::new();
    for item in &order.items {
        if products.contains_key(&item.product_id) {
            continue;
        }
        if let Some(product) = state
            .products
            .get_product_by_id(&item.product_id)
            .await
            .map_err(AppError::storage)?
        {
            products.insert(item.product_id.clone(), product);
        }
    }

    let context = WidgetContext {
        store: state.store.clone(),
        completed_order: Some(CompletedOrder::new(order, &products)),
    };

    let contents = state
        .plugins
        .render_zone(&zone, &context)
        .await
        .map_err(AppError::from_plugin)?;

    Ok(Json(contents))
}
