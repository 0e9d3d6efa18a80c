use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::settings::load_settings;
use storefront_core::{RequestHandler, WorkContext};
use storefront_order::returns::is_return_request_allowed;
use storefront_order::{
    Address, FormCollection, ReturnRequest, ReturnRequestModel, ReturnRequestSettings,
    ReturnRequestSubmitCommand,
};

use crate::{error::AppError, middleware::auth::CustomerClaims, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ReturnOptionsQuery {
    pub language_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReturnOption {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReturnOptionsResponse {
    pub reasons: Vec<ReturnOption>,
    pub actions: Vec<ReturnOption>,
}

#[derive(Debug, Serialize)]
pub struct ReturnRequestResponse {
    pub model: ReturnRequestModel,
    /// Absent when nothing was submitted.
    pub return_request: Option<ReturnRequest>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/returns/options
/// Reasons and actions the return form offers, localized
pub async fn return_options(
    State(state): State<AppState>,
    Query(query): Query<ReturnOptionsQuery>,
) -> Result<Json<ReturnOptionsResponse>, AppError> {
    let language_id = query
        .language_id
        .unwrap_or_else(|| state.localization_settings.default_language_id.clone());

    let reasons = state
        .return_requests
        .get_all_return_request_reasons()
        .await
        .map_err(AppError::storage)?
        .iter()
        .map(|r| ReturnOption {
            id: r.id.clone(),
            name: r.localized_name(&language_id).to_string(),
        })
        .collect();

    let actions = state
        .return_requests
        .get_all_return_request_actions()
        .await
        .map_err(AppError::storage)?
        .iter()
        .map(|a| ReturnOption {
            id: a.id.clone(),
            name: a.localized_name(&language_id).to_string(),
        })
        .collect();

    Ok(Json(ReturnOptionsResponse { reasons, actions }))
}

/// POST /v1/orders/{order_id}/returns
/// Submit the return form for one of the customer's orders
pub async fn submit_return_request(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(order_id): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<(StatusCode, Json<ReturnRequestResponse>), AppError> {
    // 1. Order must exist and belong to the caller
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

    // 2. Eligibility
    let settings: ReturnRequestSettings = load_settings(state.settings.as_ref(), &state.store.store_id)
        .await?
        .unwrap_or_else(|| state.return_settings.clone());

    if !is_return_request_allowed(&order, &settings, Utc::now()) {
        return Err(AppError::ValidationError(format!(
            "Returns are not available for order {}",
            order.order_number
        )));
    }

    // 3. Form fields
    let form: FormCollection = fields.into_iter().collect();
    let pickup_date = form
        .get("pickup_date")
        .filter(|v| !v.trim().is_empty())
        .map(parse_pickup_date)
        .transpose()?;

    let model = ReturnRequestModel {
        order_id: order.id.clone(),
        comments: form.get("comments").unwrap_or_default().to_string(),
        pickup_date,
        error: None,
    };

    let command = ReturnRequestSubmitCommand {
        context: WorkContext {
            store: state.store.clone(),
            customer_id: claims.sub.clone(),
            working_language_id: claims
                .language_id
                .clone()
                .unwrap_or_else(|| state.localization_settings.default_language_id.clone()),
        },
        address: pickup_address(&form),
        order,
        form,
        model,
    };

    // 4. Submit
    let (model, return_request) = state
        .return_submit
        .handle(command)
        .await
        .map_err(AppError::from_return_request)?;

    if model.error.is_some() {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ReturnRequestResponse {
                model,
                return_request: None,
            }),
        ));
    }

    Ok((
        StatusCode::CREATED,
        Json(ReturnRequestResponse {
            model,
            return_request: Some(return_request),
        }),
    ))
}

/// `YYYY-MM-DD`, taken as midnight UTC.
fn parse_pickup_date(value: &str) -> Result<DateTime<Utc>, AppError> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::ValidationError(format!("Invalid pickup date: {}", value)))?;

    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

fn pickup_address(form: &FormCollection) -> Address {
    let field = |name: &str| {
        form.get(&format!("pickup_{}", name))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    Address {
        first_name: field("first_name"),
        last_name: field("last_name"),
        email: field("email"),
        company: field("company"),
        country: field("country"),
        state_province: field("state_province"),
        city: field("city"),
        address1: field("address1"),
        address2: field("address2"),
        zip_postal_code: field("zip_postal_code"),
        phone_number: field("phone_number"),
    }
}
