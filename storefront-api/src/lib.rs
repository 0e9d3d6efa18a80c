use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
    http::Method,
    Json,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod catalog;
pub mod error;
pub mod middleware;
pub mod plugins;
pub mod returns;
pub mod state;
pub mod widgets;

pub use state::{AppState, AuthConfig, Repositories, StateOptions};

use crate::middleware::{admin_auth_middleware, customer_auth_middleware};

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let customer = Router::new()
        .route("/v1/orders/{order_id}/returns", post(returns::submit_return_request))
        .route("/v1/orders/{order_id}/widgets/{zone}", get(widgets::order_widget_zone))
        .layer(from_fn_with_state(state.clone(), customer_auth_middleware));

    let admin = Router::new()
        .route(
            "/v1/admin/products/{product_id}/specifications/{attribute_id}",
            put(catalog::update_product_specification),
        )
        .route("/v1/admin/plugins", get(plugins::list_plugins))
        .route("/v1/admin/plugins/{system_name}/install", post(plugins::install_plugin))
        .route("/v1/admin/plugins/{system_name}/uninstall", post(plugins::uninstall_plugin))
        .layer(from_fn_with_state(state.clone(), admin_auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::routes())
        .route("/v1/returns/options", get(returns::return_options))
        .route("/v1/widgets/{zone}", get(widgets::widget_zone))
        .merge(customer)
        .merge(admin)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
