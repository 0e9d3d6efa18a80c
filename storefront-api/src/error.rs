use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use storefront_catalog::CatalogError;
use storefront_core::BoxError;
use storefront_order::ReturnRequestError;
use storefront_widgets::PluginError;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    pub fn storage(err: BoxError) -> Self {
        AppError::InternalServerError(format!("Storage error: {}", err))
    }

    pub fn from_catalog(err: CatalogError) -> Self {
        match err {
            CatalogError::ProductNotFound(_) => AppError::NotFoundError(err.to_string()),
            other => AppError::InternalServerError(other.to_string()),
        }
    }

    pub fn from_return_request(err: ReturnRequestError) -> Self {
        match err {
            ReturnRequestError::ProductNotFound(_) => AppError::NotFoundError(err.to_string()),
            other => AppError::InternalServerError(other.to_string()),
        }
    }

    pub fn from_plugin(err: PluginError) -> Self {
        match err {
            PluginError::NotFound(_) => AppError::NotFoundError(err.to_string()),
            PluginError::AlreadyRegistered(_)
            | PluginError::AlreadyInstalled(_)
            | PluginError::NotInstalled(_) => AppError::ConflictError(err.to_string()),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            },
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            },
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}
