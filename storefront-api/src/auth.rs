use axum::{
    extract::State,
    Json,
    routing::post,
    Router,
};
use serde::Serialize;
use jsonwebtoken::{encode, Header, EncodingKey};
use chrono::{Utc, Duration};
use uuid::Uuid;
use crate::{state::{AppState, AuthConfig}, error::AppError, middleware::auth::CustomerClaims};

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/guest", post(login_guest))
}

/// Sign a customer token valid for the configured lifetime.
pub fn issue_customer_token(
    auth: &AuthConfig,
    customer_id: &str,
    role: &str,
    language_id: Option<String>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = CustomerClaims {
        sub: customer_id.to_owned(),
        email: None,
        role: role.to_owned(),
        language_id,
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(auth.secret.as_bytes()))
}

async fn login_guest(State(state): State<AppState>) -> Result<Json<AuthResponse>, AppError> {
    let guest_id = format!("guest-{}", Uuid::new_v4());
    let token = issue_customer_token(&state.auth, &guest_id, "GUEST", None)
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    tracing::debug!("Issued guest token for {}", guest_id);
    Ok(Json(AuthResponse { token }))
}
