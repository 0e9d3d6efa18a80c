use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use storefront_widgets::PluginInfo;
use tracing::info;

use crate::{error::AppError, middleware::auth::AdminClaims, state::AppState};

#[derive(Debug, Serialize)]
pub struct PluginStateResponse {
    pub system_name: String,
    pub installed: bool,
}

/// GET /v1/admin/plugins
pub async fn list_plugins(State(state): State<AppState>) -> Json<Vec<PluginInfo>> {
    Json(state.plugins.list().await)
}

/// POST /v1/admin/plugins/{system_name}/install
pub async fn install_plugin(
    State(state): State<AppState>,
    Extension(claims): Extension<AdminClaims>,
    Path(system_name): Path<String>,
) -> Result<Json<PluginStateResponse>, AppError> {
    state
        .plugins
        .install(&system_name)
        .await
        .map_err(AppError::from_plugin)?;

    info!("Plugin {} installed by {}", system_name, claims.sub);
    Ok(Json(PluginStateResponse {
        installed: state.plugins.is_installed(&system_name).await,
        system_name,
    }))
}

/// POST /v1/admin/plugins/{system_name}/uninstall
pub async fn uninstall_plugin(
    State(state): State<AppState>,
    Extension(claims): Extension<AdminClaims>,
    Path(system_name): Path<String>,
) -> Result<Json<PluginStateResponse>, AppError> {
    state
        .plugins
        .uninstall(&system_name)
        .await
        .map_err(AppError::from_plugin)?;

    info!("Plugin {} uninstalled by {}", system_name, claims.sub);
    Ok(Json(PluginStateResponse {
        installed: state.plugins.is_installed(&system_name).await,
        system_name,
    }))
}
