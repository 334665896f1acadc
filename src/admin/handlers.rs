use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, instrument, warn};

use crate::{error::ApiError, settings::services::load_settings, state::AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login", post(login))
        .route("/reset", post(reset))
}

/// Plain string equality against the stored password. This only tells the client whether to
/// show the admin panel; no route is guarded by it.
pub fn password_matches(stored: &str, candidate: &str) -> bool {
    stored == candidate
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload.map_err(|e| {
        warn!(error = %e, "unreadable login payload");
        ApiError::Validation("Geçersiz istek gövdesi.".into())
    })?;

    let settings = load_settings(state.settings.as_ref())
        .await
        .map_err(ApiError::store("Şifre kontrol edilemedi."))?;

    if !password_matches(&settings.admin_password, &req.password) {
        warn!("admin login with wrong password");
        return Err(ApiError::Unauthorized("Şifre hatalı. Lütfen tekrar deneyin."));
    }

    info!("admin login");
    Ok(Json(json!({ "ok": true })))
}

/// Drops every teacher and the settings record.
#[instrument(skip(state))]
pub async fn reset(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let removed = state
        .teachers
        .clear()
        .await
        .inspect_err(|e| error!(error = %e, "teacher reset failed"))
        .map_err(ApiError::store("Öğretmenler silinemedi."))?;

    state
        .settings
        .clear()
        .await
        .inspect_err(|e| error!(error = %e, "settings reset failed"))
        .map_err(ApiError::store("Ayarlar silinemedi."))?;

    info!(teachers_removed = removed, "portal reset");
    Ok(Json(json!({ "ok": true })))
}
