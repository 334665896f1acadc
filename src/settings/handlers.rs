use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::SaveSettingsRequest;
use super::repo_types::Settings;
use super::services::{load_settings, validate_settings};
use crate::{error::ApiError, state::AppState};

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/settings", get(get_settings).put(save_settings))
}

#[instrument(skip(state))]
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, ApiError> {
    let settings = load_settings(state.settings.as_ref())
        .await
        .map_err(ApiError::store("Ayarlar okunamadı."))?;
    Ok(Json(settings))
}

#[instrument(skip(state, payload))]
pub async fn save_settings(
    State(state): State<AppState>,
    payload: Result<Json<SaveSettingsRequest>, JsonRejection>,
) -> Result<Json<Settings>, ApiError> {
    let Json(req) = payload.map_err(|e| {
        warn!(error = %e, "unreadable settings payload");
        ApiError::Validation("Geçersiz istek gövdesi.".into())
    })?;
    let settings = validate_settings(req)?;

    let stored = state
        .settings
        .save(&settings)
        .await
        .map_err(ApiError::store("Ayarlar kaydedilemedi."))?;
    info!(school_name = %stored.school_name, "settings saved");
    Ok(Json(stored))
}
