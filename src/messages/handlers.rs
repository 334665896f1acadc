use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{error, instrument, warn};

use super::dto::MessagePayload;
use super::services::relay;
use crate::{error::ApiError, state::AppState};

pub fn message_routes() -> Router<AppState> {
    Router::new().route("/messages", post(send_message))
}

/// POST /messages; the body is never logged.
#[instrument(skip(state, payload))]
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<MessagePayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "unreadable message payload");
        ApiError::Validation("Geçersiz istek gövdesi.".into())
    })?;

    relay(state.teachers.as_ref(), state.mailer.as_ref(), payload)
        .await
        .inspect_err(|e| {
            if e.status().is_server_error() {
                error!(error = %e, "message relay failed");
            }
        })?;

    Ok(Json(json!({ "ok": true })))
}
