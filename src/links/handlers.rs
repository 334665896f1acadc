use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{error, instrument};

use super::services::{form_link, render_qr_svg, resolve_base_url};
use crate::{
    error::ApiError,
    state::AppState,
    teachers::{services::find_teacher, Teacher},
};

#[derive(Debug, Serialize)]
pub struct TeacherLink {
    pub url: String,
    pub teacher: Teacher,
}

pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/teachers/:id/link", get(teacher_link))
        .route("/teachers/:id/qr", get(teacher_qr))
}

async fn link_for(
    state: &AppState,
    headers: &HeaderMap,
    raw_id: &str,
) -> Result<TeacherLink, ApiError> {
    let teacher = find_teacher(state.teachers.as_ref(), raw_id).await?;
    let base = resolve_base_url(state.config.site_url.as_deref(), headers)
        .ok_or(ApiError::Misconfigured("Site adresi belirlenemedi."))?;
    Ok(TeacherLink {
        url: form_link(&base, teacher.id),
        teacher,
    })
}

#[instrument(skip(state, headers))]
pub async fn teacher_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<TeacherLink>, ApiError> {
    Ok(Json(link_for(&state, &headers, &id).await?))
}

#[instrument(skip(state, headers))]
pub async fn teacher_qr(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let link = link_for(&state, &headers, &id).await?;
    let svg = render_qr_svg(&link.url).map_err(|e| {
        error!(error = %e, url = %link.url, "qr render failed");
        ApiError::Misconfigured("QR kodu oluşturulamadı.")
    })?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}
