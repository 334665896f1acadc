use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{CreateTeacherRequest, DeletedResponse, TeacherEnvelope, TeacherQuery};
use super::repo_types::Teacher;
use super::services::{find_teacher, parse_id, validate_new_teacher};
use crate::{error::ApiError, state::AppState};

pub fn teacher_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/teachers",
            get(list_teachers)
                .post(create_teacher)
                .delete(delete_teacher_by_query),
        )
        .route("/teachers/:id", get(get_teacher).delete(delete_teacher))
}

/// GET /teachers, or a single teacher with `?id=`.
#[instrument(skip(state))]
pub async fn list_teachers(
    State(state): State<AppState>,
    Query(q): Query<TeacherQuery>,
) -> Result<Response, ApiError> {
    if let Some(id) = q.id.as_deref().filter(|id| !id.trim().is_empty()) {
        let teacher = find_teacher(state.teachers.as_ref(), id).await?;
        return Ok(Json(teacher).into_response());
    }

    let teachers = state
        .teachers
        .list()
        .await
        .map_err(ApiError::store("Öğretmenler yüklenemedi."))?;
    Ok(Json(teachers).into_response())
}

/// GET /teachers/{id}, wrapped as `{ "teacher": ... }`.
#[instrument(skip(state))]
pub async fn get_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TeacherEnvelope>, ApiError> {
    let teacher = find_teacher(state.teachers.as_ref(), &id).await?;
    Ok(Json(TeacherEnvelope { teacher }))
}

#[instrument(skip(state, payload))]
pub async fn create_teacher(
    State(state): State<AppState>,
    payload: Result<Json<CreateTeacherRequest>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Teacher>), ApiError> {
    let Json(req) = payload.map_err(|e| {
        warn!(error = %e, "unreadable teacher payload");
        ApiError::Validation("Geçersiz istek gövdesi.".into())
    })?;
    let new = validate_new_teacher(req).inspect_err(|_| warn!("teacher fields missing"))?;

    let teacher = state
        .teachers
        .insert(new)
        .await
        .map_err(ApiError::store("Öğretmen eklenemedi."))?;

    info!(teacher_id = %teacher.id, "teacher created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/teachers/{}", teacher.id))],
        Json(teacher),
    ))
}

/// DELETE /teachers?id=
#[instrument(skip(state))]
pub async fn delete_teacher_by_query(
    State(state): State<AppState>,
    Query(q): Query<TeacherQuery>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let Some(id) = q.id.filter(|id| !id.trim().is_empty()) else {
        return Err(ApiError::Validation("Eksik id.".into()));
    };
    remove_teacher(&state, &id).await
}

#[instrument(skip(state))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    remove_teacher(&state, &id).await
}

async fn remove_teacher(state: &AppState, raw_id: &str) -> Result<Json<DeletedResponse>, ApiError> {
    let Some(id) = parse_id(raw_id) else {
        return Err(ApiError::teacher_not_found());
    };
    let deleted = state
        .teachers
        .delete(id)
        .await
        .map_err(ApiError::store("Öğretmen silinemedi."))?;
    if !deleted {
        warn!(teacher_id = %id, "delete of unknown teacher");
        return Err(ApiError::teacher_not_found());
    }

    info!(teacher_id = %id, "teacher deleted");
    Ok(Json(DeletedResponse { ok: true, id }))
}
