use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use sqlx::postgres::PgDatabaseError;
use thiserror::Error;

use crate::mail::MailError;

/// Failure of a persistence backend (Postgres or the JSON file store).
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RepoError {
    /// Postgres `code`, `detail` and `hint` when the backend reported them.
    fn pg_fields(&self) -> (Option<String>, Option<String>, Option<String>) {
        let RepoError::Database(err) = self else {
            return (None, None, None);
        };
        let Some(db_err) = err.as_database_error() else {
            return (None, None, None);
        };
        let code = db_err.code().map(|c| c.into_owned());
        match db_err.try_downcast_ref::<PgDatabaseError>() {
            Some(pg) => (
                code,
                pg.detail().map(str::to_owned),
                pg.hint().map(str::to_owned),
            ),
            None => (code, None, None),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Misconfigured(&'static str),

    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: RepoError,
    },

    #[error(transparent)]
    Mail(#[from] MailError),
}

impl ApiError {
    pub fn store(context: &'static str) -> impl FnOnce(RepoError) -> ApiError {
        move |source| ApiError::Store { context, source }
    }

    pub fn teacher_not_found() -> Self {
        ApiError::NotFound("Öğretmen bulunamadı.")
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Misconfigured(_) | ApiError::Store { .. } | ApiError::Mail(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(source: RepoError) -> Self {
        ApiError::Store {
            context: "Veri deposu hatası.",
            source,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorBody {
    fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            code: None,
            hint: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(msg) => ErrorBody::message(msg),
            ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Misconfigured(msg) => ErrorBody::message(msg),
            ApiError::Store { context, source } => {
                let (code, detail, hint) = source.pg_fields();
                ErrorBody {
                    error: context.to_string(),
                    details: Some(detail.unwrap_or_else(|| source.to_string())),
                    code,
                    hint,
                }
            }
            ApiError::Mail(MailError::NotConfigured) => ErrorBody::message("SMTP ayarları eksik."),
            ApiError::Mail(err) => ErrorBody {
                error: "E-posta gönderilemedi.".to_string(),
                details: Some(err.to_string()),
                code: None,
                hint: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
