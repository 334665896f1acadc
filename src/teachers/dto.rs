use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::Teacher;

#[derive(Debug, Default, Deserialize)]
pub struct CreateTeacherRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeacherQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub ok: bool,
    pub id: Uuid,
}

/// Body of `GET /teachers/{id}`; the form and QR pages read `teacher`.
#[derive(Debug, Serialize)]
pub struct TeacherEnvelope {
    pub teacher: Teacher,
}
