use uuid::Uuid;

use super::dto::CreateTeacherRequest;
use super::repo::TeacherRepo;
use super::repo_types::{NewTeacher, Teacher};
use crate::error::ApiError;

/// Ids that are not UUIDs cannot name a stored teacher.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

pub fn validate_new_teacher(req: CreateTeacherRequest) -> Result<NewTeacher, ApiError> {
    let field = |v: Option<String>| v.map(|s| s.trim().to_string()).unwrap_or_default();
    let name = field(req.name);
    let surname = field(req.surname);
    let email = field(req.email);

    if name.is_empty() || surname.is_empty() || email.is_empty() {
        return Err(ApiError::Validation(
            "Ad, soyad ve e-posta zorunludur.".into(),
        ));
    }
    Ok(NewTeacher {
        name,
        surname,
        email,
    })
}

/// Resolves a raw id to a teacher, or the teacher-not-found error.
pub async fn find_teacher(repo: &dyn TeacherRepo, raw_id: &str) -> Result<Teacher, ApiError> {
    let Some(id) = parse_id(raw_id) else {
        return Err(ApiError::teacher_not_found());
    };
    repo.get(id)
        .await
        .map_err(ApiError::store("Öğretmen bilgisi alınamadı."))?
        .ok_or_else(ApiError::teacher_not_found)
}
