use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Teacher record as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub created_at: Option<OffsetDateTime>, // absent on records imported from old JSON files
}

/// Fields supplied by the admin when adding a teacher; already trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeacher {
    pub name: String,
    pub surname: String,
    pub email: String,
}

impl NewTeacher {
    pub fn into_teacher(self, id: Uuid, created_at: OffsetDateTime) -> Teacher {
        Teacher {
            id,
            name: self.name,
            surname: self.surname,
            email: self.email,
            created_at: Some(created_at),
        }
    }
}
