use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{NewTeacher, Teacher};
use crate::error::RepoError;

#[async_trait]
pub trait TeacherRepo: Send + Sync {
    /// All teachers, newest first.
    async fn list(&self) -> Result<Vec<Teacher>, RepoError>;
    async fn get(&self, id: Uuid) -> Result<Option<Teacher>, RepoError>;
    /// Stores the teacher under a freshly generated id.
    async fn insert(&self, new: NewTeacher) -> Result<Teacher, RepoError>;
    /// Returns `false` when no teacher had this id.
    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;
    /// Removes every teacher, returning how many were deleted.
    async fn clear(&self) -> Result<u64, RepoError>;
}

#[async_trait]
impl TeacherRepo for PgPool {
    async fn list(&self) -> Result<Vec<Teacher>, RepoError> {
        let rows = sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, name, surname, email, created_at
            FROM teachers
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Teacher>, RepoError> {
        let row = sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, name, surname, email, created_at
            FROM teachers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self)
        .await?;
        Ok(row)
    }

    async fn insert(&self, new: NewTeacher) -> Result<Teacher, RepoError> {
        let teacher = sqlx::query_as::<_, Teacher>(
            r#"
            INSERT INTO teachers (id, name, surname, email, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, surname, email, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.surname)
        .bind(&new.email)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(self)
        .await?;
        Ok(teacher)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let res = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(self)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<u64, RepoError> {
        let res = sqlx::query("DELETE FROM teachers").execute(self).await?;
        Ok(res.rows_affected())
    }
}
