use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Settings, SETTINGS_ID};
use crate::error::RepoError;

#[async_trait]
pub trait SettingsRepo: Send + Sync {
    async fn get(&self) -> Result<Option<Settings>, RepoError>;
    /// Upserts the singleton row; the stored id is always [`SETTINGS_ID`].
    async fn save(&self, settings: &Settings) -> Result<Settings, RepoError>;
    async fn clear(&self) -> Result<(), RepoError>;
}

#[async_trait]
impl SettingsRepo for PgPool {
    async fn get(&self) -> Result<Option<Settings>, RepoError> {
        let row = sqlx::query_as::<_, Settings>(
            r#"
            SELECT id, school_name, admin_password
            FROM settings
            ORDER BY id
            LIMIT 1
            "#,
        )
        .fetch_optional(self)
        .await?;
        Ok(row)
    }

    async fn save(&self, settings: &Settings) -> Result<Settings, RepoError> {
        let row = sqlx::query_as::<_, Settings>(
            r#"
            INSERT INTO settings (id, school_name, admin_password)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
               SET school_name = EXCLUDED.school_name,
                   admin_password = EXCLUDED.admin_password
            RETURNING id, school_name, admin_password
            "#,
        )
        .bind(SETTINGS_ID)
        .bind(&settings.school_name)
        .bind(&settings.admin_password)
        .fetch_one(self)
        .await?;
        Ok(row)
    }

    async fn clear(&self) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM settings").execute(self).await?;
        Ok(())
    }
}
