use super::dto::SaveSettingsRequest;
use super::repo::SettingsRepo;
use super::repo_types::{Settings, SETTINGS_ID};
use crate::error::{ApiError, RepoError};

/// Stored settings, or the defaults when nothing has been saved yet.
pub async fn load_settings(repo: &dyn SettingsRepo) -> Result<Settings, RepoError> {
    Ok(repo.get().await?.unwrap_or_default())
}

pub fn validate_settings(req: SaveSettingsRequest) -> Result<Settings, ApiError> {
    let school_name = req.school_name.unwrap_or_default().trim().to_string();
    let admin_password = req.admin_password.unwrap_or_default().trim().to_string();

    if school_name.is_empty() || admin_password.is_empty() {
        return Err(ApiError::Validation(
            "Okul adı ve admin şifresi zorunludur.".into(),
        ));
    }
    Ok(Settings {
        id: SETTINGS_ID,
        school_name,
        admin_password,
    })
}
