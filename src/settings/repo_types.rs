use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const SETTINGS_ID: i32 = 1;
pub const DEFAULT_SCHOOL_NAME: &str = "Örnek Okul";
pub const DEFAULT_ADMIN_PASSWORD: &str = "0000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_id")]
    pub id: i32,
    #[serde(default = "default_school_name")]
    pub school_name: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String, // plaintext, compared verbatim by the admin gate
}

fn default_id() -> i32 {
    SETTINGS_ID
}

fn default_school_name() -> String {
    DEFAULT_SCHOOL_NAME.to_string()
}

fn default_admin_password() -> String {
    DEFAULT_ADMIN_PASSWORD.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id: SETTINGS_ID,
            school_name: default_school_name(),
            admin_password: default_admin_password(),
        }
    }
}
