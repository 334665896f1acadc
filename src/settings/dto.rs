use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSettingsRequest {
    #[serde(default)]
    pub school_name: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
}
