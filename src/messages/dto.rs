use serde::Deserialize;

/// Raw form submission; every field may be missing.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub student_class: Option<String>,
    #[serde(default)]
    pub student_phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
