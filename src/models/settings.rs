use garde::Validate;
use serde::{Deserialize, Serialize};

/// Option name under which the provider API key is stored.
pub const API_KEY_OPTION: &str = "agent_photo_api_key";

/// Body of `PUT /agent-photo/v1/settings`. An empty key clears the setting.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    #[garde(length(max = 512))]
    pub api_key: String,
}

/// Settings view. The key itself is never echoed back.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub success: bool,
    pub api_key_set: bool,
}
