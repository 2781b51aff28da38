use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use garde::Validate;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::settings::{SettingsResponse, UpdateSettingsRequest};
use crate::services::auth::{Capability, Session};

/// GET /agent-photo/v1/settings — Whether a provider API key is configured.
pub async fn get_settings(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<SettingsResponse>, ApiError> {
    session.require(Capability::ManageOptions)?;

    let api_key_set = state.settings.api_key().await?.is_some();
    Ok(Json(SettingsResponse {
        success: true,
        api_key_set,
    }))
}

/// PUT /agent-photo/v1/settings — Store or clear the provider API key.
pub async fn update_settings(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<UpdateSettingsRequest>, JsonRejection>,
) -> Result<Json<SettingsResponse>, ApiError> {
    session.require(Capability::ManageOptions)?;

    let Json(body) = payload.map_err(|rejection| ApiError::InvalidSettings(rejection.body_text()))?;
    body.validate()
        .map_err(|report| ApiError::InvalidSettings(report.to_string()))?;

    let api_key_set = state.settings.set_api_key(&body.api_key).await?;
    tracing::info!(user = %session.user, api_key_set, "Settings saved");

    Ok(Json(SettingsResponse {
        success: true,
        api_key_set,
    }))
}
