use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::process::{ProcessRequest, ProcessResponse};
use crate::services::auth::{Capability, Session};

/// POST /agent-photo/v1/process — Generate alt text, legend and titles for an image.
///
/// The session is checked before the body is looked at. A body that is not
/// valid JSON is handled like one with no fields. One over the body limit is
/// refused with 413.
pub async fn process_image(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessResponse>, ApiError> {
    session.require(Capability::EditPosts)?;

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(ApiError::PayloadTooLarge);
        }
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable process request body");
            ProcessRequest::default()
        }
    };

    let result = state.processor.process(request).await?;
    Ok(Json(result.into()))
}
