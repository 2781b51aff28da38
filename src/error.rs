use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use strum::Display;

use crate::models::process::FailureResponse;
use crate::services::auth::AuthError;
use crate::services::store::StoreError;

/// Failure classes of a processing call, as reported in `debug.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    ClientValidationError,
    ConfigurationError,
    TransportError,
    #[strum(serialize = "openai_error")]
    ProviderError,
    InvalidResponse,
    JsonParseError,
    MissingKey,
    StorageError,
}

/// Terminal failure of one processing call. None of them is retried.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Image ID or URL is missing")]
    MissingInput {
        image_id: serde_json::Value,
        image_url: serde_json::Value,
    },

    #[error("API key is not set")]
    MissingApiKey,

    #[error("{}", transport_message(.0))]
    Transport(#[source] reqwest::Error),

    #[error("Error from OpenAI API: {body}")]
    Provider { status: u16, body: String },

    #[error("Invalid response structure from OpenAI API")]
    InvalidResponse,

    #[error("Error parsing OpenAI response")]
    JsonParse(#[source] serde_json::Error),

    #[error("Missing required key in response: {0}")]
    MissingKey(&'static str),

    #[error("Storage error")]
    Storage(#[from] StoreError),
}

impl ProcessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessError::MissingInput { .. } => ErrorKind::ClientValidationError,
            ProcessError::MissingApiKey => ErrorKind::ConfigurationError,
            ProcessError::Transport(_) => ErrorKind::TransportError,
            ProcessError::Provider { .. } => ErrorKind::ProviderError,
            ProcessError::InvalidResponse => ErrorKind::InvalidResponse,
            ProcessError::JsonParse(_) => ErrorKind::JsonParseError,
            ProcessError::MissingKey(_) => ErrorKind::MissingKey,
            ProcessError::Storage(_) => ErrorKind::StorageError,
        }
    }

    /// Detail that rides along with the message in the failure envelope.
    pub fn debug(&self) -> serde_json::Value {
        let code = self.kind().to_string();
        match self {
            ProcessError::MissingInput {
                image_id,
                image_url,
            } => json!({ "code": code, "imageId": image_id, "imageUrl": image_url }),
            ProcessError::Transport(err) => json!({
                "code": code,
                "timeout": err.is_timeout(),
                "connect": err.is_connect(),
            }),
            ProcessError::Provider { status, .. } => json!({ "code": code, "status": status }),
            ProcessError::JsonParse(err) => json!({ "code": code, "detail": err.to_string() }),
            ProcessError::MissingKey(key) => json!({ "code": code, "key": key }),
            _ => json!({ "code": code }),
        }
    }
}

/// reqwest's own message stops at the request URL; the cause chain names
/// what actually failed.
fn transport_message(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    if err.is_timeout() && !message.contains("timed out") {
        message.push_str(": operation timed out");
    }
    message
}

/// HTTP-facing error of the relay routes.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Request body is too large")]
    PayloadTooLarge,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Process(err) => {
                tracing::warn!(error_kind = %err.kind(), error = %err, "Image processing failed");
                (
                    StatusCode::BAD_REQUEST,
                    FailureResponse::new(err.to_string(), Some(err.debug())),
                )
            }
            ApiError::Auth(err) => {
                tracing::info!(error = %err, "Rejected unauthorized caller");
                let status = match err {
                    AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
                    AuthError::MissingToken | AuthError::InvalidToken(_) => {
                        StatusCode::UNAUTHORIZED
                    }
                };
                (
                    status,
                    FailureResponse::new("Sorry, you are not allowed to do that.", None),
                )
            }
            ApiError::InvalidSettings(msg) => {
                (StatusCode::BAD_REQUEST, FailureResponse::new(msg.clone(), None))
            }
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                FailureResponse::new(self.to_string(), None),
            ),
            ApiError::Store(err) => {
                tracing::error!(error = %err, "Store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    FailureResponse::new("An internal error occurred", None),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_render_as_wire_codes() {
        assert_eq!(ErrorKind::ProviderError.to_string(), "openai_error");
        assert_eq!(ErrorKind::JsonParseError.to_string(), "json_parse_error");
        assert_eq!(ErrorKind::ClientValidationError.to_string(), "client_validation_error");
    }

    #[test]
    fn missing_key_message_names_the_key() {
        let err = ProcessError::MissingKey("title2");
        assert_eq!(err.to_string(), "Missing required key in response: title2");
        assert_eq!(err.debug()["key"], "title2");
    }

    #[test]
    fn provider_message_carries_the_raw_body() {
        let err = ProcessError::Provider {
            status: 429,
            body: r#"{"error":"rate"}"#.to_string(),
        };
        assert_eq!(err.to_string(), r#"Error from OpenAI API: {"error":"rate"}"#);
        assert_eq!(err.debug()["code"], "openai_error");
    }
}
