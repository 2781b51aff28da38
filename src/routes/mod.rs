use axum::http::StatusCode;
use axum::middleware::map_response;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::app_state::AppState;
use crate::error::ApiError;

pub mod health;
pub mod metrics;
pub mod process;
pub mod session;
pub mod settings;

/// Largest request body the relay reads.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Relay routes, with the REST endpoints mounted under `api_root`.
pub fn router(state: AppState, api_root: &str) -> Router {
    let rest = Router::new()
        .route("/agent-photo/v1/process", post(process::process_image))
        .route(
            "/agent-photo/v1/settings",
            get(settings::get_settings).put(settings::update_settings),
        );

    let root = api_root.trim_end_matches('/');
    let rest = if root.is_empty() {
        rest
    } else {
        Router::new().nest(root, rest)
    };

    Router::new()
        .route("/health", get(health::health_check))
        .merge(rest)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(map_response(oversized_body_envelope))
}

/// The body limit answers a declared oversized body with a bare 413.
async fn oversized_body_envelope(response: Response) -> Response {
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge.into_response();
    }
    response
}
