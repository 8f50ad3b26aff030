// src/service/handler.rs
//! Request handling and the mapping of failures onto HTTP responses.

use super::AppState;
use crate::error::{AppError, ErrorCategory};
use crate::output::GIF_CONTENT_TYPE;
use crate::types::AnimationRequest;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

const REQUEST_TIMEOUT_MESSAGE: &str = "request timed out";

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

fn json_error(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { message })).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.category() {
            ErrorCategory::BadInput => StatusCode::BAD_REQUEST,
            ErrorCategory::UpstreamFailure => StatusCode::BAD_GATEWAY,
            ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        json_error(status, self.to_string())
    }
}

/// `POST {base_path}/wms`: JSON request in, `image/gif` out.
pub async fn animate(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let started = Instant::now();

    let request: AnimationRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            log::info!("Rejected request body: {}", e);
            return AppError::from(e).into_response();
        }
    };

    let outcome =
        tokio::time::timeout(state.request_timeout, state.animator.animate(&request)).await;

    match outcome {
        Ok(Ok(animation)) => {
            log::info!(
                "Served {} frames ({} bytes, {} per frame) in {:?}",
                animation.frame_count,
                animation.bytes.len(),
                animation.frame_delay,
                started.elapsed()
            );
            ([(header::CONTENT_TYPE, GIF_CONTENT_TYPE)], animation.bytes).into_response()
        }
        Ok(Err(e)) => {
            log::warn!("Animation of {} failed ({}): {}", request.url, e.category(), e);
            e.into_response()
        }
        Err(_) => {
            log::warn!(
                "Animation of {} timed out after {:?}",
                request.url,
                state.request_timeout
            );
            json_error(
                StatusCode::SERVICE_UNAVAILABLE,
                REQUEST_TIMEOUT_MESSAGE.to_string(),
            )
        }
    }
}
