//! Error types for sentiment-api
//!
//! Every handler error becomes a JSON body; internal detail is logged here
//! and only surfaced where the response contract calls for it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Body returned when the classifier cannot be reached
pub const CLASSIFIER_UNREACHABLE: &str = "Failed to connect to the classification service";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request body (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Required fields absent from a save request (400)
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Store rejected or failed a mutation (500, message passed through)
    #[error("{0}")]
    Store(#[from] sentiment_common::Error),

    /// Classifier request could not be made (500, generic message)
    #[error("Classifier unreachable: {0}")]
    ClassifierUnreachable(String),

    /// Classifier did not answer within the configured timeout.
    ///
    /// Answers 504 rather than the generic 500 used for other transport
    /// failures, so a slow classifier is distinguishable from a missing one.
    #[error("Classifier timed out")]
    ClassifierTimeout,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(msg) => {
                warn!("Rejected request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "success": false, "error": msg }),
                )
            }
            ApiError::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "error": format!("Missing required fields: {}", fields.join(", ")),
                    "missing_fields": fields,
                }),
            ),
            ApiError::Store(sentiment_common::Error::Validation { missing }) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "error": self.to_string(),
                    "missing_fields": missing,
                }),
            ),
            ApiError::Store(err) => {
                error!("Store operation failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": err.to_string() }),
                )
            }
            ApiError::ClassifierUnreachable(detail) => {
                error!("Classifier request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": CLASSIFIER_UNREACHABLE }),
                )
            }
            ApiError::ClassifierTimeout => {
                error!("Classifier request timed out");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    json!({ "error": "Classification service timed out" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
