//! Health check endpoint

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use sentiment_common::aggregate::{ConnectionStatus, DatabaseInfo};
use serde::Serialize;

use crate::{stats, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub database: DatabaseInfo,
}

/// GET /api/health
///
/// 200 in every store mode, including fallback; 500 only when the
/// database info query itself failed.
pub async fn health(State(state): State<AppState>) -> Response {
    let database = stats::database_info(&state.store).await;

    if database.connection_status == ConnectionStatus::Error {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "status": "ERROR",
                "error": "Failed to read database info",
                "database": database,
            })),
        )
            .into_response();
    }

    Json(HealthResponse {
        status: "OK".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        database,
    })
    .into_response()
}
