//! Sentiment record endpoints
//!
//! Mutating handlers (`save-sentiment`, `clear-data`) push a fresh aggregate
//! view to subscribers once the mutation has succeeded.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use sentiment_common::aggregate::{ChartEntry, ClassStats, DataSnapshot};
use sentiment_common::db::{SentimentInput, SentimentRecord};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::store::DEFAULT_RECENT_LIMIT;
use crate::{stats, AppState};

/// `?limit=` as sent by the client. Values that are not a positive integer
/// count as no limit.
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

impl LimitQuery {
    pub fn positive(&self) -> Option<usize> {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|&l| l > 0)
    }
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub data: SentimentRecord,
    pub statistics: Vec<ClassStats>,
    pub chart_data: Vec<ChartEntry>,
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub success: bool,
    pub data: Vec<SentimentRecord>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub snapshot: DataSnapshot,
}

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub success: bool,
    pub data: Vec<ChartEntry>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
    pub deleted: u64,
}

/// POST /api/save-sentiment
pub async fn save_sentiment(
    State(state): State<AppState>,
    payload: Result<Json<SentimentInput>, JsonRejection>,
) -> ApiResult<Json<SaveResponse>> {
    let Json(input) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let missing = input.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing));
    }

    let record = state.store.insert(&input).await?;
    info!(
        "Saved sentiment record {} ({}, confidence {})",
        record.id, record.predicted_class, record.confidence
    );

    let snapshot = state.broadcaster.publish_update(&state.store).await;

    Ok(Json(SaveResponse {
        success: true,
        data: record,
        statistics: snapshot.statistics,
        chart_data: snapshot.chart_data,
    }))
}

/// GET /api/sentiment-data?limit=N
///
/// Reads every record, then keeps the first `limit` (newest first).
/// A missing, zero or unparseable limit returns everything.
pub async fn sentiment_data(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<RecordsResponse> {
    let mut data = state.store.list_all().await;
    if let Some(limit) = query.positive() {
        data.truncate(limit);
    }

    Json(RecordsResponse {
        success: true,
        count: data.len(),
        data,
    })
}

/// GET /api/recent-entries?limit=N
///
/// Falls back to the default count when the limit is missing or invalid.
pub async fn recent_entries(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<RecordsResponse> {
    let limit = query
        .positive()
        .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
        .unwrap_or(DEFAULT_RECENT_LIMIT);
    let data = state.store.list_recent(limit).await;

    Json(RecordsResponse {
        success: true,
        count: data.len(),
        data,
    })
}

/// GET /api/sentiment-stats
pub async fn sentiment_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        success: true,
        snapshot: stats::snapshot(&state.store).await,
    })
}

/// GET /api/chart-data
pub async fn chart_data(State(state): State<AppState>) -> Json<ChartResponse> {
    Json(ChartResponse {
        success: true,
        data: stats::chart_data(&state.store).await,
    })
}

/// DELETE /api/clear-data
pub async fn clear_data(State(state): State<AppState>) -> ApiResult<Json<ClearResponse>> {
    let deleted = state.store.delete_all().await?;
    info!("Cleared {} sentiment records", deleted);

    state.broadcaster.publish_update(&state.store).await;

    Ok(Json(ClearResponse {
        success: true,
        message: "All sentiment data cleared".to_string(),
        deleted,
    }))
}
