//! sentiment-api library
//!
//! Stores classification results, serves aggregate statistics over REST,
//! pushes updates to WebSocket subscribers and proxies the classifier.

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod broadcast;
pub mod classifier;
pub mod config;
pub mod error;
pub mod stats;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use crate::broadcast::Broadcaster;
use crate::classifier::ClassifierClient;
use crate::store::SentimentStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Sentiment table handle (connected or unavailable)
    pub store: SentimentStore,
    /// Fan-out to WebSocket subscribers
    pub broadcaster: Broadcaster,
    /// Outbound classifier proxy
    pub classifier: ClassifierClient,
}

impl AppState {
    pub fn new(store: SentimentStore, broadcaster: Broadcaster, classifier: ClassifierClient) -> Self {
        Self {
            store,
            broadcaster,
            classifier,
        }
    }
}

/// Build application router
///
/// CORS is layered on by the caller since it depends on the run mode.
/// Unknown paths and known paths with the wrong method both get the JSON 404.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post};

    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/save-sentiment", post(api::save_sentiment))
        .route("/api/sentiment-data", get(api::sentiment_data))
        .route("/api/sentiment-stats", get(api::sentiment_stats))
        .route("/api/chart-data", get(api::chart_data))
        .route("/api/recent-entries", get(api::recent_entries))
        .route("/api/clear-data", delete(api::clear_data))
        .route("/api/predict", post(api::predict))
        .route("/api/batch_predict", post(api::batch_predict))
        .route("/ws", get(api::ws_handler))
        .fallback(api::not_found)
        .method_not_allowed_fallback(api::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(api::handle_panic))
        .layer(TraceLayer::new_for_http())
}
