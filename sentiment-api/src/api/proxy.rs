//! Classifier pass-through endpoints

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::classifier::{ClassifierEndpoint, UpstreamResponse};
use crate::error::ApiResult;
use crate::AppState;

/// POST /api/predict
pub async fn predict(State(state): State<AppState>, body: Bytes) -> ApiResult<Response> {
    forward(&state, ClassifierEndpoint::Predict, body).await
}

/// POST /api/batch_predict
pub async fn batch_predict(State(state): State<AppState>, body: Bytes) -> ApiResult<Response> {
    forward(&state, ClassifierEndpoint::BatchPredict, body).await
}

async fn forward(state: &AppState, endpoint: ClassifierEndpoint, body: Bytes) -> ApiResult<Response> {
    let UpstreamResponse {
        status,
        content_type,
        body,
    } = state.classifier.forward(endpoint, body).await?;

    let content_type = content_type.unwrap_or_else(|| "application/json".to_string());
    Ok((status, [(header::CONTENT_TYPE, content_type)], body).into_response())
}
