//! Pass-through client for the external classification service
//!
//! Request bodies go out unchanged and upstream status and body come back
//! unchanged; nothing here looks inside the JSON.

use axum::body::Bytes;
use axum::http::StatusCode;
use tracing::debug;

use crate::config::ClassifierConfig;
use crate::error::{ApiError, ApiResult};

/// Classifier routes this service proxies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierEndpoint {
    Predict,
    BatchPredict,
}

impl ClassifierEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            ClassifierEndpoint::Predict => "predict",
            ClassifierEndpoint::BatchPredict => "batch_predict",
        }
    }
}

/// Upstream answer, relayed as-is
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Clone)]
pub struct ClassifierClient {
    http: reqwest::Client,
    base_url: String,
}

impl ClassifierClient {
    pub fn new(config: &ClassifierConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        // Loopback targets never go through a system proxy
        if is_loopback(&config.base_url) {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn endpoint_url(&self, endpoint: ClassifierEndpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    /// POST `body` to the classifier and hand back whatever it answers
    pub async fn forward(
        &self,
        endpoint: ClassifierEndpoint,
        body: Bytes,
    ) -> ApiResult<UpstreamResponse> {
        let url = self.endpoint_url(endpoint);
        debug!("Forwarding {} bytes to {}", body.len(), url);

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        // reqwest and axum sit on different `http` major versions
        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(map_transport_error)?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

fn is_loopback(base_url: &str) -> bool {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .map(|host| matches!(host.as_str(), "localhost" | "127.0.0.1" | "[::1]" | "::1"))
        .unwrap_or(false)
}

fn map_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::ClassifierTimeout
    } else {
        ApiError::ClassifierUnreachable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_endpoint_urls() {
        let client = ClassifierClient::new(&ClassifierConfig {
            base_url: "http://classifier:8000".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        assert_eq!(
            client.endpoint_url(ClassifierEndpoint::Predict),
            "http://classifier:8000/predict"
        );
        assert_eq!(
            client.endpoint_url(ClassifierEndpoint::BatchPredict),
            "http://classifier:8000/batch_predict"
        );
    }

    #[test]
    fn test_loopback_detection() {
        assert!(is_loopback("http://127.0.0.1:9"));
        assert!(is_loopback("http://localhost:8000"));
        assert!(!is_loopback("https://classifier.internal"));
        assert!(!is_loopback("not a url"));
    }
}
