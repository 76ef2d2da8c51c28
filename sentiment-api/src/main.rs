//! sentiment-api - Sentiment result service
//!
//! Persists classification results, serves statistics, pushes live updates
//! and proxies the external classifier.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sentiment_api::broadcast::Broadcaster;
use sentiment_api::classifier::ClassifierClient;
use sentiment_api::config::{ApiConfig, Args};
use sentiment_api::store::SentimentStore;
use sentiment_api::{api, build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "sentiment_api=info,sentiment_common=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting sentiment-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = ApiConfig::from(Args::parse());
    info!("Run mode: {:?}", config.mode);

    // Unreachable or unconfigured databases degrade; only schema failures exit
    let store = SentimentStore::initialize(config.database_url.as_deref(), &config.pool)
        .await
        .context("Database initialization failed")?;
    info!("Store status: {:?}", store.connection_status());

    let classifier =
        ClassifierClient::new(&config.classifier).context("Failed to build classifier client")?;
    info!("Classifier proxy target: {}", config.classifier.base_url);

    let state = AppState::new(store.clone(), Broadcaster::default(), classifier);
    let app = build_router(state).layer(api::cors_layer(&config.cors_origins()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("sentiment-api listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    store.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
