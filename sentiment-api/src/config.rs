//! Service configuration
//!
//! Command-line arguments fall back to environment variables, so a bare
//! `sentiment-api` run is configured entirely from the environment.

use clap::{Parser, ValueEnum};
use sentiment_common::db::PoolSettings;
use std::time::Duration;

/// Origins allowed in development mode
const DEV_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// Execution mode; selects which origins may call the API cross-origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    Development,
    Production,
}

/// Command-line arguments for sentiment-api
#[derive(Parser, Debug)]
#[command(name = "sentiment-api")]
#[command(about = "Sentiment result store with live aggregate updates")]
#[command(version)]
pub struct Args {
    /// Database connection string; persistence is disabled when absent
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Port to listen on
    #[arg(short, long, default_value = "5000", env = "PORT")]
    pub port: u16,

    /// Execution mode
    #[arg(long, value_enum, default_value = "development", env = "APP_ENV")]
    pub mode: RunMode,

    /// Comma-separated origins allowed in production mode
    #[arg(long, env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Base URL of the external classification service
    #[arg(long, default_value = "http://localhost:8000", env = "CLASSIFIER_URL")]
    pub classifier_url: String,

    /// Upper bound on a single classifier call, in seconds
    #[arg(long, default_value = "30", env = "CLASSIFIER_TIMEOUT_SECS")]
    pub classifier_timeout_secs: u64,

    /// Maximum concurrent database connections
    #[arg(long, default_value = "10", env = "DB_MAX_CONNECTIONS")]
    pub db_max_connections: u32,
}

/// Settings for the outbound classifier proxy
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub mode: RunMode,
    pub allowed_origins: Vec<String>,
    pub database_url: Option<String>,
    pub pool: PoolSettings,
    pub classifier: ClassifierConfig,
}

impl From<Args> for ApiConfig {
    fn from(args: Args) -> Self {
        Self {
            port: args.port,
            mode: args.mode,
            allowed_origins: args
                .allowed_origins
                .into_iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            database_url: args.database_url.filter(|url| !url.trim().is_empty()),
            pool: PoolSettings {
                max_connections: args.db_max_connections.max(1),
                ..PoolSettings::default()
            },
            classifier: ClassifierConfig {
                base_url: args.classifier_url.trim_end_matches('/').to_string(),
                timeout: Duration::from_secs(args.classifier_timeout_secs),
            },
        }
    }
}

impl ApiConfig {
    /// Origins permitted by CORS for the configured mode
    pub fn cors_origins(&self) -> Vec<String> {
        match self.mode {
            RunMode::Development => DEV_ORIGINS.iter().map(|o| o.to_string()).collect(),
            RunMode::Production => self.allowed_origins.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ApiConfig {
        let mut argv = vec!["sentiment-api"];
        argv.extend_from_slice(args);
        Args::parse_from(argv).into()
    }

    #[test]
    fn test_production_uses_configured_origins() {
        let config = parse(&[
            "--mode",
            "production",
            "--allowed-origins",
            "https://a.example, https://b.example",
            "--port",
            "8080",
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.cors_origins(),
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_development_uses_local_origins() {
        let config = parse(&["--mode", "development", "--allowed-origins", "https://a.example"]);
        assert!(config
            .cors_origins()
            .contains(&"http://localhost:3000".to_string()));
        assert!(!config
            .cors_origins()
            .contains(&"https://a.example".to_string()));
    }

    #[test]
    fn test_classifier_url_trailing_slash_trimmed() {
        let config = parse(&["--classifier-url", "http://classifier:9000/"]);
        assert_eq!(config.classifier.base_url, "http://classifier:9000");
    }

    #[test]
    fn test_blank_database_url_means_unconfigured() {
        let config = parse(&["--database-url", "  "]);
        assert!(config.database_url.is_none());
    }
}
