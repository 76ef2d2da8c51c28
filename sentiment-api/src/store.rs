//! Store adapter for sentiment records
//!
//! The store is either backed by a connection pool or explicitly unavailable.
//! Reads on an unavailable store (or a failing query) log and return empty
//! results; mutations return an error the handlers turn into a JSON body.

use chrono::{DateTime, SecondsFormat, Utc};
use sentiment_common::aggregate::ConnectionStatus;
use sentiment_common::db::{
    connect_pool, create_schema, PoolSettings, SentimentInput, SentimentRecord, SentimentRow,
};
use sentiment_common::{Error, Result};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Page size for `list_recent` when the caller gives none
pub const DEFAULT_RECENT_LIMIT: i64 = 10;

const SELECT_RECORDS: &str = r#"
    SELECT id, text, predicted_class, confidence,
           positive_prob, negative_prob, neutral_prob,
           source, created_at, updated_at
    FROM sentiment_analysis
"#;

/// Why the store has no database behind it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// No connection string was configured
    NotConfigured,
    /// A connection string was given but the database did not answer
    Unreachable,
}

/// Raw per-label aggregate straight from the `GROUP BY` query
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ClassAggregate {
    pub predicted_class: String,
    pub count: i64,
    pub avg_confidence: f64,
}

/// Handle to the sentiment table
#[derive(Debug, Clone)]
pub enum SentimentStore {
    Connected(SqlitePool),
    Unavailable(UnavailableReason),
}

impl SentimentStore {
    /// Connect and prepare the schema
    ///
    /// A missing URL or an unreachable database yields an `Unavailable` store.
    /// Only a schema failure on a reachable database is returned as an error.
    pub async fn initialize(database_url: Option<&str>, settings: &PoolSettings) -> Result<Self> {
        let Some(url) = database_url else {
            warn!("No database configured, running in fallback mode without persistence");
            return Ok(Self::Unavailable(UnavailableReason::NotConfigured));
        };

        let pool = match connect_pool(url, settings).await {
            Ok(pool) => pool,
            Err(e) => {
                warn!("Database unreachable, running in degraded mode: {}", e);
                return Ok(Self::Unavailable(UnavailableReason::Unreachable));
            }
        };

        create_schema(&pool).await?;
        info!("✓ Connected to database");
        Ok(Self::Connected(pool))
    }

    /// Availability as reported to clients
    pub fn connection_status(&self) -> ConnectionStatus {
        match self {
            Self::Connected(_) => ConnectionStatus::Connected,
            Self::Unavailable(UnavailableReason::NotConfigured) => ConnectionStatus::FallbackMode,
            Self::Unavailable(UnavailableReason::Unreachable) => ConnectionStatus::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    fn pool(&self) -> Result<&SqlitePool> {
        match self {
            Self::Connected(pool) => Ok(pool),
            Self::Unavailable(UnavailableReason::NotConfigured) => Err(Error::Unavailable(
                "no database configured (fallback mode)".to_string(),
            )),
            Self::Unavailable(UnavailableReason::Unreachable) => Err(Error::Unavailable(
                "database connection could not be established".to_string(),
            )),
        }
    }

    /// Validate and persist one record; `id` and timestamps are assigned here
    pub async fn insert(&self, input: &SentimentInput) -> Result<SentimentRecord> {
        let new = input.validate()?;
        let pool = self.pool()?;

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let result = sqlx::query(
            r#"
            INSERT INTO sentiment_analysis
                (text, predicted_class, confidence,
                 positive_prob, negative_prob, neutral_prob,
                 source, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.text)
        .bind(&new.predicted_class)
        .bind(new.confidence)
        .bind(new.probabilities.positive)
        .bind(new.probabilities.negative)
        .bind(new.probabilities.neutral)
        .bind(&new.source)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        let row: SentimentRow = sqlx::query_as(&format!("{SELECT_RECORDS} WHERE id = ?"))
            .bind(result.last_insert_rowid())
            .fetch_one(pool)
            .await?;

        Ok(row.into())
    }

    /// Every record, newest first
    pub async fn list_all(&self) -> Vec<SentimentRecord> {
        self.list(None).await
    }

    /// Up to `limit` records, newest first
    pub async fn list_recent(&self, limit: i64) -> Vec<SentimentRecord> {
        self.list(Some(limit.max(0))).await
    }

    async fn list(&self, limit: Option<i64>) -> Vec<SentimentRecord> {
        let Self::Connected(pool) = self else {
            return Vec::new();
        };

        // LIMIT -1 means unbounded in SQLite
        let rows = sqlx::query_as::<_, SentimentRow>(&format!(
            "{SELECT_RECORDS} ORDER BY created_at DESC, id DESC LIMIT ?"
        ))
        .bind(limit.unwrap_or(-1))
        .fetch_all(pool)
        .await;

        match rows {
            Ok(rows) => rows.into_iter().map(SentimentRecord::from).collect(),
            Err(e) => {
                warn!("Failed to list sentiment records: {}", e);
                Vec::new()
            }
        }
    }

    /// Row count and newest `created_at`; `(0, None)` when empty or unavailable
    ///
    /// Query failures are returned so the caller can report an `error` status.
    pub async fn count_and_last_updated(&self) -> Result<(i64, Option<DateTime<Utc>>)> {
        let Self::Connected(pool) = self else {
            return Ok((0, None));
        };

        let (count, last): (i64, Option<String>) =
            sqlx::query_as("SELECT COUNT(*), MAX(created_at) FROM sentiment_analysis")
                .fetch_one(pool)
                .await?;

        let last_updated = last
            .map(|ts| DateTime::parse_from_rfc3339(&ts).map(|dt| dt.with_timezone(&Utc)))
            .transpose()
            .map_err(|e| Error::Database(sqlx::Error::Decode(Box::new(e))))?;

        Ok((count, last_updated))
    }

    /// Per-label count and mean confidence, largest group first
    pub async fn class_aggregates(&self) -> Vec<ClassAggregate> {
        let Self::Connected(pool) = self else {
            return Vec::new();
        };

        let rows = sqlx::query_as::<_, ClassAggregate>(
            r#"
            SELECT predicted_class,
                   COUNT(*) AS count,
                   AVG(confidence) AS avg_confidence
            FROM sentiment_analysis
            GROUP BY predicted_class
            ORDER BY count DESC, predicted_class ASC
            "#,
        )
        .fetch_all(pool)
        .await;

        rows.unwrap_or_else(|e| {
            warn!("Failed to aggregate sentiment records: {}", e);
            Vec::new()
        })
    }

    /// Remove every record, returning how many were removed
    pub async fn delete_all(&self) -> Result<u64> {
        let pool = self.pool()?;
        let result = sqlx::query("DELETE FROM sentiment_analysis")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Close the pool, letting in-flight queries finish
    pub async fn close(&self) {
        if let Self::Connected(pool) = self {
            pool.close().await;
            info!("Database pool closed");
        }
    }
}
