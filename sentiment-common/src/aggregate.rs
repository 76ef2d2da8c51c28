//! Derived aggregate view types
//!
//! None of these are persisted; they are recomputed from the table on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::SentimentRecord;

/// Per-label summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStats {
    pub predicted_class: String,
    pub count: i64,
    /// Mean confidence rounded to 4 decimals
    pub avg_confidence: f64,
    /// Share of all records, rounded to 2 decimals
    pub percentage: f64,
}

/// Display-oriented projection of one `ClassStats` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartEntry {
    pub name: String,
    pub value: f64,
    pub count: i64,
    pub avg_confidence: f64,
    pub color: String,
}

/// Store availability as reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Error,
    FallbackMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub total_entries: i64,
    pub last_updated: Option<DateTime<Utc>>,
    pub database_type: String,
    pub connection_status: ConnectionStatus,
}

/// Full aggregate view, served by the stats endpoint and pushed after mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSnapshot {
    pub statistics: Vec<ClassStats>,
    pub chart_data: Vec<ChartEntry>,
    pub recent_entries: Vec<SentimentRecord>,
    pub database_info: DatabaseInfo,
}
