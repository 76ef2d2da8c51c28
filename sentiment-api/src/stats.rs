//! Aggregation over the stored records
//!
//! Pure derivations from `SentimentStore` reads; nothing here writes.

use sentiment_common::aggregate::{
    ChartEntry, ClassStats, ConnectionStatus, DataSnapshot, DatabaseInfo,
};
use sentiment_common::labels::{capitalize, color_for};
use tracing::error;

use crate::store::{ClassAggregate, SentimentStore};

/// Backend tag reported in `DatabaseInfo`
pub const DATABASE_TYPE: &str = "SQLite";

/// Number of records carried in a snapshot
pub const SNAPSHOT_RECENT_LIMIT: i64 = 5;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Turn raw group rows into rounded per-label statistics, largest first
pub fn stats_from_aggregates(groups: &[ClassAggregate]) -> Vec<ClassStats> {
    let total: i64 = groups.iter().map(|g| g.count).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut stats: Vec<ClassStats> = groups
        .iter()
        .map(|g| ClassStats {
            predicted_class: g.predicted_class.clone(),
            count: g.count,
            avg_confidence: round_to(g.avg_confidence, 4),
            percentage: round_to(g.count as f64 * 100.0 / total as f64, 2),
        })
        .collect();

    // stable: equal counts keep query order
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// Display projection of the statistics
pub fn chart_from_stats(stats: &[ClassStats]) -> Vec<ChartEntry> {
    stats
        .iter()
        .map(|s| ChartEntry {
            name: capitalize(&s.predicted_class),
            value: s.percentage,
            count: s.count,
            avg_confidence: s.avg_confidence,
            color: color_for(&s.predicted_class).to_string(),
        })
        .collect()
}

pub async fn statistics(store: &SentimentStore) -> Vec<ClassStats> {
    stats_from_aggregates(&store.class_aggregates().await)
}

pub async fn chart_data(store: &SentimentStore) -> Vec<ChartEntry> {
    chart_from_stats(&statistics(store).await)
}

/// Row count, last insert time and connection state
pub async fn database_info(store: &SentimentStore) -> DatabaseInfo {
    match store.count_and_last_updated().await {
        Ok((total_entries, last_updated)) => DatabaseInfo {
            total_entries,
            last_updated,
            database_type: DATABASE_TYPE.to_string(),
            connection_status: store.connection_status(),
        },
        Err(e) => {
            error!("Failed to read database info: {}", e);
            DatabaseInfo {
                total_entries: 0,
                last_updated: None,
                database_type: DATABASE_TYPE.to_string(),
                connection_status: ConnectionStatus::Error,
            }
        }
    }
}

/// Statistics, chart data, recent records and database info, queried concurrently
pub async fn snapshot(store: &SentimentStore) -> DataSnapshot {
    let (statistics, recent_entries, database_info) = tokio::join!(
        statistics(store),
        store.list_recent(SNAPSHOT_RECENT_LIMIT),
        database_info(store),
    );

    DataSnapshot {
        chart_data: chart_from_stats(&statistics),
        statistics,
        recent_entries,
        database_info,
    }
}
