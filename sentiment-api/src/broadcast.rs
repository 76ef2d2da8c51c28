//! Fan-out of aggregate updates to live subscribers
//!
//! Publishing never waits on subscribers: `send` only queues the event, and
//! each WebSocket connection drains its own receiver.

use sentiment_common::aggregate::DataSnapshot;
use sentiment_common::events::PushEvent;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::stats;
use crate::store::SentimentStore;

/// Events buffered per subscriber before a slow one starts skipping
pub const DEFAULT_CAPACITY: usize = 64;

/// Broadcaster manages subscriber registration and event distribution
#[derive(Clone)]
pub struct Broadcaster {
    tx: broadcast::Sender<PushEvent>,
}

impl Broadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        info!("Broadcaster initialized with capacity {}", capacity);
        Self { tx }
    }

    /// Receive events published from now on (no backlog)
    pub fn subscribe(&self) -> broadcast::Receiver<PushEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Queue an event for every current subscriber
    pub fn publish(&self, event: PushEvent) {
        let event_type = event.event_type();
        match self.tx.send(event) {
            Ok(count) => debug!("Broadcast {} to {} subscribers", event_type, count),
            Err(_) => debug!("No subscribers for {}", event_type),
        }
    }

    /// Recompute the aggregate view and push it as `dataUpdated`
    ///
    /// Returns the snapshot so the caller can reuse it in its own response.
    pub async fn publish_update(&self, store: &SentimentStore) -> DataSnapshot {
        let snapshot = stats::snapshot(store).await;
        self.publish(PushEvent::DataUpdated(snapshot.clone()));
        snapshot
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::UnavailableReason;
    use tokio::sync::broadcast::error::TryRecvError;

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let broadcaster = Broadcaster::new(4);
        broadcaster.publish(PushEvent::Pong);
        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_new_subscriber_gets_no_backlog() {
        let broadcaster = Broadcaster::new(4);
        let store = SentimentStore::Unavailable(UnavailableReason::NotConfigured);

        broadcaster.publish_update(&store).await;
        let mut rx = broadcaster.subscribe();
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        broadcaster.publish_update(&store).await;
        match rx.try_recv() {
            Ok(PushEvent::DataUpdated(snapshot)) => {
                assert_eq!(snapshot.database_info.total_entries, 0)
            }
            other => panic!("expected dataUpdated, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_update() {
        let broadcaster = Broadcaster::default();
        let store = SentimentStore::Unavailable(UnavailableReason::Unreachable);
        let mut a = broadcaster.subscribe();
        let mut b = broadcaster.subscribe();

        broadcaster.publish_update(&store).await;

        assert!(matches!(a.try_recv(), Ok(PushEvent::DataUpdated(_))));
        assert!(matches!(b.try_recv(), Ok(PushEvent::DataUpdated(_))));
    }
}
