//! Events pushed to live subscribers over the WebSocket channel
//!
//! Wire format is `{"type": "...", "payload": ...}`.

use serde::{Deserialize, Serialize};

use crate::aggregate::DataSnapshot;

/// Server → client message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum PushEvent {
    /// Sent once, right after a subscriber connects
    #[serde(rename = "connected")]
    Connected { server_version: String },

    /// Aggregate view after an insert or clear-all
    #[serde(rename = "dataUpdated")]
    DataUpdated(DataSnapshot),

    /// Reply to a client `ping`
    #[serde(rename = "pong")]
    Pong,
}

impl PushEvent {
    /// Event name carried in the `type` field
    pub fn event_type(&self) -> &'static str {
        match self {
            PushEvent::Connected { .. } => "connected",
            PushEvent::DataUpdated(_) => "dataUpdated",
            PushEvent::Pong => "pong",
        }
    }
}
