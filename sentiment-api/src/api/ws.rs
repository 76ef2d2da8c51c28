//! WebSocket push channel
//!
//! Each connection subscribes to the broadcaster and forwards events from
//! its own task. Nothing is replayed on connect; a lagging connection skips
//! what it missed.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use sentiment_common::events::PushEvent;
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::{debug, error, warn};

use crate::broadcast::Broadcaster;
use crate::AppState;

/// Client → server message; only `ping` is understood
#[derive(Debug, Deserialize)]
struct ClientMessage {
    #[serde(rename = "type")]
    msg_type: String,
}

/// GET /ws
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let broadcaster = state.broadcaster.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster))
}

async fn handle_socket(socket: WebSocket, broadcaster: Broadcaster) {
    let updates = broadcaster.subscribe();
    debug!(
        "WebSocket connected, {} subscribers",
        broadcaster.subscriber_count()
    );

    let (ws_sink, ws_stream) = socket.split();
    let (reply_tx, reply_rx) = mpsc::channel(8);

    let greeting = PushEvent::Connected {
        server_version: format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("GIT_HASH")),
    };
    let outgoing = tokio::spawn(forward_outgoing(ws_sink, updates, reply_rx, greeting));

    process_incoming(ws_stream, reply_tx).await;

    outgoing.abort();
    debug!("WebSocket disconnected");
}

/// Write the greeting, then broadcast events and direct replies, until the socket fails
async fn forward_outgoing(
    mut ws_sink: SplitSink<WebSocket, Message>,
    updates: broadcast::Receiver<PushEvent>,
    mut replies: mpsc::Receiver<PushEvent>,
    greeting: PushEvent,
) {
    if send_event(&mut ws_sink, &greeting).await.is_err() {
        return;
    }

    let mut updates = BroadcastStream::new(updates);
    loop {
        let event = tokio::select! {
            Some(update) = updates.next() => match update {
                Ok(event) => event,
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!("WebSocket subscriber lagged, skipped {} events", skipped);
                    continue;
                }
            },
            Some(reply) = replies.recv() => reply,
            else => break,
        };

        if send_event(&mut ws_sink, &event).await.is_err() {
            break;
        }
    }
}

async fn send_event(
    ws_sink: &mut SplitSink<WebSocket, Message>,
    event: &PushEvent,
) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(json) => ws_sink.send(Message::Text(json)).await,
        Err(e) => {
            error!("Failed to serialize {} event: {}", event.event_type(), e);
            Ok(())
        }
    }
}

async fn process_incoming(mut ws_stream: SplitStream<WebSocket>, replies: mpsc::Sender<PushEvent>) {
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if is_ping(&text) && replies.send(PushEvent::Pong).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("WebSocket receive error: {}", e);
                break;
            }
        }
    }
}

fn is_ping(text: &str) -> bool {
    text.trim() == "ping"
        || serde_json::from_str::<ClientMessage>(text)
            .map(|msg| msg.msg_type == "ping")
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_detection() {
        assert!(is_ping("ping"));
        assert!(is_ping(r#"{"type":"ping"}"#));
        assert!(!is_ping(r#"{"type":"subscribe"}"#));
        assert!(!is_ping("hello"));
    }
}
