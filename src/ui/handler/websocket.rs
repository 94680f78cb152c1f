//! WebSocket connection handler.
//!
//! Per-connection lifecycle: `Connecting → Open → Closed`. The handshake
//! (`Connecting`) is axum's upgrade; the broker only observes the entry into
//! `Open` (connect usecase) and the `Open → Closed` transition (disconnect
//! usecase), which runs exactly once per connection.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ValidationError},
    infrastructure::dto::{conversion::snapshot_to_event, websocket::ClientEvent},
    ui::state::AppState,
    usecase::SendMessageError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // No authentication: identity is the broker-assigned connection id,
    // valid only for the lifetime of this connection.
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains this connection's bounded outbound queue into
/// the WebSocket sink.
///
/// The queue is fed by the broadcast path (`WebSocketMessagePusher`). When
/// the pusher drops the sender (forced disconnect of a slow consumer) or the
/// disconnect usecase unregisters it, `recv()` returns `None` and the task
/// ends, which tears the connection down via the `select!` below.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Register the connection with a bounded outbound queue. The connect
    // usecase broadcasts the updated userCount to everyone (including this
    // client, whose queue is live from this point on).
    let (tx, rx) = mpsc::channel(state.send_queue_capacity);
    let connected = state.connect_client_usecase.execute(tx).await;
    let connection_id = connected.id.clone();

    // Deliver the full history snapshot to the newly connected client only.
    // This goes straight to the sink, before the pusher loop starts draining
    // the queue, so the client sees chatMessages before the queued userCount.
    let snapshot_frame = serde_json::to_string(&snapshot_to_event(connected.snapshot)).unwrap();
    if let Err(e) = sender.send(Message::Text(snapshot_frame.into())).await {
        tracing::error!(
            "Failed to send initial snapshot to '{}': {}",
            connection_id.as_str(),
            e
        );
        state.disconnect_client_usecase.execute(&connection_id).await;
        return;
    }
    tracing::info!(
        "Client '{}' connected (user count: {})",
        connection_id.as_str(),
        connected.user_count
    );

    // Task receiving frames from this client
    let recv_state = state.clone();
    let recv_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", recv_id.as_str(), e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_inbound_text(&recv_state, &recv_id, &text).await;
                }
                Message::Ping(_) => {
                    // Ping/pong is handled automatically by axum
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", recv_id.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    // Task draining the outbound queue into the socket
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other. Cancellation is
    // scoped to this connection only.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Exactly-once disconnect handling; idempotent against races with the
    // forced-disconnect path in the pusher.
    if state.disconnect_client_usecase.execute(&connection_id).await {
        tracing::info!("Client '{}' disconnected", connection_id.as_str());
    }
}

/// Handle one inbound text frame from a client.
///
/// Invalid input never reaches the store; all failures are recovered locally
/// and the client receives no structured error (the observed contract).
/// Returns true if the frame is a JSON object tagged with an `event` key,
/// i.e. it was meant as a protocol event rather than bare chat text.
fn is_event_frame(text: &str) -> bool {
    matches!(
        serde_json::from_str::<serde_json::Value>(text),
        Ok(serde_json::Value::Object(obj)) if obj.contains_key("event")
    )
}

async fn handle_inbound_text(state: &Arc<AppState>, sender_id: &ConnectionId, text: &str) {
    // Frames are tagged JSON; bare text is accepted as a plain chatMessage
    // for manual testing with basic WebSocket tools. A JSON object carrying
    // an `event` tag the broker does not support is protocol noise, not chat
    // text, and must not leak into the shared history.
    let body = match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::ChatMessage(body)) => body,
        Err(_) => {
            if is_event_frame(text) {
                tracing::warn!(
                    "Dropped unsupported event frame from '{}'",
                    sender_id.as_str()
                );
                return;
            }
            text.to_string()
        }
    };

    match state.send_message_usecase.execute(sender_id, &body).await {
        Ok(()) => {}
        Err(SendMessageError::Validation(ValidationError::Empty)) => {
            // Matches the client's own pre-send guard; drop silently
            tracing::debug!("Dropped empty message from '{}'", sender_id.as_str());
        }
        Err(SendMessageError::Validation(e)) => {
            tracing::warn!("Rejected message from '{}': {}", sender_id.as_str(), e);
        }
        Err(SendMessageError::UnknownConnection(_)) => {
            // Race with disconnect; not fatal
            tracing::warn!(
                "Dropped message from unregistered connection '{}'",
                sender_id.as_str()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::is_event_frame;

    #[test]
    fn test_is_event_frame_distinguishes_protocol_frames_from_bare_text() {
        assert!(is_event_frame(r#"{"event":"typing","payload":true}"#));
        assert!(is_event_frame(r#"{"event":"chatMessage","payload":123}"#));
        assert!(!is_event_frame("just some text"));
        assert!(!is_event_frame(r#"{"foo":1}"#));
        assert!(!is_event_frame("[1,2,3]"));
    }
}
