//! WebSocket channel

use super::protocol::{ClientMessage, ServerMessage};
use super::{ServerState, run_command};
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tracing::{debug, info, warn};

pub(super) async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn send(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), axum::Error> {
    socket.send(Message::Text(message.to_json())).await
}

async fn handle_socket(mut socket: WebSocket, state: Arc<ServerState>) {
    info!("WebSocket client connected");

    let greeting = state.workers_message("Connected to orchestrator");
    if send(&mut socket, &greeting).await.is_err() {
        return;
    }

    // Replies to this client's own commands.
    let (outbound, mut replies) = mpsc::unbounded_channel::<ServerMessage>();
    let mut broadcasts = state.broadcast.subscribe();

    loop {
        tokio::select! {
            Some(message) = replies.recv() => {
                if send(&mut socket, &message).await.is_err() {
                    break;
                }
            }
            mirrored = broadcasts.recv() => match mirrored {
                Ok(message) => {
                    if send(&mut socket, &message).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("WebSocket client lagging, skipped {} messages", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if let Some(reply) = handle_text(&state, &text, &outbound)
                        && send(&mut socket, &reply).await.is_err()
                    {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!("Client closed the connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("WebSocket receive failed: {}", e);
                    break;
                }
            }
        }
    }

    info!("WebSocket connection closed");
}

/// Handle one text frame. Returns the immediate reply, if any; command
/// progress arrives later through `outbound`.
fn handle_text(
    state: &Arc<ServerState>,
    text: &str,
    outbound: &mpsc::UnboundedSender<ServerMessage>,
) -> Option<ServerMessage> {
    match ClientMessage::parse(text) {
        None => Some(ServerMessage::invalid_json()),
        Some(ClientMessage::Status) => Some(state.workers_message("Current status")),
        Some(ClientMessage::Unsupported) => Some(ServerMessage::error("Unsupported message type")),
        Some(ClientMessage::Message { content }) => {
            // Run in the background so status queries stay answerable.
            let orchestrator = Arc::clone(&state.orchestrator);
            let outbound = outbound.clone();
            tokio::spawn(async move {
                run_command(&orchestrator, &content, move |message| {
                    // Client gone; the command still finishes.
                    let _ = outbound.send(message);
                })
                .await;
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::protocol::MessageType;
    use crate::server::tests::test_state;

    #[tokio::test]
    async fn test_invalid_json_gets_error_reply() {
        let state = test_state();
        let (tx, _rx) = mpsc::unbounded_channel();
        let reply = handle_text(&state, "{not json", &tx).unwrap();
        assert_eq!(reply.kind, MessageType::Error);
        assert_eq!(reply.content, "Invalid JSON message");
    }

    #[tokio::test]
    async fn test_status_query_returns_worker_table() {
        let state = test_state();
        let (tx, _rx) = mpsc::unbounded_channel();
        let reply = handle_text(&state, r#"{"type":"status"}"#, &tx).unwrap();
        assert_eq!(reply.kind, MessageType::Status);
        assert_eq!(reply.content, "Current status");
        let data = reply.data.unwrap();
        assert_eq!(data["workers"].as_array().unwrap().len(), 2);
        assert_eq!(data["workers"][0]["worker_id"], "agent-1");
    }

    #[tokio::test]
    async fn test_command_streams_status_then_response() {
        let state = test_state();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let reply = handle_text(
            &state,
            r#"{"type":"message","content":"look up 1 company"}"#,
            &tx,
        );
        assert!(reply.is_none());

        let mut received = Vec::new();
        while let Some(message) = rx.recv().await {
            let done = message.is_terminal();
            received.push(message);
            if done {
                break;
            }
        }
        assert_eq!(received[0].kind, MessageType::Status);
        assert_eq!(received.last().unwrap().kind, MessageType::Response);
        assert_eq!(received.iter().filter(|m| m.is_terminal()).count(), 1);
    }
}
