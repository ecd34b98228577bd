//! HTTP and WebSocket interface
//!
//! REST endpoints for status and one-shot execution, plus a `/ws` channel
//! speaking the [`protocol`] messages.

pub mod protocol;
mod rest;
mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use protocol::ServerMessage;
use std::sync::Arc;
use std::time::Instant;
use swarm_application::{EventSink, Orchestrator, OrchestratorError, SwarmEvent};
use swarm_domain::AggregatedArtifact;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

/// Messages from REST-triggered commands are mirrored to every socket.
const BROADCAST_CAPACITY: usize = 256;

/// Shared state behind every handler.
pub struct ServerState {
    orchestrator: Arc<Orchestrator>,
    started: Instant,
    broadcast: broadcast::Sender<ServerMessage>,
}

impl ServerState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        let (broadcast, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            orchestrator,
            started: Instant::now(),
            broadcast,
        }
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }

    fn workers_message(&self, content: &str) -> ServerMessage {
        ServerMessage::workers(
            content,
            &self.orchestrator.worker_statuses(),
            self.orchestrator.pool_summary(),
        )
    }
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(rest::health))
        .route("/workers", get(rest::workers))
        .route("/status", get(rest::status))
        .route("/subjects", get(rest::subjects))
        .route("/execute", post(rest::execute))
        .route("/ws", get(ws::websocket_handler))
        .with_state(state)
}

/// Bind `address` and serve until `shutdown` resolves.
pub async fn serve<S>(address: &str, state: Arc<ServerState>, shutdown: S) -> std::io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(address).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Result of one command run through [`run_command`].
pub struct CommandRun {
    pub task_id: Option<String>,
    pub result: Result<AggregatedArtifact, OrchestratorError>,
}

/// Run `command` and hand every progress event to `deliver` as a protocol
/// message, in order. The last message delivered is the terminal one.
pub async fn run_command<F>(orchestrator: &Orchestrator, command: &str, deliver: F) -> CommandRun
where
    F: FnMut(ServerMessage) + Send + 'static,
{
    let (sink, rx) = EventSink::channel();
    let forwarder = tokio::spawn(forward(rx, deliver));

    let result = orchestrator.handle(command, &sink).await;
    drop(sink);

    let task_id = match forwarder.await {
        Ok(task_id) => task_id,
        Err(e) => {
            warn!("Event forwarder stopped: {}", e);
            None
        }
    };
    CommandRun { task_id, result }
}

async fn forward<F>(mut rx: mpsc::UnboundedReceiver<SwarmEvent>, mut deliver: F) -> Option<String>
where
    F: FnMut(ServerMessage),
{
    let mut task_id = None;
    while let Some(event) = rx.recv().await {
        if let SwarmEvent::CommandReceived { task_id: id, .. } = &event {
            task_id = Some(id.clone());
        }
        deliver(ServerMessage::from_event(&event, task_id.as_deref()));
        if event.is_terminal() {
            break;
        }
    }
    task_id
}
