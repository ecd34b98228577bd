//! Progress events
//!
//! The orchestrator and worker pool report progress through an
//! [`EventSink`], an ordered channel rather than callbacks. The presentation
//! layer drains the receiving end (console progress bars, WebSocket status
//! messages) at its own pace.

use serde::Serialize;
use swarm_domain::{AggregatedArtifact, WorkerId, WorkerState};
use tokio::sync::mpsc;

/// One progress event. For a given command, exactly one of
/// [`SwarmEvent::Completed`] / [`SwarmEvent::Failed`] is emitted, last.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SwarmEvent {
    CommandReceived {
        task_id: String,
        command: String,
    },
    Dispatching {
        task_id: String,
        count: usize,
        subjects: Vec<String>,
    },
    WorkerTransition {
        worker_id: WorkerId,
        state: WorkerState,
        subject: Option<String>,
    },
    AgentStep {
        worker_id: WorkerId,
        subject: String,
        iteration: usize,
        tool: String,
    },
    Aggregating {
        task_id: String,
        succeeded: usize,
        failed: usize,
    },
    Completed {
        task_id: String,
        artifact: Box<AggregatedArtifact>,
    },
    Failed {
        task_id: String,
        message: String,
    },
}

impl SwarmEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SwarmEvent::Completed { .. } | SwarmEvent::Failed { .. })
    }

    /// One-line human-readable description, used for status messages.
    pub fn describe(&self) -> String {
        match self {
            SwarmEvent::CommandReceived { command, .. } => format!("Processing: {}", command),
            SwarmEvent::Dispatching {
                count, subjects, ..
            } => format!("Dispatching {} agents: {}", count, subjects.join(", ")),
            SwarmEvent::WorkerTransition {
                worker_id,
                state,
                subject,
            } => match subject {
                Some(subject) => format!("{} {} is {} ({})", state.emoji(), worker_id, state, subject),
                None => format!("{} {} is {}", state.emoji(), worker_id, state),
            },
            SwarmEvent::AgentStep {
                worker_id,
                subject,
                iteration,
                tool,
            } => format!("{} [{}] step {}: {}", worker_id, subject, iteration, tool),
            SwarmEvent::Aggregating {
                succeeded, failed, ..
            } => format!(
                "Aggregating results ({} succeeded, {} failed)",
                succeeded, failed
            ),
            SwarmEvent::Completed { artifact, .. } => format!(
                "Completed: {}/{} successful",
                artifact.succeeded_count,
                artifact.total()
            ),
            SwarmEvent::Failed { message, .. } => format!("Failed: {}", message),
        }
    }
}

/// Sending half of the event channel. Cloneable; a sink without a channel
/// drops every event.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<mpsc::UnboundedSender<SwarmEvent>>,
}

impl EventSink {
    /// Sink that discards events.
    pub fn none() -> Self {
        Self { sender: None }
    }

    /// New sink plus the receiver that observes its events in order.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SwarmEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { sender: Some(tx) }, rx)
    }

    pub fn emit(&self, event: SwarmEvent) {
        if let Some(sender) = &self.sender {
            // Receiver gone means nobody is listening any more; not an error.
            let _ = sender.send(event);
        }
    }
}
