//! Progress display driven by swarm events

pub mod reporter;

use std::sync::Arc;
use swarm_application::SwarmEvent;
use tokio::sync::mpsc::UnboundedReceiver;

/// Something that renders progress events as they arrive.
pub trait ProgressObserver: Send + Sync {
    fn observe(&self, event: &SwarmEvent);
}

/// Feed events from `rx` to `observer` up to and including the command's
/// terminal event.
pub async fn follow(mut rx: UnboundedReceiver<SwarmEvent>, observer: Arc<dyn ProgressObserver>) {
    while let Some(event) = rx.recv().await {
        observer.observe(&event);
        if event.is_terminal() {
            break;
        }
    }
}
