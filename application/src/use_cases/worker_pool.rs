//! Worker Pool use case
//!
//! A fixed registry of workers, each pairing one [`AgentLoop`] with the
//! gateway it drives. `execute_parallel` assigns pair *i* to worker *i*, runs
//! every assignment concurrently and returns outcomes in input order.
//!
//! Worker state lives in a [`StatusTable`] that only this module mutates,
//! through the `mark_*` transition functions. Readers get snapshots.

use crate::config::ExecutionParams;
use crate::ports::events::{EventSink, SwarmEvent};
use crate::ports::reasoning_backend::ReasoningBackend;
use crate::ports::tool_gateway::ToolGateway;
use crate::use_cases::agent_loop::AgentLoop;
use futures::FutureExt;
use futures::future::join_all;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, RwLock};
use std::time::Instant;
use swarm_domain::{ErrorKind, PoolSummary, TaskOutcome, WorkerId, WorkerState, WorkerStatus};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, warn};

/// Errors that reject a whole batch before anything is dispatched
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PoolError {
    #[error("{requested} subjects requested but the pool has {capacity} workers")]
    TooManySubjectsForPoolSize { requested: usize, capacity: usize },

    #[error("Worker pool is shutting down")]
    ShuttingDown,
}

/// Worker status records, in registry order.
///
/// Each transition replaces a whole record under the write lock, so a reader
/// never sees a half-updated status.
#[derive(Debug, Default)]
pub struct StatusTable {
    order: Vec<WorkerId>,
    records: RwLock<HashMap<WorkerId, WorkerStatus>>,
}

impl StatusTable {
    fn new(workers: impl IntoIterator<Item = (WorkerId, String)>) -> Self {
        let mut order = Vec::new();
        let mut records = HashMap::new();
        for (id, endpoint) in workers {
            order.push(id.clone());
            records.insert(id.clone(), WorkerStatus::new(id, endpoint));
        }
        Self {
            order,
            records: RwLock::new(records),
        }
    }

    /// Copy of every status, in registry order.
    pub fn snapshot(&self) -> Vec<WorkerStatus> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        self.order
            .iter()
            .filter_map(|id| records.get(id).cloned())
            .collect()
    }

    /// Apply `update` to one record and report the new state.
    fn transition(&self, id: &WorkerId, events: &EventSink, update: impl FnOnce(&mut WorkerStatus)) {
        let event = {
            let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
            let Some(record) = records.get_mut(id) else {
                return;
            };
            let mut next = record.clone();
            update(&mut next);
            *record = next;
            SwarmEvent::WorkerTransition {
                worker_id: id.clone(),
                state: record.state,
                subject: record.assigned_subject.clone(),
            }
        };
        events.emit(event);
    }

    fn mark_idle(&self, id: &WorkerId, events: &EventSink) {
        self.transition(id, events, |s| {
            s.transition(WorkerState::Idle);
            s.assigned_subject = None;
        });
    }

    fn mark_starting(&self, id: &WorkerId, reason: Option<String>, events: &EventSink) {
        self.transition(id, events, |s| {
            s.transition(WorkerState::Starting);
            s.last_error = reason;
        });
    }

    fn mark_running(&self, id: &WorkerId, subject: &str, events: &EventSink) {
        self.transition(id, events, |s| {
            s.transition(WorkerState::Running);
            s.assigned_subject = Some(subject.to_string());
        });
    }

    /// Record a finished execution: `Idle` on success, `Error` otherwise.
    /// A worker already `Stopping` stays `Stopping`.
    fn mark_finished(&self, id: &WorkerId, outcome: &TaskOutcome, events: &EventSink) {
        self.transition(id, events, |s| {
            if outcome.success {
                s.completed_tasks += 1;
            } else {
                s.failed_tasks += 1;
                s.last_error = outcome.error_message.clone();
            }
            if s.state == WorkerState::Stopping {
                return;
            }
            s.assigned_subject = None;
            s.transition(if outcome.success {
                WorkerState::Idle
            } else {
                WorkerState::Error
            });
        });
    }

    fn mark_stopping(&self, id: &WorkerId, events: &EventSink) {
        self.transition(id, events, |s| s.transition(WorkerState::Stopping));
    }
}

struct WorkerSlot {
    id: WorkerId,
    gateway: Arc<dyn ToolGateway>,
    agent: Arc<Mutex<AgentLoop>>,
}

/// Fixed-size set of workers.
pub struct WorkerPool {
    slots: Vec<WorkerSlot>,
    status: Arc<StatusTable>,
    params: ExecutionParams,
    shutdown: CancellationToken,
}

impl WorkerPool {
    /// Build the registry from explicit `(id, gateway)` pairs. Every worker
    /// shares the reasoning backend but owns its gateway and context.
    pub fn new(
        workers: Vec<(WorkerId, Arc<dyn ToolGateway>)>,
        backend: Arc<dyn ReasoningBackend>,
        params: ExecutionParams,
    ) -> Self {
        let status = Arc::new(StatusTable::new(
            workers
                .iter()
                .map(|(id, gw)| (id.clone(), gw.endpoint().to_string())),
        ));

        let slots = workers
            .into_iter()
            .map(|(id, gateway)| WorkerSlot {
                agent: Arc::new(Mutex::new(AgentLoop::new(
                    id.clone(),
                    Arc::clone(&gateway),
                    Arc::clone(&backend),
                    params.clone(),
                ))),
                id,
                gateway,
            })
            .collect();

        Self {
            slots,
            status,
            params,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn statuses(&self) -> Vec<WorkerStatus> {
        self.status.snapshot()
    }

    pub fn summary(&self) -> PoolSummary {
        PoolSummary::from_statuses(&self.status.snapshot())
    }

    /// Connect every gateway concurrently and record its health:
    /// reachable workers become `Idle`, the rest stay `Starting`.
    pub async fn initialize(&self, events: &EventSink) -> PoolSummary {
        let probes = self.slots.iter().map(|slot| async move {
            let connected = slot.gateway.connect().await;
            let healthy = connected.is_ok() && slot.gateway.health().await;
            (slot, connected.err(), healthy)
        });

        for (slot, error, healthy) in join_all(probes).await {
            if healthy {
                info!(worker = %slot.id, endpoint = slot.gateway.endpoint(), "Worker ready");
                self.status.mark_idle(&slot.id, events);
            } else {
                let reason = error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "health check failed".to_string());
                warn!(worker = %slot.id, endpoint = slot.gateway.endpoint(), "Worker not ready: {}", reason);
                self.status.mark_starting(&slot.id, Some(reason), events);
            }
        }

        self.summary()
    }

    /// Run `pairs[i]` on worker `i`, all concurrently. Output order equals
    /// input order.
    ///
    /// Rejects the whole batch, touching nothing, when it is larger than the
    /// pool or the pool is shutting down.
    pub async fn execute_parallel(
        &self,
        pairs: Vec<(String, String)>,
        events: &EventSink,
    ) -> Result<Vec<TaskOutcome>, PoolError> {
        if self.shutdown.is_cancelled() {
            return Err(PoolError::ShuttingDown);
        }
        if pairs.len() > self.slots.len() {
            return Err(PoolError::TooManySubjectsForPoolSize {
                requested: pairs.len(),
                capacity: self.slots.len(),
            });
        }

        let subjects: Vec<String> = pairs.iter().map(|(s, _)| s.clone()).collect();
        for (slot, subject) in self.slots.iter().zip(&subjects) {
            self.status.mark_running(&slot.id, subject, events);
        }

        info!("Dispatching {} subjects", pairs.len());
        let mut join_set = JoinSet::new();

        for (index, ((subject, prompt), slot)) in pairs.into_iter().zip(&self.slots).enumerate() {
            let agent = Arc::clone(&slot.agent);
            let worker_id = slot.id.clone();
            let timeout = self.params.task_timeout;
            let cancel = self.shutdown.child_token();
            let events = events.clone();
            let span = info_span!("execution", worker = %worker_id, subject = %subject);

            let execution = async move {
                let started = Instant::now();
                let mut agent = agent.lock_owned().await;

                let run = AssertUnwindSafe(agent.run(&subject, &prompt, &events)).catch_unwind();
                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    result = tokio::time::timeout(timeout, run) => Some(result),
                };

                let outcome = match result {
                    Some(Ok(Ok(outcome))) => outcome,
                    Some(Ok(Err(_panic))) => TaskOutcome::failure(
                        &subject,
                        ErrorKind::WorkerPanicked,
                        "agent loop panicked",
                    ),
                    Some(Err(_elapsed)) => TaskOutcome::failure(
                        &subject,
                        ErrorKind::Timeout,
                        format!("No result within {}s", timeout.as_secs_f64()),
                    ),
                    None => TaskOutcome::failure(&subject, ErrorKind::Cancelled, "Pool shut down"),
                };

                (
                    index,
                    outcome
                        .with_worker(worker_id)
                        .with_elapsed(started.elapsed()),
                )
            };
            join_set.spawn(execution.instrument(span));
        }

        let mut results: Vec<Option<TaskOutcome>> = vec![None; subjects.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    self.status.mark_finished(&self.slots[index].id, &outcome, events);
                    results[index] = Some(outcome);
                }
                Err(e) => {
                    warn!("Worker task join error: {}", e);
                }
            }
        }

        // Any slot still empty lost its task to a join error.
        let outcomes = results
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| {
                outcome.unwrap_or_else(|| {
                    let outcome = TaskOutcome::failure(
                        &subjects[index],
                        ErrorKind::WorkerPanicked,
                        "worker task aborted",
                    )
                    .with_worker(self.slots[index].id.clone());
                    self.status.mark_finished(&self.slots[index].id, &outcome, events);
                    outcome
                })
            })
            .collect();

        Ok(outcomes)
    }

    /// Cancel in-flight executions and mark every worker `Stopping`.
    pub fn shutdown(&self, events: &EventSink) {
        info!("Shutting down worker pool");
        self.shutdown.cancel();
        for slot in &self.slots {
            self.status.mark_stopping(&slot.id, events);
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::reasoning_backend::ReasoningError;
    use crate::use_cases::agent_loop::tests::{MockGateway, ScriptedBackend};
    use async_trait::async_trait;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use swarm_domain::ConversationContext;

    const ANSWER: &str = r#"{"type": "message", "text": "done: $10"}"#;

    fn pool_with(
        gateways: Vec<Arc<MockGateway>>,
        backend: Arc<dyn ReasoningBackend>,
        params: ExecutionParams,
    ) -> WorkerPool {
        let workers = gateways
            .into_iter()
            .enumerate()
            .map(|(i, gw)| (WorkerId::new(format!("agent-{}", i + 1)), gw as Arc<dyn ToolGateway>))
            .collect();
        WorkerPool::new(workers, backend, params)
    }

    fn pool(size: usize, backend: Arc<dyn ReasoningBackend>) -> WorkerPool {
        pool_with(
            (0..size).map(|_| Arc::new(MockGateway::new())).collect(),
            backend,
            ExecutionParams::default(),
        )
    }

    fn pairs(subjects: &[&str]) -> Vec<(String, String)> {
        subjects
            .iter()
            .map(|s| (s.to_string(), format!("research {}", s)))
            .collect()
    }

    /// Answers with the subject named in the prompt after a per-subject delay.
    struct EchoBackend {
        delays: HashMap<String, Duration>,
    }

    #[async_trait]
    impl ReasoningBackend for EchoBackend {
        async fn decide(&self, context: &ConversationContext) -> Result<String, ReasoningError> {
            let prompt = context.turns()[0].content.clone();
            let subject = prompt.trim_start_matches("research ").to_string();
            if let Some(delay) = self.delays.get(&subject) {
                tokio::time::sleep(*delay).await;
            }
            if subject == "panic" {
                panic!("backend exploded");
            }
            Ok(format!(r#"{{"type": "message", "text": "{}: ok"}}"#, subject))
        }

        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, ReasoningError> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn test_outcomes_follow_input_order() {
        let backend = Arc::new(EchoBackend {
            delays: HashMap::from([
                ("A".to_string(), Duration::from_millis(60)),
                ("B".to_string(), Duration::from_millis(5)),
                ("C".to_string(), Duration::from_millis(30)),
            ]),
        });
        let pool = pool(3, backend);

        let outcomes = pool
            .execute_parallel(pairs(&["A", "B", "C"]), &EventSink::none())
            .await
            .unwrap();

        let subjects: Vec<_> = outcomes.iter().map(|o| o.subject.as_str()).collect();
        assert_eq!(subjects, vec!["A", "B", "C"]);
        assert_eq!(outcomes[0].result_text.as_deref(), Some("A: ok"));
        assert_eq!(outcomes[2].worker_id, Some(WorkerId::new("agent-3")));
    }

    #[tokio::test]
    async fn test_fewer_pairs_than_workers() {
        let pool = pool(4, Arc::new(ScriptedBackend::always(ANSWER)));

        let outcomes = pool
            .execute_parallel(pairs(&["A", "B"]), &EventSink::none())
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        let statuses = pool.statuses();
        assert_eq!(statuses[0].state, WorkerState::Idle);
        assert_eq!(statuses[1].state, WorkerState::Idle);
        // Untouched workers keep their initial state.
        assert_eq!(statuses[2].state, WorkerState::Starting);
    }

    #[tokio::test]
    async fn test_too_many_subjects_is_rejected_without_side_effects() {
        let backend = Arc::new(ScriptedBackend::always(ANSWER));
        let pool = pool(2, backend.clone());
        let before = pool.statuses();
        let (events, mut rx) = EventSink::channel();

        let err = pool
            .execute_parallel(pairs(&["A", "B", "C"]), &events)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PoolError::TooManySubjectsForPoolSize {
                requested: 3,
                capacity: 2
            }
        );
        assert_eq!(backend.decide_calls.load(Ordering::SeqCst), 0);
        assert_eq!(pool.statuses(), before);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_timeout_does_not_block_siblings() {
        let backend = Arc::new(EchoBackend {
            delays: HashMap::from([("slow".to_string(), Duration::from_secs(30))]),
        });
        let gateways = (0..2).map(|_| Arc::new(MockGateway::new())).collect();
        let pool = pool_with(
            gateways,
            backend,
            ExecutionParams::default().with_task_timeout(Duration::from_millis(100)),
        );

        let started = Instant::now();
        let outcomes = pool
            .execute_parallel(pairs(&["slow", "fast"]), &EventSink::none())
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(outcomes[0].error_kind, Some(ErrorKind::Timeout));
        assert!(outcomes[1].success);
        assert_eq!(pool.statuses()[0].state, WorkerState::Error);
        assert_eq!(pool.statuses()[1].state, WorkerState::Idle);
    }

    #[tokio::test]
    async fn test_panic_becomes_failed_outcome() {
        let backend = Arc::new(EchoBackend {
            delays: HashMap::new(),
        });
        let pool = pool(2, backend);

        let outcomes = pool
            .execute_parallel(pairs(&["panic", "B"]), &EventSink::none())
            .await
            .unwrap();

        assert_eq!(outcomes[0].error_kind, Some(ErrorKind::WorkerPanicked));
        assert!(outcomes[1].success);
        assert_eq!(pool.statuses()[0].state, WorkerState::Error);
    }

    #[tokio::test]
    async fn test_status_visible_while_running() {
        let backend = Arc::new(EchoBackend {
            delays: HashMap::from([("A".to_string(), Duration::from_millis(200))]),
        });
        let pool = Arc::new(pool(1, backend));

        let runner = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.execute_parallel(pairs(&["A"]), &EventSink::none()).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        let status = &pool.statuses()[0];
        assert_eq!(status.state, WorkerState::Running);
        assert_eq!(status.assigned_subject.as_deref(), Some("A"));

        runner.await.unwrap().unwrap();
        let status = &pool.statuses()[0];
        assert_eq!(status.state, WorkerState::Idle);
        assert_eq!(status.completed_tasks, 1);
    }

    #[tokio::test]
    async fn test_transitions_are_emitted() {
        let pool = pool(1, Arc::new(ScriptedBackend::always(ANSWER)));
        let (events, mut rx) = EventSink::channel();

        pool.execute_parallel(pairs(&["A"]), &events).await.unwrap();
        drop(events);

        let mut states = Vec::new();
        while let Some(event) = rx.recv().await {
            if let SwarmEvent::WorkerTransition { state, .. } = event {
                states.push(state);
            }
        }
        assert_eq!(states, vec![WorkerState::Running, WorkerState::Idle]);
    }

    #[tokio::test]
    async fn test_initialize_marks_health() {
        let gateways = vec![Arc::new(MockGateway::new()), Arc::new(MockGateway::unhealthy())];
        let pool = pool_with(
            gateways,
            Arc::new(ScriptedBackend::always(ANSWER)),
            ExecutionParams::default(),
        );

        let summary = pool.initialize(&EventSink::none()).await;

        assert_eq!(summary.total, 2);
        assert_eq!(summary.idle, 1);
        assert_eq!(summary.starting, 1);
        assert_eq!(
            pool.statuses()[1].last_error.as_deref(),
            Some("health check failed")
        );
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_work() {
        let pool = pool(2, Arc::new(ScriptedBackend::always(ANSWER)));

        pool.shutdown(&EventSink::none());

        assert!(pool.is_shutting_down());
        assert_eq!(pool.summary().stopping, 2);
        let err = pool
            .execute_parallel(pairs(&["A"]), &EventSink::none())
            .await
            .unwrap_err();
        assert_eq!(err, PoolError::ShuttingDown);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_in_flight() {
        let backend = Arc::new(EchoBackend {
            delays: HashMap::from([("A".to_string(), Duration::from_secs(30))]),
        });
        let pool = Arc::new(pool(1, backend));

        let runner = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.execute_parallel(pairs(&["A"]), &EventSink::none()).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        pool.shutdown(&EventSink::none());

        let outcomes = runner.await.unwrap().unwrap();
        assert_eq!(outcomes[0].error_kind, Some(ErrorKind::Cancelled));
        assert_eq!(pool.statuses()[0].state, WorkerState::Stopping);
    }
}
