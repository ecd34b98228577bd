//! Orchestrator use case
//!
//! Façade over the whole pipeline: interpret → dispatch → aggregate. Every
//! command gets a short task id and emits, in order, `CommandReceived`,
//! `Dispatching`, worker transitions, `Aggregating`, then exactly one of
//! `Completed` / `Failed`.

use crate::ports::events::{EventSink, SwarmEvent};
use crate::use_cases::aggregate_results::ResultAggregator;
use crate::use_cases::interpret_command::{CommandInterpreter, InterpretError};
use crate::use_cases::worker_pool::{PoolError, WorkerPool};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use swarm_domain::{AggregatedArtifact, PoolSummary, SubjectCatalog, WorkerStatus};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{Instrument, error, info, info_span};

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error(transparent)]
    Interpret(#[from] InterpretError),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

pub struct Orchestrator {
    interpreter: CommandInterpreter,
    pool: Arc<WorkerPool>,
    aggregator: ResultAggregator,
    /// Commands on one orchestrator run one at a time.
    gate: Mutex<()>,
    commands: AtomicU64,
}

impl Orchestrator {
    pub fn new(
        interpreter: CommandInterpreter,
        pool: Arc<WorkerPool>,
        aggregator: ResultAggregator,
    ) -> Self {
        Self {
            interpreter,
            pool,
            aggregator,
            gate: Mutex::new(()),
            commands: AtomicU64::new(0),
        }
    }

    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    pub fn worker_statuses(&self) -> Vec<WorkerStatus> {
        self.pool.statuses()
    }

    pub fn pool_summary(&self) -> PoolSummary {
        self.pool.summary()
    }

    pub fn catalog(&self) -> &SubjectCatalog {
        self.interpreter.catalog()
    }

    /// Run one command end to end.
    ///
    /// Waits for any command already in flight on this orchestrator.
    pub async fn handle(
        &self,
        command: &str,
        events: &EventSink,
    ) -> Result<AggregatedArtifact, OrchestratorError> {
        let _turn = self.gate.lock().await;
        let task_id = format!("cmd-{}", self.commands.fetch_add(1, Ordering::SeqCst) + 1);
        let span = info_span!("command", task_id = %task_id);

        let result = self
            .run(&task_id, command, events)
            .instrument(span)
            .await;

        match &result {
            Ok(artifact) => events.emit(SwarmEvent::Completed {
                task_id,
                artifact: Box::new(artifact.clone()),
            }),
            Err(e) => events.emit(SwarmEvent::Failed {
                task_id,
                message: e.to_string(),
            }),
        }
        result
    }

    async fn run(
        &self,
        task_id: &str,
        command: &str,
        events: &EventSink,
    ) -> Result<AggregatedArtifact, OrchestratorError> {
        let started = Instant::now();
        info!("Received command: {}", command);
        events.emit(SwarmEvent::CommandReceived {
            task_id: task_id.to_string(),
            command: command.to_string(),
        });

        let descriptor = self.interpreter.parse(command).await.inspect_err(|e| {
            error!("Could not interpret command: {}", e);
        })?;

        let subjects = descriptor.subject_names();
        events.emit(SwarmEvent::Dispatching {
            task_id: task_id.to_string(),
            count: subjects.len(),
            subjects,
        });

        let outcomes = self
            .pool
            .execute_parallel(descriptor.subject_tasks(), events)
            .await?;

        let succeeded = outcomes.iter().filter(|o| o.success).count();
        events.emit(SwarmEvent::Aggregating {
            task_id: task_id.to_string(),
            succeeded,
            failed: outcomes.len() - succeeded,
        });

        let artifact = self
            .aggregator
            .aggregate(&outcomes, descriptor.query_kind)
            .await
            .with_total_elapsed(started.elapsed());

        info!(
            "Command finished: {}/{} successful in {:.1}s",
            artifact.succeeded_count,
            artifact.total(),
            artifact.total_elapsed.as_secs_f64()
        );
        Ok(artifact)
    }
}
