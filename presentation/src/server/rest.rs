//! REST handlers

use super::{ServerState, run_command};
use crate::output::console::ConsoleFormatter;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use swarm_application::{InterpretError, OrchestratorError, PoolError};
use swarm_domain::{AggregatedArtifact, Subject};
use tracing::info;

const DEFAULT_SUBJECT_LIMIT: usize = 10;

pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "browser-swarm" }))
}

pub(super) async fn workers(State(state): State<Arc<ServerState>>) -> Json<Value> {
    Json(json!({
        "summary": state.orchestrator.pool_summary(),
        "workers": state.orchestrator.worker_statuses(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub total_workers: usize,
    pub idle_workers: usize,
    pub running_workers: usize,
    pub error_workers: usize,
    pub active_tasks: usize,
    pub completed_tasks: u64,
    pub failed_tasks: u64,
    pub uptime_seconds: f64,
}

pub(super) async fn status(State(state): State<Arc<ServerState>>) -> Json<StatusResponse> {
    let summary = state.orchestrator.pool_summary();
    let statuses = state.orchestrator.worker_statuses();
    Json(StatusResponse {
        total_workers: summary.total,
        idle_workers: summary.idle,
        running_workers: summary.running,
        error_workers: summary.error,
        active_tasks: summary.running,
        completed_tasks: statuses.iter().map(|s| s.completed_tasks).sum(),
        failed_tasks: statuses.iter().map(|s| s.failed_tasks).sum(),
        uptime_seconds: state.started.elapsed().as_secs_f64(),
    })
}

#[derive(Debug, Deserialize)]
pub(super) struct SubjectsQuery {
    limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubjectsResponse {
    pub count: usize,
    pub total_available: usize,
    pub subjects: Vec<Subject>,
}

pub(super) async fn subjects(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<SubjectsQuery>,
) -> Json<SubjectsResponse> {
    let catalog = state.orchestrator.catalog();
    let subjects: Vec<Subject> = catalog
        .iter()
        .take(query.limit.unwrap_or(DEFAULT_SUBJECT_LIMIT))
        .cloned()
        .collect();
    Json(SubjectsResponse {
        count: subjects.len(),
        total_available: catalog.len(),
        subjects,
    })
}

#[derive(Debug, Deserialize)]
pub(super) struct ExecuteRequest {
    command: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub task_id: Option<String>,
    pub status: String,
    pub markdown: String,
    pub artifact: AggregatedArtifact,
    pub total_duration_seconds: f64,
    pub workers_used: usize,
}

/// Run a command synchronously. Its progress is mirrored to every
/// connected WebSocket client.
pub(super) async fn execute(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, (StatusCode, Json<Value>)> {
    info!("REST execute: {}", request.command);
    let broadcast = state.broadcast.clone();
    let run = run_command(&state.orchestrator, &request.command, move |message| {
        // No subscribers is fine.
        let _ = broadcast.send(message);
    })
    .await;

    match run.result {
        Ok(artifact) => Ok(Json(ExecuteResponse {
            task_id: run.task_id,
            status: "completed".to_string(),
            markdown: ConsoleFormatter::markdown(&artifact),
            total_duration_seconds: artifact.total_elapsed.as_secs_f64(),
            workers_used: artifact.total(),
            artifact,
        })),
        Err(e) => {
            Err((
                error_status(&e),
                Json(json!({
                    "task_id": run.task_id,
                    "status": "error",
                    "error": e.to_string(),
                })),
            ))
        }
    }
}

/// Input errors are the client's fault; a failing classifier or an
/// unavailable pool is not.
fn error_status(error: &OrchestratorError) -> StatusCode {
    match error {
        OrchestratorError::Interpret(InterpretError::Classifier(_)) => StatusCode::BAD_GATEWAY,
        OrchestratorError::Interpret(_) => StatusCode::BAD_REQUEST,
        OrchestratorError::Pool(PoolError::TooManySubjectsForPoolSize { .. }) => StatusCode::BAD_REQUEST,
        OrchestratorError::Pool(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
