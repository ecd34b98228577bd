//! Agent Loop use case
//!
//! Drives one browser agent through the bounded reasoning/action cycle:
//!
//! ```text
//!            ┌──────────────────────────────┐
//!            ▼                              │
//!   AwaitingDecision ──ToolCall──▶ Executing ┘
//!            │
//!            ├──Note──▶ (log-only turn) ──▶ AwaitingDecision
//!            ├──Message──▶ Done
//!            └──limit reached──▶ IterationLimitExceeded
//! ```
//!
//! Every reasoning call counts as one iteration, notes included.

use crate::config::ExecutionParams;
use crate::ports::events::{EventSink, SwarmEvent};
use crate::ports::reasoning_backend::ReasoningBackend;
use crate::ports::tool_gateway::{ToolGateway, ToolGatewayError};
use std::sync::Arc;
use std::time::Instant;
use swarm_domain::{
    AgentDecision, AgentPromptTemplate, ConversationContext, ErrorKind, TaskOutcome, ToolCall,
    ToolOutcome, ToolSpec, WorkerId, parse_decision,
};
use tracing::{debug, info, warn};

/// Terminal failure of one run.
type Failure = (ErrorKind, String);

/// One agent: a gateway handle, the reasoning backend and the context of the
/// task it is currently running.
pub struct AgentLoop {
    worker_id: WorkerId,
    gateway: Arc<dyn ToolGateway>,
    backend: Arc<dyn ReasoningBackend>,
    params: ExecutionParams,
    context: ConversationContext,
}

impl AgentLoop {
    pub fn new(
        worker_id: WorkerId,
        gateway: Arc<dyn ToolGateway>,
        backend: Arc<dyn ReasoningBackend>,
        params: ExecutionParams,
    ) -> Self {
        Self {
            worker_id,
            gateway,
            backend,
            params,
            context: ConversationContext::default(),
        }
    }

    pub fn worker_id(&self) -> &WorkerId {
        &self.worker_id
    }

    /// Context of the most recent run.
    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    /// Run one task from a fresh context seeded with `prompt`.
    pub async fn run(&mut self, subject: &str, prompt: &str, events: &EventSink) -> TaskOutcome {
        let catalog = self.gateway.catalog();
        let context = ConversationContext::for_task(AgentPromptTemplate::agent_system(&catalog), prompt);
        self.run_with_context(subject, context, events).await
    }

    /// Run one task from a caller-provided initial context.
    pub async fn run_with_context(
        &mut self,
        subject: &str,
        initial: ConversationContext,
        events: &EventSink,
    ) -> TaskOutcome {
        self.context = initial;
        let catalog = self.gateway.catalog();
        let started = Instant::now();

        info!(worker = %self.worker_id, subject, "Agent task started");
        let (result, iterations) = self.drive(subject, &catalog, events).await;

        let outcome = match result {
            Ok(message) => {
                info!(worker = %self.worker_id, subject, iterations, "Agent task completed");
                TaskOutcome::success(subject, message)
            }
            Err((kind, message)) => {
                warn!(worker = %self.worker_id, subject, iterations, %kind, "Agent task failed: {}", message);
                TaskOutcome::failure(subject, kind, message)
            }
        };

        outcome
            .with_worker(self.worker_id.clone())
            .with_iterations(iterations)
            .with_elapsed(started.elapsed())
    }

    async fn drive(
        &mut self,
        subject: &str,
        catalog: &ToolSpec,
        events: &EventSink,
    ) -> (Result<String, Failure>, usize) {
        let max = self.params.max_iterations;

        for iteration in 1..=max {
            let reply = match self.backend.decide(&self.context).await {
                Ok(reply) => reply,
                Err(e) => {
                    return (
                        Err((ErrorKind::ReasoningBackendUnavailable, e.to_string())),
                        iteration,
                    );
                }
            };

            let decision = match parse_decision(&reply) {
                Ok(decision) => decision,
                Err(e) => {
                    debug!(worker = %self.worker_id, "Unparseable reply: {}", reply);
                    return (Err((ErrorKind::MalformedDecision, e.to_string())), iteration);
                }
            };
            debug!(worker = %self.worker_id, iteration, kind = decision.kind(), "Decision received");

            match decision {
                AgentDecision::InternalNote(text) => {
                    debug!(worker = %self.worker_id, iteration, "Note: {}", text);
                    self.context.push_note(text);
                }
                AgentDecision::UserMessage(text) => {
                    self.context.push_assistant(reply.trim());
                    return (Ok(text), iteration);
                }
                AgentDecision::ToolCall(call) => {
                    self.context.push_assistant(reply.trim());
                    events.emit(SwarmEvent::AgentStep {
                        worker_id: self.worker_id.clone(),
                        subject: subject.to_string(),
                        iteration,
                        tool: call.tool_name.clone(),
                    });

                    let Some(canonical) = catalog.resolve(&call.tool_name) else {
                        let available = catalog.names().collect::<Vec<_>>().join(", ");
                        debug!(worker = %self.worker_id, "Unknown tool requested: {}", call.tool_name);
                        self.context.push_tool_error(
                            &call.tool_name,
                            format!("Unknown tool. Available tools: {}", available),
                        );
                        continue;
                    };

                    let call = ToolCall {
                        tool_name: canonical.to_string(),
                        arguments: call.arguments,
                    };

                    match self.invoke_with_retry(&call).await {
                        Ok(outcome) => {
                            if !outcome.success {
                                debug!(
                                    worker = %self.worker_id,
                                    tool = %outcome.tool_name,
                                    "Tool reported failure: {}",
                                    outcome.error.as_deref().unwrap_or("")
                                );
                            }
                            self.context.push_tool_outcome(&outcome);
                        }
                        Err(e) => {
                            return (
                                Err((ErrorKind::ToolGatewayUnavailable, e.to_string())),
                                iteration,
                            );
                        }
                    }
                }
            }
        }

        (
            Err((
                ErrorKind::IterationLimitExceeded,
                format!("No answer after {} iterations", max),
            )),
            max,
        )
    }

    /// Invoke a tool, retrying transport failures with linear backoff.
    async fn invoke_with_retry(&self, call: &ToolCall) -> Result<ToolOutcome, ToolGatewayError> {
        let attempts = self.params.tool_retries + 1;
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.gateway.invoke(call).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) => {
                    warn!(
                        worker = %self.worker_id,
                        tool = %call.tool_name,
                        attempt,
                        attempts,
                        "Gateway call failed: {}",
                        e
                    );
                    last_error = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(self.params.retry_backoff * attempt as u32).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ToolGatewayError::Unavailable("no attempts made".into())))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ports::reasoning_backend::ReasoningError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use swarm_domain::Role;

    // ==================== Test Mocks ====================

    /// Backend that replays a script; repeats the last reply once exhausted.
    pub(crate) struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<String, String>>>,
        last: Mutex<Option<Result<String, String>>>,
        pub(crate) decide_calls: AtomicUsize,
        pub(crate) complete_calls: AtomicUsize,
        pub(crate) seen_context_lens: Mutex<Vec<usize>>,
    }

    impl ScriptedBackend {
        pub(crate) fn new(replies: Vec<Result<&str, &str>>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .map(|r| r.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
                last: Mutex::new(None),
                decide_calls: AtomicUsize::new(0),
                complete_calls: AtomicUsize::new(0),
                seen_context_lens: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn always(reply: &str) -> Self {
            Self::new(vec![Ok(reply)])
        }

        fn next(&self) -> Result<String, ReasoningError> {
            let next = self.replies.lock().unwrap().pop_front();
            let reply = match next {
                Some(reply) => {
                    *self.last.lock().unwrap() = Some(reply.clone());
                    reply
                }
                None => self
                    .last
                    .lock()
                    .unwrap()
                    .clone()
                    .unwrap_or_else(|| Err("script empty".to_string())),
            };
            reply.map_err(ReasoningError::Unavailable)
        }
    }

    #[async_trait]
    impl ReasoningBackend for ScriptedBackend {
        async fn decide(&self, context: &ConversationContext) -> Result<String, ReasoningError> {
            self.decide_calls.fetch_add(1, Ordering::SeqCst);
            self.seen_context_lens.lock().unwrap().push(context.len());
            self.next()
        }

        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, ReasoningError> {
            self.complete_calls.fetch_add(1, Ordering::SeqCst);
            self.next()
        }
    }

    /// Gateway with the fallback browser catalog that records calls.
    pub(crate) struct MockGateway {
        pub(crate) calls: Mutex<Vec<ToolCall>>,
        /// Number of leading invocations that fail at the transport level.
        transport_failures: AtomicUsize,
        tool_error: Option<String>,
        healthy: bool,
    }

    impl MockGateway {
        pub(crate) fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                transport_failures: AtomicUsize::new(0),
                tool_error: None,
                healthy: true,
            }
        }

        pub(crate) fn failing_transport(times: usize) -> Self {
            let gateway = Self::new();
            gateway.transport_failures.store(times, Ordering::SeqCst);
            gateway
        }

        pub(crate) fn tool_error(message: &str) -> Self {
            Self {
                tool_error: Some(message.to_string()),
                ..Self::new()
            }
        }

        pub(crate) fn unhealthy() -> Self {
            Self {
                healthy: false,
                ..Self::new()
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ToolGateway for MockGateway {
        fn endpoint(&self) -> &str {
            "mock://gateway"
        }

        fn catalog(&self) -> ToolSpec {
            ToolSpec::fallback_browser()
        }

        async fn invoke(&self, call: &ToolCall) -> Result<ToolOutcome, ToolGatewayError> {
            self.calls.lock().unwrap().push(call.clone());
            let remaining = self.transport_failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.transport_failures.store(remaining - 1, Ordering::SeqCst);
                return Err(ToolGatewayError::Unavailable("connection refused".into()));
            }
            if let Some(message) = &self.tool_error {
                return Ok(ToolOutcome::failure(&call.tool_name, message));
            }
            Ok(ToolOutcome::success(&call.tool_name, "ok"))
        }

        async fn health(&self) -> bool {
            self.healthy
        }
    }

    const NAVIGATE: &str =
        r#"{"type": "tool_call", "name": "browser_navigate", "arguments": {"url": "https://stripe.com"}}"#;
    const ANSWER: &str = r#"{"type": "message", "text": "Stripe: $65B (Bloomberg)"}"#;
    const NOTE: &str = r#"{"type": "note", "text": "thinking"}"#;

    fn fast_params() -> ExecutionParams {
        ExecutionParams::default().with_retry_backoff(Duration::from_millis(1))
    }

    fn agent(gateway: Arc<MockGateway>, backend: Arc<ScriptedBackend>, params: ExecutionParams) -> AgentLoop {
        AgentLoop::new(WorkerId::new("agent-1"), gateway, backend, params)
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_immediate_message_is_one_iteration() {
        let backend = Arc::new(ScriptedBackend::always(ANSWER));
        let gateway = Arc::new(MockGateway::new());
        let mut agent = agent(gateway.clone(), backend.clone(), fast_params());

        let outcome = agent.run("Stripe", "find valuation", &EventSink::none()).await;

        assert!(outcome.success);
        assert_eq!(outcome.result_text.as_deref(), Some("Stripe: $65B (Bloomberg)"));
        assert_eq!(outcome.iterations, 1);
        assert_eq!(backend.decide_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.call_count(), 0);
        assert_eq!(outcome.worker_id, Some(WorkerId::new("agent-1")));
    }

    #[tokio::test]
    async fn test_iteration_limit_counts_reasoning_calls() {
        let backend = Arc::new(ScriptedBackend::always(NAVIGATE));
        let gateway = Arc::new(MockGateway::new());
        let mut agent = agent(gateway.clone(), backend.clone(), fast_params().with_max_iterations(3));

        let outcome = agent.run("Stripe", "task", &EventSink::none()).await;

        assert!(!outcome.success);
        assert_eq!(outcome.error_kind, Some(ErrorKind::IterationLimitExceeded));
        assert_eq!(backend.decide_calls.load(Ordering::SeqCst), 3);
        assert_eq!(outcome.iterations, 3);
        assert_eq!(gateway.call_count(), 3);
    }

    #[tokio::test]
    async fn test_notes_consume_iterations() {
        let backend = Arc::new(ScriptedBackend::always(NOTE));
        let gateway = Arc::new(MockGateway::new());
        let mut agent = agent(gateway, backend.clone(), fast_params().with_max_iterations(3));

        let outcome = agent.run("Stripe", "task", &EventSink::none()).await;

        assert_eq!(outcome.error_kind, Some(ErrorKind::IterationLimitExceeded));
        assert_eq!(backend.decide_calls.load(Ordering::SeqCst), 3);
        // Notes are in the context but hidden from visible turns.
        assert_eq!(agent.context().len(), 4);
        assert_eq!(agent.context().visible_turns().count(), 1);
    }

    #[tokio::test]
    async fn test_tool_then_message() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(NAVIGATE), Ok(ANSWER)]));
        let gateway = Arc::new(MockGateway::new());
        let mut agent = agent(gateway.clone(), backend.clone(), fast_params());
        let (events, mut rx) = EventSink::channel();

        let outcome = agent.run("Stripe", "task", &events).await;

        assert!(outcome.success);
        assert_eq!(outcome.iterations, 2);
        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls[0].get_string("url"), Some("https://stripe.com"));
        // The second decision saw the tool result: user + assistant + tool-result.
        assert_eq!(*backend.seen_context_lens.lock().unwrap(), vec![1, 3]);
        let turns = agent.context().turns();
        assert_eq!(turns[2].role, Role::ToolResult);
        assert!(turns[2].content.starts_with("Tool 'browser_navigate' executed."));

        let Ok(SwarmEvent::AgentStep { iteration, tool, .. }) = rx.try_recv() else {
            panic!("expected agent step event");
        };
        assert_eq!(iteration, 1);
        assert_eq!(tool, "browser_navigate");
    }

    #[tokio::test]
    async fn test_alias_is_resolved_before_invoking() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Ok(r#"{"type": "tool_call", "name": "snapshot"}"#),
            Ok(ANSWER),
        ]));
        let gateway = Arc::new(MockGateway::new());
        let mut agent = agent(gateway.clone(), backend, fast_params());

        agent.run("Stripe", "task", &EventSink::none()).await;

        assert_eq!(gateway.calls.lock().unwrap()[0].tool_name, "browser_snapshot");
    }

    #[tokio::test]
    async fn test_unknown_tool_appends_error_and_continues() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Ok(r#"{"type": "tool_call", "name": "browser_teleport"}"#),
            Ok(ANSWER),
        ]));
        let gateway = Arc::new(MockGateway::new());
        let mut agent = agent(gateway.clone(), backend, fast_params());

        let outcome = agent.run("Stripe", "task", &EventSink::none()).await;

        assert!(outcome.success);
        assert_eq!(gateway.call_count(), 0);
        let error_turn = &agent.context().turns()[2];
        assert_eq!(error_turn.role, Role::ToolResult);
        assert!(error_turn.content.contains("Unknown tool"));
        assert!(error_turn.content.contains("browser_navigate"));
    }

    #[tokio::test]
    async fn test_tool_failure_is_recoverable() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(NAVIGATE), Ok(ANSWER)]));
        let gateway = Arc::new(MockGateway::tool_error("net::ERR_NAME_NOT_RESOLVED"));
        let mut agent = agent(gateway, backend, fast_params());

        let outcome = agent.run("Stripe", "task", &EventSink::none()).await;

        assert!(outcome.success);
        assert!(agent.context().turns()[2].content.contains("failed with error: net::ERR_NAME_NOT_RESOLVED"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_retried() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(NAVIGATE), Ok(ANSWER)]));
        let gateway = Arc::new(MockGateway::failing_transport(2));
        let mut agent = agent(gateway.clone(), backend, fast_params().with_tool_retries(2));

        let outcome = agent.run("Stripe", "task", &EventSink::none()).await;

        assert!(outcome.success);
        assert_eq!(gateway.call_count(), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_abort_with_gateway_unavailable() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(NAVIGATE), Ok(ANSWER)]));
        let gateway = Arc::new(MockGateway::failing_transport(10));
        let mut agent = agent(gateway.clone(), backend.clone(), fast_params().with_tool_retries(1));

        let outcome = agent.run("Stripe", "task", &EventSink::none()).await;

        assert_eq!(outcome.error_kind, Some(ErrorKind::ToolGatewayUnavailable));
        assert_eq!(gateway.call_count(), 2);
        assert_eq!(backend.decide_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_backend_error_aborts() {
        let backend = Arc::new(ScriptedBackend::new(vec![Err("503 Service Unavailable")]));
        let mut agent = agent(Arc::new(MockGateway::new()), backend, fast_params());

        let outcome = agent.run("Stripe", "task", &EventSink::none()).await;

        assert_eq!(outcome.error_kind, Some(ErrorKind::ReasoningBackendUnavailable));
        assert!(outcome.error_message.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_malformed_reply_aborts() {
        let backend = Arc::new(ScriptedBackend::always("Sure! Let me look that up for you."));
        let mut agent = agent(Arc::new(MockGateway::new()), backend.clone(), fast_params());

        let outcome = agent.run("Stripe", "task", &EventSink::none()).await;

        assert_eq!(outcome.error_kind, Some(ErrorKind::MalformedDecision));
        assert_eq!(backend.decide_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_each_run_starts_fresh_context() {
        let backend = Arc::new(ScriptedBackend::always(ANSWER));
        let mut agent = agent(Arc::new(MockGateway::new()), backend.clone(), fast_params());

        agent.run("Stripe", "first", &EventSink::none()).await;
        agent.run("Brex", "second", &EventSink::none()).await;

        assert_eq!(*backend.seen_context_lens.lock().unwrap(), vec![1, 1]);
        assert_eq!(agent.context().turns()[0].content, "second");
    }
}
