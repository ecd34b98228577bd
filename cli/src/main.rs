//! CLI entrypoint for browser-swarm
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use swarm_application::{
    CommandClassifier, CommandInterpreter, EventSink, Orchestrator, ReasoningBackend,
    ResultAggregator, ToolGateway, WorkerPool,
};
use swarm_domain::WorkerId;
use swarm_infrastructure::gemini::backend::DEFAULT_BASE_URL;
use swarm_infrastructure::{
    CatalogLoader, ClassifierKind, ConfigLoader, FileConfig, GeminiReasoningBackend,
    KeywordClassifier, LlmClassifier, McpToolGateway,
};
use swarm_presentation::{
    Cli, Command, ConsoleFormatter, ProgressObserver, ProgressReporter, ServerState,
    SimpleProgress, follow, serve,
};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let Some(command) = cli.command.clone() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = init_logging(&cli, &command, &config);
    info!("Starting browser-swarm {}", env!("CARGO_PKG_VERSION"));

    check_config(&config)?;
    let orchestrator = Arc::new(build_orchestrator(&config).await?);

    match command {
        Command::Serve { host, port } => {
            let mut server = config.server.clone();
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }

            if !cli.quiet {
                println!("{}", ConsoleFormatter::format_workers(&orchestrator.worker_statuses()));
            }

            let state = Arc::new(ServerState::new(Arc::clone(&orchestrator)));
            serve(&server.address(), state, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
            })
            .await
            .with_context(|| format!("Server on {} failed", server.address()))?;

            info!("Shutting down");
            orchestrator.pool().shutdown(&EventSink::none());
        }
        Command::Run { command, output } => {
            let (sink, rx) = EventSink::channel();
            let observer: Option<Arc<dyn ProgressObserver>> = if cli.quiet {
                None
            } else if std::io::stderr().is_terminal() {
                Some(Arc::new(ProgressReporter::new()))
            } else {
                Some(Arc::new(SimpleProgress))
            };
            let follower = observer.map(|observer| tokio::spawn(follow(rx, observer)));

            let result = orchestrator.handle(&command, &sink).await;
            drop(sink);
            if let Some(follower) = follower {
                let _ = follower.await;
            }

            let artifact = result?;
            println!("{}", ConsoleFormatter::format(&artifact, output.into()));
        }
    }

    Ok(())
}

/// Stderr logging filtered by `-v` (or `RUST_LOG` when no `-v` is given),
/// plus a daily rolling file when `[logging] directory` is set.
fn init_logging(cli: &Cli, command: &Command, config: &FileConfig) -> Option<WorkerGuard> {
    let filter = match cli.verbose {
        0 => {
            let fallback = match command {
                Command::Serve { .. } => "info",
                Command::Run { .. } => "warn",
            };
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
        }
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match &config.logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "browser-swarm.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

/// Log every issue; abort on errors.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            error!("{}", issue.message);
        } else {
            warn!("{}", issue.message);
        }
    }

    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        bail!("Configuration has {} error(s); see the log above", errors);
    }
    Ok(())
}

async fn build_orchestrator(config: &FileConfig) -> Result<Orchestrator> {
    // === Dependency Injection ===
    let catalog = Arc::new(CatalogLoader::load(&config.catalog.path)?);
    info!(
        "Loaded {} subjects from {}",
        catalog.len(),
        config.catalog.path.display()
    );

    let reasoning = &config.reasoning;
    let backend: Arc<dyn ReasoningBackend> = Arc::new(
        GeminiReasoningBackend::from_env(
            &reasoning.api_key_env,
            reasoning.model.clone(),
            reasoning
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            Duration::from_secs(reasoning.request_timeout_secs),
        )
        .context("Failed to create the reasoning backend")?,
    );

    let gateway_timeout = Duration::from_secs(config.pool.task_timeout_secs);
    let mut gateways: Vec<(WorkerId, Arc<dyn ToolGateway>)> = Vec::new();
    for worker in &config.pool.workers {
        let gateway = McpToolGateway::new(&worker.endpoint, gateway_timeout)
            .with_context(|| format!("Failed to create gateway for {}", worker.id))?;
        gateways.push((WorkerId::new(&worker.id), Arc::new(gateway)));
    }

    let params = config.execution_params();
    let pool_size = gateways.len();
    let pool = Arc::new(WorkerPool::new(gateways, Arc::clone(&backend), params.clone()));

    let summary = pool.initialize(&EventSink::none()).await;
    info!("{}/{} workers ready", summary.idle, summary.total);
    if summary.idle < summary.total {
        warn!(
            "{} worker(s) did not answer their health check",
            summary.total - summary.idle
        );
    }

    let (kind, _) = config.classifier.parse_kind();
    let classifier: Arc<dyn CommandClassifier> = match kind {
        ClassifierKind::Keyword => Arc::new(KeywordClassifier::new(Arc::clone(&catalog))),
        ClassifierKind::Llm => Arc::new(
            LlmClassifier::new(Arc::clone(&backend), pool_size)
                .with_fallback(KeywordClassifier::new(Arc::clone(&catalog))),
        ),
    };

    let interpreter = CommandInterpreter::new(classifier, catalog, pool_size, params.default_count);
    let aggregator = ResultAggregator::new(backend);
    Ok(Orchestrator::new(interpreter, pool, aggregator))
}
