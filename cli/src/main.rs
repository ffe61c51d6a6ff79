//! CLI entrypoint for chatsync
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use chatsync_application::{
    ChatController, ChatServicePort, ConversationLogger, SendOutcome, UiEvent,
};
use chatsync_domain::SessionId;
use chatsync_infrastructure::{ConfigLoader, FileConfig, HttpChatService, JsonlConversationLogger};
use chatsync_presentation::{ChatRepl, Cli, ConsoleFormatter, ReplConfig};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);

    let _trace_guard = init_tracing(cli.verbose, config.logging.trace_file.as_deref())?;
    info!("Starting chatsync against {}", config.service.endpoint);

    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            error!("{}", issue);
        } else {
            warn!("{}", issue);
        }
    }
    if let Some(issue) = issues.iter().find(|i| i.is_error()) {
        bail!("Invalid configuration: {}", issue);
    }

    ConsoleFormatter::set_color(!cli.no_color && config.repl.color);

    // === Dependency Injection ===
    let service: Arc<dyn ChatServicePort> = Arc::new(
        HttpChatService::from_config(&config.service).context("Invalid chat service settings")?,
    );
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = ChatController::new(service, tx);
    if let Some(logger) = conversation_logger(&cli, &config) {
        controller = controller.with_conversation_logger(logger);
    }

    if cli.list {
        controller.load_registry().await;
        exit_on_errors(&mut rx);
        println!(
            "{}",
            ConsoleFormatter::registry(controller.registry(), controller.active())
        );
        return Ok(());
    }

    if let Some(id) = &cli.history {
        controller.open(SessionId::new(id.as_str())?).await;
        exit_on_errors(&mut rx);
        println!(
            "{}",
            ConsoleFormatter::transcript(controller.transcript().entries())
        );
        return Ok(());
    }

    if let Some(message) = cli.message.clone() {
        return send_once(controller, &mut rx, cli.chat_id.as_deref(), message).await;
    }

    // Interactive mode
    let repl_config = ReplConfig {
        show_progress: config.repl.show_progress && !cli.quiet,
        history_file: config.repl.history_file.as_deref().map(PathBuf::from),
    };
    let mut repl = ChatRepl::new(controller, rx, repl_config);
    if let Some(id) = &cli.chat_id {
        repl.open_on_start(SessionId::new(id.as_str())?);
    }
    repl.run().await;

    Ok(())
}

/// Command-line flags beat every configuration source.
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(endpoint) = &cli.endpoint {
        config.service.endpoint = endpoint.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.service.timeout_secs = Some(secs);
    }
}

fn init_tracing(verbose: u8, trace_file: Option<&str>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = trace_file.filter(|p| !p.trim().is_empty()) else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let path = Path::new(path);
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Invalid trace file path: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create trace directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        dir, file_name,
    ));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn conversation_logger(cli: &Cli, config: &FileConfig) -> Option<Arc<dyn ConversationLogger>> {
    let path = cli.log_file.clone().or_else(|| {
        config
            .logging
            .conversation_log
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    })?;
    let logger = JsonlConversationLogger::open(&path)?;
    info!("Conversation log: {}", logger.path().display());
    Some(Arc::new(logger))
}

/// Print every error event seen so far and exit with status 1 if there was any.
fn exit_on_errors(rx: &mut mpsc::UnboundedReceiver<UiEvent>) {
    let mut failed = false;
    while let Ok(event) = rx.try_recv() {
        if let UiEvent::Error(e) = event {
            eprintln!("{}", ConsoleFormatter::error(&e));
            failed = true;
        }
    }
    if failed {
        std::process::exit(1);
    }
}

async fn send_once(
    mut controller: ChatController,
    rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    chat_id: Option<&str>,
    message: String,
) -> Result<()> {
    if let Some(id) = chat_id {
        controller.open(SessionId::new(id)?).await;
        exit_on_errors(rx);
    }

    match controller.send(message).await? {
        SendOutcome::Reconciled { created } => {
            if let Some(entry) = controller.transcript().entries().last() {
                println!(
                    "{}",
                    ConsoleFormatter::message(&entry.message, entry.delivery)
                );
            }
            if let Some(session) = created {
                eprintln!(
                    "{}",
                    ConsoleFormatter::notice(&format!(
                        "Started chat {} (continue with --chat-id {})",
                        session.display_title(),
                        session.id
                    ))
                );
            }
            Ok(())
        }
        SendOutcome::Stale { .. } => Ok(()),
        SendOutcome::Failed(_) => {
            exit_on_errors(rx);
            Ok(())
        }
    }
}
