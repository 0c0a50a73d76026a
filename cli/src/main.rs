//! CLI entrypoint for sales-agent
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use sales_agent_application::{
    ChatSession, ConversationLogger, NoTurnProgress, RunTurnUseCase, ToolDispatcher,
    TurnProgressNotifier,
};
use sales_agent_domain::{Question, ToolProvider, ToolSpec};
use sales_agent_infrastructure::{
    ConfigLoader, FileConfig, JsonSchemaToolConverter, JsonlConversationLogger, OpenAiGateway,
    SqliteSalesProvider, StatementGuard, SystemPromptLoader,
};
use sales_agent_presentation::{
    ChatRepl, Cli, ConsoleFormatter, ProgressReporter, ReplConfig, ask_interruptible,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

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
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    apply_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    let _log_guard = init_logging(cli.verbose, config.logging.log_dir.as_deref());
    info!("Starting sales-agent");

    // === Dependency Injection ===
    let schema = Arc::new(JsonSchemaToolConverter);
    let gateway = Arc::new(OpenAiGateway::new(&config.model)?.with_schema(schema));

    let provider = SqliteSalesProvider::open(&config.database.path)
        .await
        .context("Cannot open the sales database")?
        .with_guard(StatementGuard::new(config.database.require_limit))
        .with_row_limit(config.database.max_rows);
    if !provider.is_available().await {
        warn!("Sales database at {} did not answer a probe query", provider.path().display());
    }
    let provider = Arc::new(provider);

    let tools = provider
        .discover_tools()
        .await
        .context("Tool discovery failed")?;
    let spec = ToolSpec::from_definitions(tools)?;
    info!("Registered {} tools from {}", spec.len(), provider.display_name());

    let params = config.execution_params();
    let dispatcher = ToolDispatcher::new(Arc::new(spec), provider.clone())
        .with_limits(params.result_limits.clone())
        .with_timeout(params.tool_timeout);

    let mut run_turn = RunTurnUseCase::new(gateway, Arc::new(dispatcher), params);
    if let Some(logger) = conversation_logger(&config) {
        run_turn = run_turn.with_logger(logger);
    }

    let system_prompt = SystemPromptLoader::new(&config.agent.system_prompt_file).load();
    let mut session = ChatSession::new(run_turn, system_prompt);

    let outcome = match cli.question.as_deref() {
        Some(question) => ask_once(&mut session, question, &cli, &config).await,
        None => {
            let repl_config = ReplConfig {
                show_tool_calls: config.repl.show_tool_calls && !cli.quiet,
                show_progress: !cli.quiet,
                history_file: config.repl.history_file.as_ref().map(PathBuf::from),
            };
            ChatRepl::new(session, repl_config)
                .run()
                .await
                .context("Chat session failed")
        }
    };

    provider.close().await;
    outcome
}

/// Answer a single question and print the result
async fn ask_once<G>(
    session: &mut ChatSession<G>,
    question: &str,
    cli: &Cli,
    config: &FileConfig,
) -> Result<()>
where
    G: sales_agent_application::LlmGateway + 'static,
{
    let question = Question::try_new(question)?;
    let progress: Box<dyn TurnProgressNotifier> = if cli.quiet {
        Box::new(NoTurnProgress)
    } else {
        Box::new(ProgressReporter::new().with_tool_calls(config.repl.show_tool_calls))
    };

    let output = ask_interruptible(session, &question, progress.as_ref())
        .await
        .map_err(|e| anyhow::anyhow!(ConsoleFormatter::turn_error(&e)))?;
    print!("{}", ConsoleFormatter::answer(&output));
    Ok(())
}

/// Command-line flags take precedence over every configuration source
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(model) = &cli.model {
        config.model.model = model.clone();
    }
    if let Some(endpoint) = &cli.endpoint {
        config.model.endpoint = Some(endpoint.clone());
    }
    if let Some(db) = &cli.db {
        config.database.path = db.to_string_lossy().into_owned();
    }
    if let Some(max) = cli.max_round_trips {
        config.agent.max_round_trips = max;
    }
}

fn conversation_logger(config: &FileConfig) -> Option<Arc<dyn ConversationLogger>> {
    let path = config.logging.conversation_log.as_ref()?;
    match JsonlConversationLogger::open(path) {
        Ok(logger) => {
            info!("Conversation log: {}", logger.path().display());
            Some(Arc::new(logger))
        }
        Err(e) => {
            warn!("Could not open conversation log {}: {}", path, e);
            None
        }
    }
}

/// Initialize tracing. `RUST_LOG` wins when no `-v` flag is given.
///
/// The returned guard flushes the file log on drop.
fn init_logging(verbose: u8, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        _ => EnvFilter::new(level),
    };

    let stderr = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "sales-agent.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(file)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .init();
            None
        }
    }
}
