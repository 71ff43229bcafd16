//! CLI entrypoint for PandaParley
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use parley_application::{
    CastExpertsInput, CastExpertsUseCase, ConversationLogger, DiscussionParams,
    NoConversationLogger, NoSessionArchive, SessionArchive, TurnObserver, TurnOrchestrator,
};
use parley_domain::{Cast, ExpertChoice, Language, ProviderKind, ProviderSettings, SessionState};
use parley_infrastructure::{
    ConfigLoader, FileConfig, InMemorySessionStore, JsonFileArchive, JsonlConversationLogger,
    RoutingModelClient,
};
use parley_presentation::{
    Cli, ConsoleRenderer, ProgressReporter, SessionRepl, SimpleProgress, TranscriptExporter,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_tracing(cli.verbose, config.logging.file.as_deref());

    info!("Starting PandaParley");
    for issue in config.validate() {
        warn!("Config: {}", issue);
    }

    // === Dependency Injection ===
    let archive: Arc<dyn SessionArchive> = match config.archive.resolved_dir() {
        Some(dir) => {
            info!("Session archive: {}", dir.display());
            Arc::new(JsonFileArchive::new(dir))
        }
        None => Arc::new(NoSessionArchive),
    };

    // Archive-only modes need no model
    if cli.history {
        let sessions = archive.list().await?;
        print!("{}", ConsoleRenderer::format_history(&sessions));
        return Ok(());
    }
    if let Some(id) = &cli.export {
        let session = archive.load(id).await?;
        let document = TranscriptExporter::export(&session, cli.format);
        match &cli.output {
            Some(path) => {
                std::fs::write(path, document)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Exported {} to {}", id, path.display());
            }
            None => print!("{}", document),
        }
        return Ok(());
    }

    let provider = provider_settings(&cli, &config)?;
    let params = discussion_params(&cli, &config);
    let language = match &cli.language {
        Some(raw) => raw.parse::<Language>()?,
        None => config.discussion.parse_language().0,
    };

    let client = Arc::new(RoutingModelClient::with_default_adapters(params.request_timeout)?);

    let topic = match (&cli.topic, &cli.resume) {
        (_, Some(_)) => String::new(),
        (Some(topic), None) if !topic.trim().is_empty() => topic.trim().to_string(),
        _ => bail!("A topic is required. Use --resume <ID> to reopen an archived session."),
    };

    let store = Arc::new(InMemorySessionStore::new(
        SessionState::new(topic.clone(), language, Cast::default()),
        provider.clone(),
    ));

    let observer: Arc<dyn TurnObserver> = if cli.quiet {
        Arc::new(SimpleProgress)
    } else {
        Arc::new(ProgressReporter::new())
    };

    let logger: Arc<dyn ConversationLogger> = match &config.logging.conversation_log {
        Some(path) => match JsonlConversationLogger::new(path) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoConversationLogger),
        },
        None => Arc::new(NoConversationLogger),
    };

    let orchestrator = Arc::new(
        TurnOrchestrator::new(Arc::clone(&client), store)
            .with_archive(archive)
            .with_observer(observer)
            .with_logger(logger)
            .with_params(params),
    );

    if let Some(id) = &cli.resume {
        orchestrator
            .load_archived(id)
            .await
            .with_context(|| format!("Failed to resume session {}", id))?;
    } else {
        let (config_a, config_b) = config.personas.parse_choices().0;
        let expert_a = expert_override(cli.expert_a.as_deref(), config_a);
        let expert_b = expert_override(cli.expert_b.as_deref(), config_b);

        if !cli.quiet {
            println!("Casting experts for \"{}\"...", topic);
        }
        let casting = CastExpertsUseCase::new(client)
            .execute(
                CastExpertsInput::new(topic, provider)
                    .with_facilitator(config.personas.facilitator())
                    .with_experts(expert_a, expert_b),
            )
            .await?;
        if let Some(reasoning) = &casting.reasoning
            && !cli.quiet
        {
            println!("{}", reasoning);
        }
        orchestrator.update_cast(casting.cast)?;
    }

    SessionRepl::new(orchestrator)
        .with_auto_play(!cli.manual)
        .run()
        .await;

    Ok(())
}

/// Initialize logging based on verbosity level, optionally teeing to a file
fn init_tracing(verbose: u8, file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match file.and_then(|p| Some((p.parent()?, p.file_name()?))) {
        Some((dir, name)) => {
            let dir = if dir.as_os_str().is_empty() {
                Path::new(".")
            } else {
                dir
            };
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file_layer)
        .init();

    guard
}

/// Active provider from config, with command-line overrides applied
fn provider_settings(cli: &Cli, config: &FileConfig) -> Result<ProviderSettings> {
    let kind = match &cli.provider {
        Some(raw) => raw.parse::<ProviderKind>()?,
        None => config.provider.parse_kind().0,
    };

    let mut settings = config.provider.to_settings(kind);
    if let Some(model) = &cli.model {
        settings = settings.with_model(model);
    }
    if let Some(url) = &cli.base_url {
        settings = settings.with_base_url(url);
    }
    if !settings.has_credentials() {
        warn!(
            "No API key configured for {}; turns will fail until one is set",
            kind.display_name()
        );
    }
    Ok(settings)
}

fn discussion_params(cli: &Cli, config: &FileConfig) -> DiscussionParams {
    let params = config.discussion.to_params().0;
    match cli.interval_ms {
        Some(ms) if ms > 0 => params.with_autoplay_interval(Duration::from_millis(ms)),
        Some(_) => {
            warn!("--interval-ms must be greater than 0, keeping the configured interval");
            params
        }
        None => params,
    }
}

fn expert_override(raw: Option<&str>, configured: ExpertChoice) -> ExpertChoice {
    match raw {
        Some(raw) => raw.parse().unwrap_or(configured),
        None => configured,
    }
}
