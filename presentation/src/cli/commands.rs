//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Format of an exported session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Readable transcript with whispers as quoted asides
    #[default]
    Markdown,
    /// The archived session as stored
    Json,
}

/// CLI arguments for panda-parley
#[derive(Parser, Debug)]
#[command(name = "panda-parley")]
#[command(author, version, about = "A facilitator and two AI experts dig into a topic while you whisper")]
#[command(long_about = r#"
PandaParley runs a moderated inquiry between a facilitator and two experts.

The facilitator opens, then the experts answer in strict rotation
(facilitator -> expert A -> expert B -> facilitator). Anything you type that
is not a command is whispered privately to the facilitator, who steers the
discussion with it without revealing it.

Configuration files are loaded from (in priority order):
1. PARLEY_* environment variables
2. --config <path>     Explicit config file
3. ./parley.toml       Project-level config
4. ~/.config/panda-parley/config.toml   Global config

Example:
  panda-parley "Is it better to be feared or loved?"
  panda-parley --expert-a ethicist --expert-b futurist "Should AI have rights?"
  panda-parley --provider openai --base-url http://localhost:1234/v1 "Why do cats purr?"
  panda-parley --history
"#)]
pub struct Cli {
    /// The topic to discuss (not required with --history, --resume or --export)
    pub topic: Option<String>,

    /// Response language: english, chinese, japanese or spanish
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,

    /// First expert: a preset id (e.g. "analyst") or "auto"
    #[arg(long, value_name = "ID")]
    pub expert_a: Option<String>,

    /// Second expert: a preset id (e.g. "visionary") or "auto"
    #[arg(long, value_name = "ID")]
    pub expert_b: Option<String>,

    /// Model provider: gemini, openai, openrouter or modelscope
    #[arg(short, long, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Model name override for the active provider
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Base URL override for the active provider
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Delay between automatic turns, in milliseconds
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Do not advance automatically; use /next for every turn
    #[arg(long)]
    pub manual: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// List archived sessions and exit
    #[arg(long)]
    pub history: bool,

    /// Reopen an archived session (paused) instead of starting a new one
    #[arg(long, value_name = "ID", conflicts_with = "export")]
    pub resume: Option<String>,

    /// Export an archived session as Markdown and exit
    #[arg(long, value_name = "ID")]
    pub export: Option<String>,

    /// Export format
    #[arg(long, value_enum, default_value = "markdown", requires = "export")]
    pub format: ExportFormat,

    /// Write the export to this file instead of stdout
    #[arg(short, long, value_name = "PATH", requires = "export")]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Whether this invocation only inspects the archive
    pub fn is_archive_query(&self) -> bool {
        self.history || self.export.is_some()
    }
}
