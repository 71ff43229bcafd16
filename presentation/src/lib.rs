//! Presentation layer for panda-parley
//!
//! This crate contains the CLI definition, console rendering, progress
//! reporters, transcript export and the interactive session console.

pub mod cli;
pub mod output;
pub mod progress;
pub mod session;

// Re-export commonly used types
pub use cli::commands::{Cli, ExportFormat};
pub use output::console::{ConsolePrinter, ConsoleRenderer};
pub use output::export::TranscriptExporter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use session::{ReplCommand, SessionRepl};
