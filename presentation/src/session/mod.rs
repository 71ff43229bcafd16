//! Interactive session console
//!
//! Reads commands and whispers from a line-based input while auto-play
//! advances the discussion in the background.

mod command;
mod repl;

pub use command::ReplCommand;
pub use repl::SessionRepl;
