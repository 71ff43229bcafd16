//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving every discussion event.
    pub conversation_log: Option<PathBuf>,
    /// File receiving diagnostic (tracing) output in addition to stderr.
    pub file: Option<PathBuf>,
}
