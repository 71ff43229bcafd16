//! Configuration file loading for panda-parley
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `PARLEY_<SECTION>__<KEY>` (e.g. `PARLEY_PROVIDER__KIND=openrouter`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./parley.toml` or `./.parley.toml`
//! 4. Global: `~/.config/panda-parley/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileArchiveConfig, FileConfig, FileDiscussionConfig,
    FileLoggingConfig, FilePersona, FilePersonasConfig, FileProviderConfig, FileProviderEntry,
};
pub use loader::ConfigLoader;
