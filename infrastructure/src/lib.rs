//! Infrastructure layer for panda-parley
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod archive;
pub mod config;
pub mod logging;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use archive::JsonFileArchive;
pub use config::{
    ConfigLoader, ConfigValidationError, FileArchiveConfig, FileConfig, FileDiscussionConfig,
    FileLoggingConfig, FilePersonasConfig, FileProviderConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::{GeminiAdapter, OpenAiCompatAdapter, ProviderAdapter, RoutingModelClient};
pub use session::InMemorySessionStore;
