//! Port definitions (interfaces for external systems)
//!
//! Ports define the boundaries between the application layer and
//! the outside world (model providers, storage, UI).

pub mod conversation_logger;
pub mod model_client;
pub mod session_archive;
pub mod session_store;
pub mod turn_observer;
