//! Session archive port
//!
//! Durable history of past sessions, keyed by session id.

use async_trait::async_trait;
use parley_domain::ArchivedSession;
use thiserror::Error;

/// Errors that can occur while reading or writing the archive
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Archived session not found: {0}")]
    NotFound(String),

    #[error("Archive I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt archive entry {id}: {message}")]
    Corrupt { id: String, message: String },

    #[error("Archive is disabled")]
    Disabled,
}

#[async_trait]
pub trait SessionArchive: Send + Sync {
    /// Insert or overwrite the entry with the same id
    async fn archive(&self, session: &ArchivedSession) -> Result<(), ArchiveError>;

    /// All archived sessions, newest first
    async fn list(&self) -> Result<Vec<ArchivedSession>, ArchiveError>;

    async fn load(&self, id: &str) -> Result<ArchivedSession, ArchiveError>;

    async fn delete(&self, id: &str) -> Result<(), ArchiveError>;
}

/// Archive that keeps nothing, for tests and `--no-archive` runs
pub struct NoSessionArchive;

#[async_trait]
impl SessionArchive for NoSessionArchive {
    async fn archive(&self, _session: &ArchivedSession) -> Result<(), ArchiveError> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ArchivedSession>, ArchiveError> {
        Ok(Vec::new())
    }

    async fn load(&self, id: &str) -> Result<ArchivedSession, ArchiveError> {
        Err(ArchiveError::NotFound(id.to_string()))
    }

    async fn delete(&self, _id: &str) -> Result<(), ArchiveError> {
        Ok(())
    }
}
