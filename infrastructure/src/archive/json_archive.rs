//! Session history as one pretty-printed JSON file per session.
//!
//! Layout: `<dir>/<session id>.json`. Archiving a session again overwrites
//! its file, so a reloaded session keeps a single history entry.

use async_trait::async_trait;
use parley_application::ports::session_archive::{ArchiveError, SessionArchive};
use parley_domain::ArchivedSession;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

pub struct JsonFileArchive {
    dir: PathBuf,
}

impl JsonFileArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<data dir>/panda-parley/sessions`
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("panda-parley").join("sessions"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Session ids become file names; anything but `[A-Za-z0-9_-]` is replaced.
    fn path_for(&self, id: &str) -> PathBuf {
        let name: String = id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }

    async fn read_entry(path: &Path) -> Result<ArchivedSession, ArchiveError> {
        let raw = fs::read_to_string(path).await?;
        serde_json::from_str(&raw).map_err(|e| ArchiveError::Corrupt {
            id: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl SessionArchive for JsonFileArchive {
    async fn archive(&self, session: &ArchivedSession) -> Result<(), ArchiveError> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(&session.id);
        let json = serde_json::to_string_pretty(session).map_err(|e| ArchiveError::Corrupt {
            id: session.id.clone(),
            message: e.to_string(),
        })?;

        // a crash mid-write leaves the previous file intact
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &path).await?;
        debug!("Archived session {} to {}", session.id, path.display());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ArchivedSession>, ArchiveError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut sessions = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_entry(&path).await {
                Ok(session) => sessions.push(session),
                Err(e) => warn!("Skipping archive entry {}: {}", path.display(), e),
            }
        }

        sessions.sort_by(|a, b| b.archived_at.cmp(&a.archived_at));
        Ok(sessions)
    }

    async fn load(&self, id: &str) -> Result<ArchivedSession, ArchiveError> {
        let path = self.path_for(id);
        match Self::read_entry(&path).await {
            Err(ArchiveError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ArchiveError::NotFound(id.to_string()))
            }
            other => other,
        }
    }

    async fn delete(&self, id: &str) -> Result<(), ArchiveError> {
        match fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ArchiveError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
