//! Test doubles shared by the use case tests

use crate::ports::model_client::{CompletionRequest, ModelClient, ModelError};
use crate::ports::session_archive::{ArchiveError, SessionArchive};
use crate::ports::session_store::{SessionStore, StoreError};
use async_trait::async_trait;
use parley_domain::{
    ArchivedSession, Cast, Generation, Message, MessageId, NewMessage, ProviderKind,
    ProviderSettings, SessionEvent, SessionState, SessionStatus,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

// ==================== Model Client ====================

/// Replays scripted responses and records every request.
///
/// `hold()` makes calls block until `release()`, to keep a turn in flight.
pub(crate) struct MockClient {
    responses: Mutex<VecDeque<Result<String, ModelError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    held: AtomicBool,
    called: Notify,
    gate: Notify,
}

impl MockClient {
    pub(crate) fn new(responses: Vec<Result<String, ModelError>>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(responses)),
            requests: Mutex::new(Vec::new()),
            held: AtomicBool::new(false),
            called: Notify::new(),
            gate: Notify::new(),
        }
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    pub(crate) fn release(&self) {
        self.held.store(false, Ordering::SeqCst);
        self.gate.notify_one();
    }

    pub(crate) async fn wait_until_called(&self) {
        if self.call_count() == 0 {
            self.called.notified().await;
        }
    }
}

#[async_trait]
impl ModelClient for MockClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError> {
        self.requests.lock().unwrap().push(request.clone());
        self.called.notify_one();
        if self.held.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Other("No more responses".to_string())))
    }
}

// ==================== Session Store ====================

pub(crate) struct TestStore {
    inner: Mutex<(SessionState, ProviderSettings)>,
}

impl TestStore {
    pub(crate) fn new(state: SessionState) -> Self {
        Self {
            inner: Mutex::new((state, ProviderSettings::new(ProviderKind::OpenAi))),
        }
    }

    fn with_current<T>(
        &self,
        generation: Generation,
        f: impl FnOnce(&mut SessionState) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let actual = inner.0.generation();
        if actual != generation {
            return Err(StoreError::StaleGeneration {
                expected: generation,
                actual,
            });
        }
        f(&mut inner.0)
    }
}

impl SessionStore for TestStore {
    fn snapshot(&self) -> SessionState {
        self.inner.lock().unwrap().0.clone()
    }

    fn provider(&self) -> ProviderSettings {
        self.inner.lock().unwrap().1.clone()
    }

    fn set_provider(&self, settings: ProviderSettings) {
        self.inner.lock().unwrap().1 = settings;
    }

    fn begin_turn(&self, generation: Generation) -> Result<u32, StoreError> {
        self.with_current(generation, |s| Ok(s.begin_turn()))
    }

    fn append_message(
        &self,
        generation: Generation,
        message: NewMessage,
    ) -> Result<Message, StoreError> {
        self.with_current(generation, |s| Ok(s.append(message)))
    }

    fn mark_handled(&self, generation: Generation, id: MessageId) -> Result<(), StoreError> {
        self.with_current(generation, |s| Ok(s.mark_handled(id)?))
    }

    fn apply(
        &self,
        generation: Generation,
        event: SessionEvent,
    ) -> Result<SessionStatus, StoreError> {
        self.with_current(generation, |s| Ok(s.apply(event)?))
    }

    fn update_cast(&self, generation: Generation, cast: Cast) -> Result<(), StoreError> {
        self.with_current(generation, |s| {
            s.set_cast(cast);
            Ok(())
        })
    }

    fn replace(&self, state: SessionState) -> Generation {
        let mut inner = self.inner.lock().unwrap();
        let generation = inner.0.generation().next();
        inner.0 = state.with_generation(generation);
        generation
    }
}

// ==================== Archive ====================

#[derive(Default)]
pub(crate) struct MemoryArchive {
    entries: Mutex<Vec<ArchivedSession>>,
}

impl MemoryArchive {
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionArchive for MemoryArchive {
    async fn archive(&self, session: &ArchivedSession) -> Result<(), ArchiveError> {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|e| e.id != session.id);
        entries.push(session.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ArchivedSession>, ArchiveError> {
        let mut entries = self.entries.lock().unwrap().clone();
        entries.sort_by(|a, b| b.archived_at.cmp(&a.archived_at));
        Ok(entries)
    }

    async fn load(&self, id: &str) -> Result<ArchivedSession, ArchiveError> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| ArchiveError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<(), ArchiveError> {
        self.entries.lock().unwrap().retain(|e| e.id != id);
        Ok(())
    }
}
