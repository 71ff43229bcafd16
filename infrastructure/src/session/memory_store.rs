//! Process-local session store.
//!
//! Holds exactly one session behind a mutex. Nothing survives a restart;
//! durable copies go through the session archive.

use parley_application::ports::session_store::{SessionStore, StoreError};
use parley_domain::{
    Cast, Generation, Message, MessageId, NewMessage, ProviderSettings, SessionEvent,
    SessionState, SessionStatus,
};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

struct Inner {
    session: SessionState,
    provider: ProviderSettings,
}

pub struct InMemorySessionStore {
    inner: Mutex<Inner>,
}

impl InMemorySessionStore {
    pub fn new(session: SessionState, provider: ProviderSettings) -> Self {
        Self {
            inner: Mutex::new(Inner { session, provider }),
        }
    }

    /// A panic while holding the lock leaves whole values behind, so the
    /// data is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` against the session if `generation` is still current
    fn with_session<T>(
        &self,
        generation: Generation,
        f: impl FnOnce(&mut SessionState) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut inner = self.lock();
        let actual = inner.session.generation();
        if actual != generation {
            debug!("Rejected write for {} (current {})", generation, actual);
            return Err(StoreError::StaleGeneration {
                expected: generation,
                actual,
            });
        }
        f(&mut inner.session)
    }
}

impl SessionStore for InMemorySessionStore {
    fn snapshot(&self) -> SessionState {
        self.lock().session.clone()
    }

    fn provider(&self) -> ProviderSettings {
        self.lock().provider.clone()
    }

    fn set_provider(&self, settings: ProviderSettings) {
        self.lock().provider = settings;
    }

    fn begin_turn(&self, generation: Generation) -> Result<u32, StoreError> {
        self.with_session(generation, |s| Ok(s.begin_turn()))
    }

    fn append_message(
        &self,
        generation: Generation,
        message: NewMessage,
    ) -> Result<Message, StoreError> {
        self.with_session(generation, |s| Ok(s.append(message)))
    }

    fn mark_handled(&self, generation: Generation, id: MessageId) -> Result<(), StoreError> {
        self.with_session(generation, |s| Ok(s.mark_handled(id)?))
    }

    fn apply(
        &self,
        generation: Generation,
        event: SessionEvent,
    ) -> Result<SessionStatus, StoreError> {
        self.with_session(generation, |s| Ok(s.apply(event)?))
    }

    fn update_cast(&self, generation: Generation, cast: Cast) -> Result<(), StoreError> {
        self.with_session(generation, |s| {
            s.set_cast(cast);
            Ok(())
        })
    }

    fn replace(&self, state: SessionState) -> Generation {
        let mut inner = self.lock();
        let generation = inner.session.generation().next();
        inner.session = state.with_generation(generation);
        generation
    }
}
