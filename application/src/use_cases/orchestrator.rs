//! Turn orchestrator
//!
//! Drives one discussion session: picks the next speaker, builds the request,
//! calls the model, recovers once from oversized requests, and commits the
//! outcome back to the session store.
//!
//! # Single flight
//!
//! At most one turn runs at a time. The guard is a compare-and-set flag
//! released on every exit path (including a dropped future), so overlapping
//! `advance` calls are dropped, never queued.
//!
//! # Stale responses
//!
//! Model calls cannot be cancelled. Every commit carries the [`Generation`]
//! observed when the turn started; if the store was reset or reloaded in the
//! meantime the commit is refused and the turn reports
//! [`TurnOutcome::Discarded`].

use crate::config::DiscussionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::model_client::{CompletionRequest, ModelClient, ModelError};
use crate::ports::session_archive::{ArchiveError, NoSessionArchive, SessionArchive};
use crate::ports::session_store::{SessionStore, StoreError};
use crate::ports::turn_observer::{NoTurnObserver, TurnObserver};
use crate::use_cases::recovery::{FailureClass, classify};
use parley_domain::{
    ArchivedSession, Cast, Conclusion, Generation, Message, MessageId, NewMessage, PromptTemplate,
    ProviderKind, SessionEvent, SessionState, SessionStatus, Speaker, detect_conclusion,
    estimate_tokens, find_pending, format_transcript, preview, trim,
};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a turn ended without producing or failing anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another turn is still waiting for the model
    InFlight,
    /// The session is not in a status that allows this turn
    InvalidState(SessionStatus),
    /// Humans and engine notices never speak through the model
    NotAnAgent(Speaker),
}

/// Errors that end a turn and move the session to `error`
#[derive(Error, Debug)]
pub enum TurnError {
    #[error("API Key missing for {}", .0.display_name())]
    Configuration(ProviderKind),

    #[error("{source}")]
    TerminalTransport {
        source: ModelError,
        recovery_attempted: bool,
    },

    #[error("Session store error: {0}")]
    Store(#[from] StoreError),
}

/// Result of one orchestrator invocation
#[derive(Debug)]
pub enum TurnOutcome {
    Skipped(SkipReason),
    Spoke {
        message: Message,
        concluded: bool,
        recovered: bool,
    },
    Failed(TurnError),
    /// The session was replaced while the model was answering
    Discarded,
}

impl TurnOutcome {
    pub fn is_spoke(&self) -> bool {
        matches!(self, TurnOutcome::Spoke { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TurnOutcome::Failed(_))
    }

    /// The appended message, if the turn produced one
    pub fn message(&self) -> Option<&Message> {
        match self {
            TurnOutcome::Spoke { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Releases the single-flight flag when dropped
struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Whisper selected for a facilitator turn
struct PendingWhisper {
    id: MessageId,
    content: String,
}

/// Orchestrates the turns of the active session
pub struct TurnOrchestrator<C: ModelClient + 'static, S: SessionStore + 'static> {
    client: Arc<C>,
    store: Arc<S>,
    archive: Arc<dyn SessionArchive>,
    observer: Arc<dyn TurnObserver>,
    logger: Arc<dyn ConversationLogger>,
    params: DiscussionParams,
    in_flight: AtomicBool,
}

impl<C: ModelClient + 'static, S: SessionStore + 'static> TurnOrchestrator<C, S> {
    pub fn new(client: Arc<C>, store: Arc<S>) -> Self {
        Self {
            client,
            store,
            archive: Arc::new(NoSessionArchive),
            observer: Arc::new(NoTurnObserver),
            logger: Arc::new(NoConversationLogger),
            params: DiscussionParams::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_archive(mut self, archive: Arc<dyn SessionArchive>) -> Self {
        self.archive = archive;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn TurnObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_params(mut self, params: DiscussionParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &DiscussionParams {
        &self.params
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    // ==================== Lifecycle Controls ====================

    /// Leave `idle`, reset the turn counter and run the opening facilitator turn
    pub async fn start(&self) -> Result<TurnOutcome, StoreError> {
        let generation = self.store.snapshot().generation();
        self.transition(generation, SessionEvent::Start)?;
        info!("Discussion started");

        let outcome = self.advance().await;
        if let TurnOutcome::Skipped(SkipReason::InFlight) = outcome {
            // the pending reply belongs to the previous session and is discarded
            warn!("Opening turn deferred: a previous turn is still in flight");
        }
        Ok(outcome)
    }

    pub fn pause(&self) -> Result<SessionStatus, StoreError> {
        let generation = self.store.snapshot().generation();
        self.transition(generation, SessionEvent::Pause)
    }

    /// Continue after a pause, or retry after an error
    pub fn resume(&self) -> Result<SessionStatus, StoreError> {
        let generation = self.store.snapshot().generation();
        self.transition(generation, SessionEvent::Resume)
    }

    /// Append a private steering note for the facilitator.
    ///
    /// A paused session resumes so the facilitator can react. Whispers sent
    /// to an idle, failed or finished session are kept but change nothing.
    pub fn submit_whisper(&self, text: &str) -> Result<Message, StoreError> {
        let session = self.store.snapshot();
        let generation = session.generation();

        let message = self
            .store
            .append_message(generation, NewMessage::whisper(text.trim()))?;
        debug!("Whisper {} queued: {}", message.id(), preview(text, 60));
        self.logger.log(ConversationEvent::new(
            "whisper",
            json!({
                "id": message.id().value(),
                "content": message.content(),
            }),
        ));
        self.observer
            .on_message(&message, session.cast().display_name(Speaker::Human));

        if session
            .status()
            .on(SessionEvent::WhisperSubmitted)
            .is_some()
        {
            self.transition(generation, SessionEvent::WhisperSubmitted)?;
        }
        Ok(message)
    }

    /// Ask the facilitator for a closing summary; the session completes afterwards
    pub async fn conclude(&self) -> TurnOutcome {
        let Some(_guard) = FlightGuard::acquire(&self.in_flight) else {
            debug!("Conclude dropped: a turn is in flight");
            return TurnOutcome::Skipped(SkipReason::InFlight);
        };

        if let Some(rejected) = self.request_end() {
            return rejected;
        }
        self.run_turn(Speaker::Facilitator, true).await
    }

    /// Run the next round-robin turn if the session is debating.
    ///
    /// No-op while another turn is in flight or when the status is anything
    /// but `debating`.
    pub async fn advance(&self) -> TurnOutcome {
        let Some(_guard) = FlightGuard::acquire(&self.in_flight) else {
            debug!("Advance dropped: a turn is in flight");
            return TurnOutcome::Skipped(SkipReason::InFlight);
        };

        let session = self.store.snapshot();
        if session.status() != SessionStatus::Debating {
            return TurnOutcome::Skipped(SkipReason::InvalidState(session.status()));
        }

        let speaker = Speaker::next_turn(session.transcript());
        self.run_turn(speaker, false).await
    }

    /// Run a single turn for `speaker` regardless of the round-robin order.
    ///
    /// A regular turn leaves the lifecycle to the caller. A closing turn is
    /// always spoken by the facilitator and goes through the same end request
    /// as [`conclude`](Self::conclude), so it is skipped in a status that
    /// cannot be wrapped up.
    pub async fn process_turn(&self, speaker: Speaker, is_closing: bool) -> TurnOutcome {
        let Some(_guard) = FlightGuard::acquire(&self.in_flight) else {
            return TurnOutcome::Skipped(SkipReason::InFlight);
        };
        if !is_closing {
            return self.run_turn(speaker, false).await;
        }
        if let Some(rejected) = self.request_end() {
            return rejected;
        }
        self.run_turn(Speaker::Facilitator, true).await
    }

    /// Move the session back to `debating` for its closing turn.
    ///
    /// Returns the outcome to report when the session cannot be concluded.
    /// Must be called with the flight guard held.
    fn request_end(&self) -> Option<TurnOutcome> {
        let session = self.store.snapshot();
        if session.status().on(SessionEvent::EndRequested).is_none() {
            return Some(TurnOutcome::Skipped(SkipReason::InvalidState(
                session.status(),
            )));
        }
        if let Err(e) = self.transition(session.generation(), SessionEvent::EndRequested) {
            return Some(TurnOutcome::Failed(e.into()));
        }
        info!("Closing turn requested");
        None
    }

    /// Swap the personas between turns; a turn already in flight keeps its own
    pub fn update_cast(&self, cast: Cast) -> Result<(), StoreError> {
        let generation = self.store.snapshot().generation();
        self.store.update_cast(generation, cast)?;
        debug!("Cast updated");
        Ok(())
    }

    // ==================== Turn Execution ====================

    async fn run_turn(&self, speaker: Speaker, is_closing: bool) -> TurnOutcome {
        if !speaker.is_agent() {
            return TurnOutcome::Skipped(SkipReason::NotAnAgent(speaker));
        }

        // Snapshot everything the turn needs; later edits do not affect it.
        let session = self.store.snapshot();
        let provider = self.store.provider();
        let generation = session.generation();

        let turn_count = match self.store.begin_turn(generation) {
            Ok(count) => count,
            Err(e) => return self.store_failure(speaker, e),
        };

        info!("Turn {} ({}) started", turn_count, speaker);
        self.observer.on_turn_start(speaker, turn_count);
        self.logger.log(ConversationEvent::new(
            "turn_start",
            json!({
                "speaker": speaker.as_str(),
                "turn": turn_count,
                "closing": is_closing,
            }),
        ));

        if !provider.has_credentials() {
            warn!("No API key configured for {}", provider.kind);
            let notice = format!(
                "System: API Key missing for {}. Please configure it in settings.",
                provider.kind.display_name()
            );
            return self.fail_turn(
                generation,
                speaker,
                notice,
                TurnError::Configuration(provider.kind),
            );
        }

        let mut instructions = PromptTemplate::instructions_for(&session, speaker, turn_count);

        let whisper = if speaker == Speaker::Facilitator {
            find_pending(session.transcript()).map(|m| PendingWhisper {
                id: m.id(),
                content: m.content().to_string(),
            })
        } else {
            None
        };
        if let Some(whisper) = &whisper {
            debug!("Facilitator acts on whisper {}", whisper.id);
            instructions.push_str(&PromptTemplate::whisper_directive(&whisper.content));
        }
        if is_closing {
            instructions.push_str(PromptTemplate::closing_directive());
        }

        let history = format_transcript(trim(session.transcript(), self.params.context_budget));
        let request = CompletionRequest::new(
            provider,
            instructions,
            PromptTemplate::turn_prompt(&history, speaker),
        );

        let (raw, recovered) = match self.complete(speaker, &request).await {
            Ok(raw) => (raw, false),
            Err(error) => match classify(&error) {
                FailureClass::Recoverable => {
                    match self.recover(&session, speaker, &request, error).await {
                        Ok(raw) => (raw, true),
                        Err(source) => {
                            return self.fail_transport(generation, speaker, source, true);
                        }
                    }
                }
                FailureClass::Terminal => {
                    return self.fail_transport(generation, speaker, error, false);
                }
            },
        };

        self.commit(generation, &session, speaker, raw, whisper, is_closing, recovered)
            .await
    }

    /// Send one request, bounded by the configured timeout
    async fn complete(
        &self,
        speaker: Speaker,
        request: &CompletionRequest,
    ) -> Result<String, ModelError> {
        self.logger.log(ConversationEvent::new(
            "model_request",
            json!({
                "speaker": speaker.as_str(),
                "provider": request.provider.kind.as_str(),
                "model": request.provider.effective_model(),
                "context_tokens": estimate_tokens(&request.context),
            }),
        ));

        let result = match self.params.request_timeout {
            Some(limit) => tokio::time::timeout(limit, self.client.complete(request))
                .await
                .unwrap_or(Err(ModelError::Timeout)),
            None => self.client.complete(request).await,
        };

        if let Ok(raw) = &result {
            self.logger.log(ConversationEvent::new(
                "model_response",
                json!({
                    "speaker": speaker.as_str(),
                    "chars": raw.chars().count(),
                }),
            ));
        }
        result
    }

    /// The single recovery attempt: same instructions, much smaller history
    async fn recover(
        &self,
        session: &SessionState,
        speaker: Speaker,
        request: &CompletionRequest,
        error: ModelError,
    ) -> Result<String, ModelError> {
        warn!(
            "Request for {} rejected as oversized ({}), retrying with reduced context",
            speaker, error
        );
        self.observer.on_recovery_attempt(speaker);
        self.logger.log(ConversationEvent::new(
            "recovery_attempt",
            json!({
                "speaker": speaker.as_str(),
                "error": error.to_string(),
                "budget": self.params.recovery_budget.max_tokens(),
            }),
        ));

        let history = format_transcript(trim(session.transcript(), self.params.recovery_budget));
        let retry = request.with_context(PromptTemplate::recovery_prompt(&history, speaker));
        self.complete(speaker, &retry).await
    }

    /// Append the utterance, consume the whisper and settle the status
    #[allow(clippy::too_many_arguments)]
    async fn commit(
        &self,
        generation: Generation,
        session: &SessionState,
        speaker: Speaker,
        raw: String,
        whisper: Option<PendingWhisper>,
        is_closing: bool,
        recovered: bool,
    ) -> TurnOutcome {
        let Conclusion { content, concluded } = if speaker == Speaker::Facilitator {
            detect_conclusion(&raw)
        } else {
            Conclusion {
                content: raw.trim().to_string(),
                concluded: false,
            }
        };

        let message = match self
            .store
            .append_message(generation, NewMessage::utterance(speaker, content))
        {
            Ok(message) => message,
            Err(e) => return self.store_failure(speaker, e),
        };
        self.logger.log(ConversationEvent::new(
            "utterance",
            json!({
                "id": message.id().value(),
                "speaker": speaker.as_str(),
                "content": message.content(),
                "concluded": concluded,
                "recovered": recovered,
            }),
        ));
        self.observer
            .on_message(&message, session.cast().display_name(speaker));

        if let Some(whisper) = whisper {
            if let Err(e) = self.store.mark_handled(generation, whisper.id) {
                return self.store_failure(speaker, e);
            }
            self.logger.log(ConversationEvent::new(
                "whisper_handled",
                json!({ "id": whisper.id.value() }),
            ));
        }

        let finished = is_closing || concluded;
        if finished {
            if let Err(e) = self.transition(generation, SessionEvent::Concluded) {
                return self.store_failure(speaker, e);
            }
            info!("Discussion concluded after turn {}", message.id());
            self.archive_snapshot().await;
        }

        self.observer.on_turn_end(speaker, true);
        TurnOutcome::Spoke {
            message,
            concluded: finished,
            recovered,
        }
    }

    fn fail_transport(
        &self,
        generation: Generation,
        speaker: Speaker,
        source: ModelError,
        recovery_attempted: bool,
    ) -> TurnOutcome {
        warn!("Turn for {} failed: {}", speaker, source);
        let notice = format!("System Error: {}. Use \"Start Over\" if stuck.", source);
        self.fail_turn(
            generation,
            speaker,
            notice,
            TurnError::TerminalTransport {
                source,
                recovery_attempted,
            },
        )
    }

    /// Append a visible notice and move the session to `error`
    fn fail_turn(
        &self,
        generation: Generation,
        speaker: Speaker,
        notice: String,
        error: TurnError,
    ) -> TurnOutcome {
        self.logger.log(ConversationEvent::new(
            "turn_failed",
            json!({
                "speaker": speaker.as_str(),
                "error": error.to_string(),
            }),
        ));

        let appended = self
            .store
            .append_message(generation, NewMessage::notice(notice))
            .and_then(|message| {
                self.observer.on_message(&message, "System");
                self.transition(generation, SessionEvent::Failed)
            });
        if let Err(e) = appended {
            return self.store_failure(speaker, e);
        }

        self.observer.on_turn_end(speaker, false);
        TurnOutcome::Failed(error)
    }

    fn store_failure(&self, speaker: Speaker, error: StoreError) -> TurnOutcome {
        self.observer.on_turn_end(speaker, false);
        if error.is_stale() {
            info!("Dropping response for {}: {}", speaker, error);
            self.observer.on_turn_discarded(speaker);
            TurnOutcome::Discarded
        } else {
            warn!("Session store rejected turn for {}: {}", speaker, error);
            TurnOutcome::Failed(TurnError::Store(error))
        }
    }

    fn transition(
        &self,
        generation: Generation,
        event: SessionEvent,
    ) -> Result<SessionStatus, StoreError> {
        let status = self.store.apply(generation, event)?;
        debug!("{:?} -> {}", event, status);
        self.logger.log(ConversationEvent::new(
            "status_change",
            json!({
                "event": format!("{:?}", event),
                "status": status.as_str(),
            }),
        ));
        self.observer.on_status_change(status);
        Ok(status)
    }

    // ==================== Session History ====================

    /// Store the active session in the archive. Failures only warn.
    async fn archive_snapshot(&self) {
        if let Err(e) = self.archive_current().await {
            warn!("Failed to archive session: {}", e);
        }
    }

    /// Store (or overwrite) the active session in the archive
    pub async fn archive_current(&self) -> Result<ArchivedSession, ArchiveError> {
        let archived = ArchivedSession::capture(&self.store.snapshot());
        self.archive.archive(&archived).await?;
        debug!("Archived session {}", archived.id);
        Ok(archived)
    }

    /// Archived sessions, newest first
    pub async fn history(&self) -> Result<Vec<ArchivedSession>, ArchiveError> {
        self.archive.list().await
    }

    pub async fn delete_archived(&self, id: &str) -> Result<(), ArchiveError> {
        self.archive.delete(id).await
    }

    /// Reopen an archived session as the active one, `paused`.
    ///
    /// Any response still in flight for the previous session is discarded.
    pub async fn load_archived(&self, id: &str) -> Result<Generation, ArchiveError> {
        let archived = self.archive.load(id).await?;
        let generation = self.store.replace(SessionState::from_archive(&archived));
        info!("Loaded archived session {} as {}", id, generation);
        self.observer.on_status_change(SessionStatus::Paused);
        Ok(generation)
    }

    /// Discard the active session in favor of `fresh`.
    ///
    /// A session with any messages is archived first.
    pub async fn start_over(&self, fresh: SessionState) -> Generation {
        let current = self.store.snapshot();
        if let Err(e) = self.transition(current.generation(), SessionEvent::StartOver) {
            warn!("Start over on {}: {}", current.generation(), e);
        }
        if !current.transcript().is_empty() {
            self.archive_snapshot().await;
        }

        let generation = self.store.replace(fresh);
        info!("Session reset ({})", generation);
        self.observer.on_status_change(SessionStatus::Idle);
        generation
    }
}
