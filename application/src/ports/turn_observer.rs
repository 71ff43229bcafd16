//! Turn observer port
//!
//! Defines the interface for reporting turn progress to the user.

use parley_domain::{Message, SessionStatus, Speaker};

/// Callback for progress updates while the orchestrator runs turns.
///
/// Implementations live in the presentation layer (spinner, console
/// printer). All methods default to doing nothing.
pub trait TurnObserver: Send + Sync {
    /// Called before the model request of a turn is sent
    fn on_turn_start(&self, _speaker: Speaker, _turn_count: u32) {}

    /// Called when the first request failed and a smaller one is about to be sent
    fn on_recovery_attempt(&self, _speaker: Speaker) {}

    /// Called for every message appended to the transcript
    fn on_message(&self, _message: &Message, _display_name: &str) {}

    fn on_status_change(&self, _status: SessionStatus) {}

    /// Called when a response arrived for a session that is no longer current
    fn on_turn_discarded(&self, _speaker: Speaker) {}

    /// Called when the turn is over, whatever its outcome
    fn on_turn_end(&self, _speaker: Speaker, _success: bool) {}
}

/// No-op observer for when progress reporting is not needed
pub struct NoTurnObserver;

impl TurnObserver for NoTurnObserver {}
