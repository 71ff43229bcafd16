//! Auto-play driver
//!
//! Calls [`TurnOrchestrator::advance`] on a fixed cadence while the session
//! is debating. Each advance is awaited before the next tick is taken, so the
//! driver never overlaps its own turns.

use crate::ports::model_client::ModelClient;
use crate::ports::session_store::SessionStore;
use crate::use_cases::orchestrator::{TurnOrchestrator, TurnOutcome};
use parley_domain::SessionStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub struct AutoPlayDriver<C: ModelClient + 'static, S: SessionStore + 'static> {
    orchestrator: Arc<TurnOrchestrator<C, S>>,
    interval: Duration,
}

impl<C: ModelClient + 'static, S: SessionStore + 'static> AutoPlayDriver<C, S> {
    pub fn new(orchestrator: Arc<TurnOrchestrator<C, S>>) -> Self {
        let interval = orchestrator.params().autoplay_interval;
        Self {
            orchestrator,
            interval,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run until `cancel` fires.
    ///
    /// Ticks while the session is not debating are skipped, so a paused or
    /// failed session picks up again as soon as it is resumed.
    pub async fn run(&self, cancel: CancellationToken) {
        info!("Auto-play every {}ms", self.interval.as_millis());
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if self.orchestrator.store().snapshot().status() != SessionStatus::Debating {
                continue;
            }

            match self.orchestrator.advance().await {
                TurnOutcome::Spoke { concluded: true, .. } => {
                    info!("Session concluded, auto-play idles");
                }
                TurnOutcome::Skipped(reason) => debug!("Tick skipped: {:?}", reason),
                _ => {}
            }
        }
        debug!("Auto-play stopped");
    }

    /// Run on a background task
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{MockClient, TestStore};
    use parley_domain::{Cast, Language, SessionEvent, SessionState};

    fn driver(
        responses: usize,
        state: SessionState,
    ) -> (AutoPlayDriver<MockClient, TestStore>, Arc<TurnOrchestrator<MockClient, TestStore>>, Arc<MockClient>) {
        let client = Arc::new(MockClient::new(
            (0..responses).map(|i| Ok(format!("line {}", i))).collect(),
        ));
        let store = Arc::new(TestStore::new(state));
        let orchestrator = Arc::new(TurnOrchestrator::new(Arc::clone(&client), store));
        (AutoPlayDriver::new(Arc::clone(&orchestrator)), orchestrator, client)
    }

    fn debating() -> SessionState {
        let mut state = SessionState::new("Remote work", Language::English, Cast::default());
        state.apply(SessionEvent::Start).unwrap();
        state
    }

    #[tokio::test(start_paused = true)]
    async fn test_advances_on_cadence() {
        let (driver, orchestrator, client) = driver(10, debating());
        let cancel = CancellationToken::new();
        let handle = driver.spawn(cancel.clone());

        tokio::time::sleep(Duration::from_millis(6_500)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(client.call_count(), 3);
        let speakers: Vec<_> = orchestrator
            .store()
            .snapshot()
            .transcript()
            .iter()
            .map(|m| m.speaker().as_str().to_string())
            .collect();
        assert_eq!(speakers, ["facilitator", "expert_a", "expert_b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_session_waits_for_resume() {
        let mut state = debating();
        state.apply(SessionEvent::Pause).unwrap();
        let (driver, orchestrator, client) = driver(10, state);
        let cancel = CancellationToken::new();
        let handle = driver
            .with_interval(Duration::from_millis(500))
            .spawn(cancel.clone());

        tokio::time::sleep(Duration::from_millis(2_200)).await;
        assert_eq!(client.call_count(), 0);

        orchestrator.resume().unwrap();
        tokio::time::sleep(Duration::from_millis(1_100)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_immediately() {
        let (driver, _orchestrator, client) = driver(10, debating());
        let cancel = CancellationToken::new();
        let handle = driver.spawn(cancel.clone());

        cancel.cancel();
        handle.await.unwrap();
        assert_eq!(client.call_count(), 0);
    }
}
