//! REPL (Read-Eval-Print Loop) for a live discussion

use crate::output::console::ConsoleRenderer;
use crate::session::command::ReplCommand;
use colored::Colorize;
use parley_application::{
    AutoPlayDriver, ModelClient, SessionStore, SkipReason, TurnOrchestrator, TurnOutcome,
};
use parley_domain::{SessionState, SessionStatus};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// What the loop should do after a command
enum Flow {
    Continue,
    Quit,
}

/// Interactive console around one orchestrator
pub struct SessionRepl<C: ModelClient + 'static, S: SessionStore + 'static> {
    orchestrator: Arc<TurnOrchestrator<C, S>>,
    auto_play: bool,
    archive_on_exit: bool,
}

impl<C: ModelClient + 'static, S: SessionStore + 'static> SessionRepl<C, S> {
    pub fn new(orchestrator: Arc<TurnOrchestrator<C, S>>) -> Self {
        Self {
            orchestrator,
            auto_play: true,
            archive_on_exit: true,
        }
    }

    /// Set whether turns advance on their own while debating
    pub fn with_auto_play(mut self, enabled: bool) -> Self {
        self.auto_play = enabled;
        self
    }

    /// Set whether a non-empty session is archived when the console closes
    pub fn with_archive_on_exit(mut self, enabled: bool) -> Self {
        self.archive_on_exit = enabled;
        self
    }

    /// Run the console on stdin until `/quit`, Ctrl-C or end of input
    pub async fn run(&self) {
        self.run_with(BufReader::new(tokio::io::stdin())).await
    }

    /// Run the console on any line-based input
    pub async fn run_with<R: AsyncBufRead + Unpin>(&self, input: R) {
        self.print_welcome();

        let cancel = CancellationToken::new();
        let driver = self.auto_play.then(|| {
            AutoPlayDriver::new(Arc::clone(&self.orchestrator)).spawn(cancel.child_token())
        });

        let mut turns = JoinSet::new();
        let mut lines = input.lines();
        let mut interrupted = false;

        loop {
            let line = tokio::select! {
                line = lines.next_line() => line,
                _ = tokio::signal::ctrl_c() => {
                    println!("^C");
                    interrupted = true;
                    break;
                }
            };

            let line = match line {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    break;
                }
            };

            if let Flow::Quit = self.handle(ReplCommand::parse(&line), &mut turns).await {
                interrupted = true;
                break;
            }

            // reap finished turns so the set does not grow
            while turns.try_join_next().is_some() {}
        }

        if interrupted {
            turns.abort_all();
        }
        while turns.join_next().await.is_some() {}

        cancel.cancel();
        if let Some(handle) = driver
            && let Err(e) = handle.await
        {
            debug!("Auto-play task ended abnormally: {}", e);
        }

        if self.archive_on_exit {
            self.archive_if_started().await;
        }
        println!("Bye!");
    }

    fn print_welcome(&self) {
        let session = self.orchestrator.store().snapshot();
        println!();
        print!("{}", ConsoleRenderer::format_session(&session));
        println!("{}", ConsoleRenderer::format_status(session.status()));
        println!();
        println!("{}", ReplCommand::help());
        println!();
    }

    async fn handle(&self, command: ReplCommand, turns: &mut JoinSet<()>) -> Flow {
        match command {
            ReplCommand::Empty => {}
            ReplCommand::Whisper(text) => {
                if let Err(e) = self.orchestrator.submit_whisper(&text) {
                    eprintln!("{} {}", "Error:".red(), e);
                }
            }
            ReplCommand::Start => {
                let orchestrator = Arc::clone(&self.orchestrator);
                turns.spawn(async move {
                    match orchestrator.start().await {
                        Ok(outcome) => Self::report(outcome),
                        Err(e) => eprintln!("{} {}", "Cannot start:".red(), e),
                    }
                });
            }
            ReplCommand::Next => {
                let orchestrator = Arc::clone(&self.orchestrator);
                turns.spawn(async move { Self::report(orchestrator.advance().await) });
            }
            ReplCommand::End => {
                let orchestrator = Arc::clone(&self.orchestrator);
                turns.spawn(async move { Self::report(orchestrator.conclude().await) });
            }
            ReplCommand::Pause => {
                if let Err(e) = self.orchestrator.pause() {
                    eprintln!("{} {}", "Cannot pause:".red(), e);
                }
            }
            ReplCommand::Resume => {
                if let Err(e) = self.orchestrator.resume() {
                    eprintln!("{} {}", "Cannot resume:".red(), e);
                }
            }
            ReplCommand::Status => {
                let session = self.orchestrator.store().snapshot();
                println!(
                    "{} turn {}, {} messages{}",
                    ConsoleRenderer::format_status(session.status()),
                    session.turn_count(),
                    session.transcript().len(),
                    if self.orchestrator.is_in_flight() {
                        ", waiting for a reply"
                    } else {
                        ""
                    }
                );
            }
            ReplCommand::Archive => match self.orchestrator.archive_current().await {
                Ok(archived) => println!("{} {}", "Archived as".green(), archived.id),
                Err(e) => eprintln!("{} {}", "Archive failed:".red(), e),
            },
            ReplCommand::History => match self.orchestrator.history().await {
                Ok(sessions) => print!("{}", ConsoleRenderer::format_history(&sessions)),
                Err(e) => eprintln!("{} {}", "Cannot read history:".red(), e),
            },
            ReplCommand::Load(id) => {
                self.archive_if_started().await;
                match self.orchestrator.load_archived(&id).await {
                    Ok(_) => {
                        let session = self.orchestrator.store().snapshot();
                        print!("{}", ConsoleRenderer::format_session(&session));
                        println!("{}", "Loaded. Use /resume to continue.".dimmed());
                    }
                    Err(e) => eprintln!("{} {}", "Cannot load:".red(), e),
                }
            }
            ReplCommand::Delete(id) => match self.orchestrator.delete_archived(&id).await {
                Ok(()) => println!("{} {}", "Deleted".green(), id),
                Err(e) => eprintln!("{} {}", "Cannot delete:".red(), e),
            },
            ReplCommand::Reset => {
                let current = self.orchestrator.store().snapshot();
                let fresh = SessionState::new(
                    current.topic(),
                    current.language(),
                    current.cast().clone(),
                );
                self.orchestrator.start_over(fresh).await;
                println!("{}", "Started over. Use /start to begin.".dimmed());
            }
            ReplCommand::Help => println!("{}", ReplCommand::help()),
            ReplCommand::Quit => return Flow::Quit,
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
            ReplCommand::MissingArgument(name) => {
                println!("Usage: /{} <id>", name);
            }
        }
        Flow::Continue
    }

    /// Print what the user needs to know about a turn they triggered
    fn report(outcome: TurnOutcome) {
        match outcome {
            TurnOutcome::Skipped(SkipReason::InFlight) => {
                println!(
                    "{}",
                    "A reply is still on its way. Use /next once it has landed.".dimmed()
                );
            }
            TurnOutcome::Skipped(SkipReason::InvalidState(status)) => {
                let hint = match status {
                    SessionStatus::Idle => "Use /start first.",
                    SessionStatus::Paused | SessionStatus::Error => "Use /resume first.",
                    SessionStatus::Completed => "The session is over. Use /reset to start over.",
                    SessionStatus::Debating => "",
                };
                println!(
                    "{} {}",
                    ConsoleRenderer::format_status(status),
                    hint.dimmed()
                );
            }
            TurnOutcome::Skipped(reason) => debug!("Turn skipped: {:?}", reason),
            TurnOutcome::Spoke {
                concluded: true, ..
            } => {
                println!("{}", "The discussion has concluded.".cyan().bold());
            }
            TurnOutcome::Spoke { .. } => {}
            TurnOutcome::Failed(e) => debug!("Turn failed: {}", e),
            TurnOutcome::Discarded => debug!("Turn discarded"),
        }
    }

    /// Archive the current session unless nothing was said yet
    async fn archive_if_started(&self) {
        if self.orchestrator.store().snapshot().transcript().is_empty() {
            return;
        }
        match self.orchestrator.archive_current().await {
            Ok(archived) => debug!("Archived session {} on exit", archived.id),
            Err(e) => warn!("Failed to archive session: {}", e),
        }
    }
}
