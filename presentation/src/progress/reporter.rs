//! Progress reporting for discussion turns

use crate::output::console::ConsolePrinter;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use parley_application::TurnObserver;
use parley_domain::{Message, SessionStatus, Speaker};
use std::sync::Mutex;
use std::time::Duration;

/// Shows a spinner while a model is thinking and prints lines as they land
pub struct ProgressReporter {
    printer: ConsolePrinter,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            printer: ConsolePrinter,
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn speaker_display_name(speaker: Speaker) -> &'static str {
        match speaker {
            Speaker::Facilitator => "Facilitator",
            Speaker::ExpertA => "Expert A",
            Speaker::ExpertB => "Expert B",
            Speaker::Human => "You",
            Speaker::System => "System",
        }
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        let guard = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pb) = guard.as_ref() {
            f(pb);
        }
    }

    /// Run `print` without the spinner drawing over it
    fn print_above(&self, print: impl FnOnce()) {
        let guard = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(pb) => pb.suspend(print),
            None => print(),
        }
    }

    fn clear(&self) {
        let taken = self
            .spinner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(pb) = taken {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnObserver for ProgressReporter {
    fn on_turn_start(&self, speaker: Speaker, turn_count: u32) {
        self.clear();

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("Turn {}", turn_count));
        pb.set_message(format!(
            "{} is thinking...",
            Self::speaker_display_name(speaker)
        ));
        pb.enable_steady_tick(Duration::from_millis(120));

        *self.spinner.lock().unwrap_or_else(|e| e.into_inner()) = Some(pb);
    }

    fn on_recovery_attempt(&self, speaker: Speaker) {
        self.with_spinner(|pb| {
            pb.set_message(format!(
                "{} {} is retrying with a shorter history...",
                "!".yellow(),
                Self::speaker_display_name(speaker)
            ));
        });
    }

    fn on_message(&self, message: &Message, display_name: &str) {
        self.print_above(|| self.printer.on_message(message, display_name));
    }

    fn on_status_change(&self, status: SessionStatus) {
        self.print_above(|| self.printer.on_status_change(status));
    }

    fn on_turn_discarded(&self, speaker: Speaker) {
        self.clear();
        self.printer.on_turn_discarded(speaker);
    }

    fn on_turn_end(&self, _speaker: Speaker, _success: bool) {
        self.clear();
    }
}

/// Simple text-based progress (no spinner)
pub struct SimpleProgress;

impl TurnObserver for SimpleProgress {
    fn on_turn_start(&self, speaker: Speaker, turn_count: u32) {
        println!(
            "{} {} {}",
            "->".cyan(),
            format!("Turn {}:", turn_count).bold(),
            ProgressReporter::speaker_display_name(speaker)
        );
    }

    fn on_recovery_attempt(&self, speaker: Speaker) {
        ConsolePrinter.on_recovery_attempt(speaker);
    }

    fn on_message(&self, message: &Message, display_name: &str) {
        ConsolePrinter.on_message(message, display_name);
    }

    fn on_status_change(&self, status: SessionStatus) {
        ConsolePrinter.on_status_change(status);
    }

    fn on_turn_discarded(&self, speaker: Speaker) {
        ConsolePrinter.on_turn_discarded(speaker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_lifecycle() {
        let reporter = ProgressReporter::new();
        reporter.on_turn_start(Speaker::ExpertB, 4);
        assert!(reporter.spinner.lock().unwrap().is_some());

        reporter.on_recovery_attempt(Speaker::ExpertB);
        reporter.on_turn_end(Speaker::ExpertB, true);
        assert!(reporter.spinner.lock().unwrap().is_none());
    }

    #[test]
    fn test_new_turn_replaces_spinner() {
        let reporter = ProgressReporter::new();
        reporter.on_turn_start(Speaker::Facilitator, 1);
        reporter.on_turn_start(Speaker::ExpertA, 2);
        reporter.on_turn_discarded(Speaker::ExpertA);
        assert!(reporter.spinner.lock().unwrap().is_none());
    }
}
