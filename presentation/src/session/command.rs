//! Parsing of interactive console input

/// One line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Start,
    Pause,
    Resume,
    /// Run the next turn now
    Next,
    /// Ask the facilitator for a closing summary
    End,
    Status,
    Archive,
    History,
    Load(String),
    Delete(String),
    /// Archive the current session and begin a fresh one on the same topic
    Reset,
    Help,
    Quit,
    /// Anything that is not a command goes privately to the facilitator
    Whisper(String),
    Empty,
    Unknown(String),
    /// A command that needs an argument was given none
    MissingArgument(&'static str),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        let Some(command) = line.strip_prefix('/') else {
            return ReplCommand::Whisper(line.to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name.to_lowercase().as_str() {
            "start" | "s" => ReplCommand::Start,
            "pause" | "p" => ReplCommand::Pause,
            "resume" | "r" => ReplCommand::Resume,
            "next" | "n" => ReplCommand::Next,
            "end" | "conclude" => ReplCommand::End,
            "status" => ReplCommand::Status,
            "archive" | "save" => ReplCommand::Archive,
            "history" => ReplCommand::History,
            "load" if arg.is_empty() => ReplCommand::MissingArgument("load"),
            "load" => ReplCommand::Load(arg.to_string()),
            "delete" if arg.is_empty() => ReplCommand::MissingArgument("delete"),
            "delete" => ReplCommand::Delete(arg.to_string()),
            "reset" => ReplCommand::Reset,
            "help" | "h" | "?" => ReplCommand::Help,
            "quit" | "exit" | "q" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(line.to_string()),
        }
    }

    pub fn help() -> &'static str {
        r#"Commands:
  /start            - Start the discussion
  /pause, /resume   - Pause or continue (resume also retries after an error)
  /next             - Run the next turn now
  /end              - Ask the facilitator to wrap up
  /status           - Show the session status
  /archive          - Save the session to history
  /history          - List archived sessions
  /load <id>        - Reopen an archived session (paused)
  /delete <id>      - Remove an archived session
  /reset            - Archive this session and start over on the same topic
  /help             - Show this help
  /quit             - Exit

Anything else is whispered privately to the facilitator."#
    }
}
