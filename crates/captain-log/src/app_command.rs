use crate::AppError;

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Commands typed at the console, one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Start a new take.
    Record,
    /// Stop the current take.
    Stop,
    /// Record when not recording, stop otherwise.
    Toggle,
    /// Play the current take.
    Play,
    /// Stop playback.
    Halt,
    /// Copy the current take into the journal.
    Save,
    /// Transcribe the current take.
    Transcribe,
    /// List saved entries, optionally filtered.
    List {
        /// Search text; empty lists everything.
        query: String,
    },
    /// Print the current state.
    Status,
    /// Print the command list.
    Help,
    /// Leave the application.
    Quit,
}

impl FromStr for AppCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        let command = match word.to_lowercase().as_str() {
            "record" | "r" => AppCommand::Record,
            "stop" | "s" => AppCommand::Stop,
            "toggle" | "t" => AppCommand::Toggle,
            "play" | "p" => AppCommand::Play,
            "halt" => AppCommand::Halt,
            "save" => AppCommand::Save,
            "transcribe" => AppCommand::Transcribe,
            "list" | "ls" => AppCommand::List {
                query: rest.to_string(),
            },
            "status" => AppCommand::Status,
            "help" | "?" => AppCommand::Help,
            "quit" | "exit" | "q" => AppCommand::Quit,
            _ => {
                return Err(AppError::UnknownCommand {
                    input: line.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(command)
    }
}
