//! Operator commands typed on stdin.
//!
//! One command per line, first word selects it:
//!
//! | Line             | Effect                                       |
//! |------------------|----------------------------------------------|
//! | `add [name]`     | spawn a bot, the configured default if unnamed |
//! | `health`         | probe the arena                              |
//! | `connect <url>`  | point the viewer at another arena            |
//! | `connect`        | drop the base address, follow the origin     |
//! | `help`           | list commands                                |
//! | `quit` / `exit`  | close the stream and leave                   |

use crate::error::TermError;

/// Short usage text shown by `help` and after a bad command.
pub const USAGE: &str = "commands: add [name] | health | connect [url] | help | quit";

/// A parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Spawn a bot. `None` means the configured default.
    Add(Option<String>),
    /// Probe liveness.
    Health,
    /// Change the base address. `None` clears it.
    Connect(Option<String>),
    /// Show usage.
    Help,
    /// Shut down.
    Quit,
}

impl Command {
    /// Parse one input line.
    ///
    /// Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, TermError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let argument = words.next().map(str::to_owned);

        let command = match verb.to_ascii_lowercase().as_str() {
            "add" | "spawn" => Self::Add(argument),
            "health" | "status" => Self::Health,
            "connect" | "target" => Self::Connect(argument),
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(TermError::UnknownCommand(verb.to_owned())),
        };
        Ok(Some(command))
    }
}
