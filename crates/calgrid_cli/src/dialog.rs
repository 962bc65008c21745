//! User-interaction capabilities.
//!
//! # Responsibility
//! - Abstract confirmation, text-prompt and notification dialogs behind a
//!   trait so the command layer is testable without a terminal.
//!
//! # Invariants
//! - The core crate never calls these; it only ever receives answers the
//!   command layer has already resolved.

use std::io::{self, BufRead, Write};

/// Blocking user-interaction dialogs.
pub trait Dialog {
    /// Yes/no confirmation. `Ok(true)` only on an explicit affirmative.
    fn confirm(&mut self, message: &str) -> io::Result<bool>;

    /// Free-text prompt pre-filled with a default value.
    ///
    /// Returns `None` when the user cancels. An empty reply accepts the
    /// default.
    fn prompt_text(&mut self, message: &str, default: &str) -> io::Result<Option<String>>;

    /// Blocking notification; no answer is consumed.
    fn alert(&mut self, message: &str);
}

/// Terminal-backed dialogs over stdin/stdout.
///
/// Cancellation is end-of-input (ctrl-d) on a prompt.
#[derive(Debug, Default)]
pub struct TerminalDialog;

impl TerminalDialog {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let bytes = io::stdin().lock().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

impl Dialog for TerminalDialog {
    fn confirm(&mut self, message: &str) -> io::Result<bool> {
        print!("{message} [y/N] ");
        io::stdout().flush()?;
        let reply = self.read_line()?.unwrap_or_default();
        Ok(reply.eq_ignore_ascii_case("y") || reply.eq_ignore_ascii_case("yes"))
    }

    fn prompt_text(&mut self, message: &str, default: &str) -> io::Result<Option<String>> {
        print!("{message} [{default}] ");
        io::stdout().flush()?;
        match self.read_line()? {
            None => Ok(None),
            Some(reply) if reply.is_empty() => Ok(Some(default.to_string())),
            Some(reply) => Ok(Some(reply)),
        }
    }

    fn alert(&mut self, message: &str) {
        println!("{message}");
    }
}
