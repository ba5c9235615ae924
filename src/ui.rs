//! Terminal output and confirmation prompts.

use console::{style, Term};
use dialoguer::Confirm;

use crate::error::{PatchError, Result};

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show all output including per-item progress.
    Verbose,
    /// Show banner and status only.
    #[default]
    Normal,
    /// Show nothing except errors and per-item failures.
    Silent,
}

impl OutputMode {
    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Silent)
    }

    /// Check if this mode shows per-item progress.
    pub fn shows_detail(&self) -> bool {
        matches!(self, Self::Verbose)
    }
}

/// Output writer that respects output mode.
#[derive(Debug)]
pub struct Ui {
    mode: OutputMode,
}

impl Ui {
    /// Create a new output writer.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    /// Get the output mode.
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Write a status line if the mode allows it.
    pub fn status(&self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    /// Write a per-item progress line in verbose mode.
    pub fn detail(&self, msg: &str) {
        if self.mode.shows_detail() {
            println!("{}", msg);
        }
    }

    /// Report a recoverable per-item failure. Always shown - silent mode
    /// suppresses chatter, not failures.
    pub fn item_failure(&self, item: &str, message: &str) {
        eprintln!(
            "{} {} ** FAILED ** {}",
            style("***").red().bold(),
            item,
            message
        );
    }

    /// Report a fatal error.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", style(msg).red());
    }

    /// Ask the operator a yes/no question, defaulting to yes.
    pub fn confirm(&self, question: &str) -> Result<bool> {
        let term = Term::stderr();
        Confirm::new()
            .with_prompt(question)
            .default(true)
            .interact_on(&term)
            .map_err(|e: dialoguer::Error| PatchError::Io(e.into()))
    }
}

/// Whether a human is attached to the terminal. Prompting is pointless (and
/// would hang) without one.
pub fn user_attended() -> bool {
    console::user_attended()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_mode_shows_status_not_detail() {
        assert!(OutputMode::Normal.shows_status());
        assert!(!OutputMode::Normal.shows_detail());
    }

    #[test]
    fn verbose_mode_shows_everything() {
        assert!(OutputMode::Verbose.shows_status());
        assert!(OutputMode::Verbose.shows_detail());
    }

    #[test]
    fn silent_mode_shows_nothing() {
        assert!(!OutputMode::Silent.shows_status());
        assert!(!OutputMode::Silent.shows_detail());
    }

    #[test]
    fn default_mode_is_normal() {
        assert_eq!(OutputMode::default(), OutputMode::Normal);
    }

    #[test]
    fn ui_reports_its_mode() {
        let ui = Ui::new(OutputMode::Verbose);
        assert_eq!(ui.mode(), OutputMode::Verbose);
    }
}
