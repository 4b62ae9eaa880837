//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::theme::StencilTheme;
use super::SpinnerHandle;

/// A progress spinner for long-running operations.
pub struct ProgressSpinner {
    bar: ProgressBar,
    theme: StencilTheme,
}

impl ProgressSpinner {
    pub fn new(message: &str, theme: StencilTheme) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar, theme }
    }

    /// Create a spinner that doesn't show (for quiet modes).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            theme: StencilTheme::plain(),
        }
    }

    fn finish_with(&mut self, line: String) {
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(line);
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.finish_with(line);
    }

    fn finish_error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.finish_with(line);
    }

    fn finish_skipped(&mut self, msg: &str) {
        let line = self.theme.format_skipped(msg);
        self.finish_with(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_spinner_finishes() {
        let mut spinner = ProgressSpinner::hidden();
        spinner.set_message("Resolving");
        spinner.finish_success("Resolved");
        assert!(spinner.bar.is_finished());
    }

    #[test]
    fn finish_error_sets_message() {
        let mut spinner = ProgressSpinner::hidden();
        spinner.finish_error("Failed");
        assert_eq!(spinner.bar.message(), "✗ Failed");
    }

    #[test]
    fn finish_skipped_sets_message() {
        let mut spinner = ProgressSpinner::hidden();
        spinner.finish_skipped("Nothing to install");
        assert_eq!(spinner.bar.message(), "○ Nothing to install");
    }
}
