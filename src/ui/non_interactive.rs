//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{Result, StencilError};

use super::theme::StencilTheme;
use super::{is_truthy, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// Environment prefix for answering prompts without a terminal.
pub const PROMPT_ENV_PREFIX: &str = "STENCIL_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `STENCIL_PROMPT_<KEY>` variables, then from
/// the prompt's default. A prompt with neither is an error.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }

    fn answer(&self, prompt: &Prompt) -> Option<String> {
        let env_key = format!(
            "{}{}",
            PROMPT_ENV_PREFIX,
            prompt.key.to_uppercase().replace('-', "_")
        );
        self.env_overrides
            .get(&env_key)
            .or(prompt.default.as_ref())
            .cloned()
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode != OutputMode::Silent {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let value = self.answer(prompt).ok_or_else(|| StencilError::Prompt {
            message: format!(
                "cannot ask '{}' in non-interactive mode (no default value)",
                prompt.key
            ),
        })?;

        Ok(match prompt.prompt_type {
            PromptType::Confirm => PromptResult::Bool(is_truthy(&value)),
            PromptType::MultiSelect { .. } => PromptResult::Strings(
                value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
            PromptType::Input | PromptType::Select { .. } => PromptResult::String(value),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_status() {
            println!("  {}", message);
        }
        Box::new(NoopSpinner { mode: self.mode })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  {}", hint);
        }
    }

    fn show_diff(&mut self, diff: &str) {
        print!("{}", diff);
        if !diff.is_empty() && !diff.ends_with('\n') {
            println!();
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that prints only its final line.
struct NoopSpinner {
    mode: OutputMode,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_spinners() {
            println!("{}", StencilTheme::plain().format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("{}", StencilTheme::plain().format_error(msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        if self.mode.shows_spinners() {
            println!("{}", StencilTheme::plain().format_skipped(msg));
        }
    }
}
