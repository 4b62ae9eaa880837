//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use stencil::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("overwrite", "yes");
//!
//! ui.message("Resolving button");
//! ui.success("Done");
//!
//! assert!(ui.has_message("Resolving"));
//! assert!(ui.has_success("Done"));
//! ```

use std::collections::{HashMap, VecDeque};

use crate::error::Result;

use super::{is_truthy, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
///
/// Supports both single responses (via `set_prompt_response`) and queued
/// responses (via `queue_prompt_responses`) for keys asked more than once.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    hints: Vec<String>,
    diffs: Vec<String>,
    spinners: Vec<String>,
    prompt_responses: HashMap<String, String>,
    prompt_queues: HashMap<String, VecDeque<String>>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Queue multiple responses for the same prompt key.
    ///
    /// Responses are returned in order. After the queue is exhausted,
    /// falls back to `set_prompt_response` or the prompt default.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        let queue = responses.into_iter().map(|s| s.to_string()).collect();
        self.prompt_queues.insert(key.to_string(), queue);
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn diffs(&self) -> &[String] {
        &self.diffs
    }

    /// Spinner messages in the order they were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Keys of the prompts that were shown.
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    pub fn has_hint(&self, msg: &str) -> bool {
        self.hints.iter().any(|m| m.contains(msg))
    }

    fn next_response(&mut self, prompt: &Prompt) -> Option<String> {
        if let Some(response) = self
            .prompt_queues
            .get_mut(&prompt.key)
            .and_then(|queue| queue.pop_front())
        {
            return Some(response);
        }
        self.prompt_responses
            .get(&prompt.key)
            .or(prompt.default.as_ref())
            .cloned()
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());
        let response = self.next_response(prompt);

        // Type-appropriate empty answer when nothing is configured.
        Ok(match (&prompt.prompt_type, response) {
            (PromptType::Confirm, response) => {
                PromptResult::Bool(response.as_deref().is_some_and(is_truthy))
            }
            (PromptType::MultiSelect { .. }, Some(response)) => PromptResult::Strings(
                response
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
            (PromptType::MultiSelect { .. }, None) => PromptResult::Strings(Vec::new()),
            (_, response) => PromptResult::String(response.unwrap_or_default()),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner::new())
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }

    fn show_diff(&mut self, diff: &str) {
        self.diffs.push(diff.to_string());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Mock spinner that captures finish messages.
#[derive(Debug, Default)]
pub struct MockSpinner {
    messages: Vec<String>,
    finish_message: Option<String>,
    status: Option<SpinnerStatus>,
}

/// Status of a mock spinner when finished.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinnerStatus {
    Success,
    Error,
    Skipped,
}

impl MockSpinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn finish_message(&self) -> Option<&str> {
        self.finish_message.as_deref()
    }

    pub fn status(&self) -> Option<SpinnerStatus> {
        self.status
    }

    fn finish(&mut self, msg: &str, status: SpinnerStatus) {
        self.finish_message = Some(msg.to_string());
        self.status = Some(status);
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.finish(msg, SpinnerStatus::Success);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish(msg, SpinnerStatus::Error);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finish(msg, SpinnerStatus::Skipped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::PromptOption;

    #[test]
    fn mock_ui_captures_messages() {
        let mut ui = MockUI::new();

        ui.message("Hello");
        ui.success("Done");
        ui.warning("Be careful");
        ui.error("Oops");
        ui.show_hint("Run stencil add button");
        ui.show_diff("+a\n");

        assert_eq!(ui.messages(), &["Hello"]);
        assert_eq!(ui.successes(), &["Done"]);
        assert_eq!(ui.warnings(), &["Be careful"]);
        assert_eq!(ui.errors(), &["Oops"]);
        assert!(ui.has_hint("stencil add"));
        assert_eq!(ui.diffs(), &["+a\n"]);
    }

    #[test]
    fn mock_ui_prompt_with_response() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("style", "default");

        let prompt = Prompt {
            key: "style".to_string(),
            question: "Which style?".to_string(),
            prompt_type: PromptType::Input,
            default: None,
        };

        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "default");
        assert_eq!(ui.prompts_shown(), &["style"]);
    }

    #[test]
    fn mock_ui_prompt_falls_back_to_default() {
        let mut ui = MockUI::new();
        let prompt = Prompt::confirm("overwrite", "Overwrite?", true);
        assert_eq!(ui.prompt(&prompt).unwrap().as_bool(), Some(true));
    }

    #[test]
    fn unconfigured_confirm_is_false() {
        let mut ui = MockUI::new();
        let prompt = Prompt {
            key: "overwrite".to_string(),
            question: "Overwrite?".to_string(),
            prompt_type: PromptType::Confirm,
            default: None,
        };
        assert_eq!(ui.prompt(&prompt).unwrap().as_bool(), Some(false));
    }

    #[test]
    fn queued_responses_are_used_in_order() {
        let mut ui = MockUI::new();
        ui.queue_prompt_responses("overwrite", vec!["yes", "no"]);
        let prompt = Prompt::confirm("overwrite", "Overwrite?", false);

        assert_eq!(ui.prompt(&prompt).unwrap().as_bool(), Some(true));
        assert_eq!(ui.prompt(&prompt).unwrap().as_bool(), Some(false));
        // queue exhausted, back to the default
        assert_eq!(ui.prompt(&prompt).unwrap().as_bool(), Some(false));
    }

    #[test]
    fn multiselect_response_is_split() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("components", "button, card");
        let prompt = Prompt {
            key: "components".to_string(),
            question: "Which components?".to_string(),
            prompt_type: PromptType::MultiSelect {
                options: vec![PromptOption::new("button", "button")],
            },
            default: None,
        };
        assert_eq!(ui.prompt(&prompt).unwrap().as_strings(), vec!["button", "card"]);
    }

    #[test]
    fn mock_ui_captures_spinners() {
        let mut ui = MockUI::new();
        let _spinner = ui.start_spinner("Installing dependencies");
        assert_eq!(ui.spinners(), &["Installing dependencies"]);
    }

    #[test]
    fn mock_spinner_records_finish() {
        let mut spinner = MockSpinner::new();
        spinner.set_message("Fetching");
        spinner.finish_error("Failed");
        assert_eq!(spinner.messages(), &["Fetching"]);
        assert_eq!(spinner.finish_message(), Some("Failed"));
        assert_eq!(spinner.status(), Some(SpinnerStatus::Error));
    }

    #[test]
    fn mock_ui_output_mode() {
        let ui = MockUI::with_mode(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
        assert!(!MockUI::new().is_interactive());
    }
}
