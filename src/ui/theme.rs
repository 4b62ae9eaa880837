//! Visual theme and styling.

use console::Style;

/// Colors used for terminal output.
#[derive(Debug, Clone)]
pub struct StencilTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (yellow).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
    /// Style for headers (cyan bold).
    pub header: Style,
    /// Style for follow-up hints (cyan dim).
    pub hint: Style,
    /// Added diff lines.
    pub added: Style,
    /// Removed diff lines.
    pub removed: Style,
}

impl Default for StencilTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl StencilTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
            hint: Style::new().cyan().dim(),
            added: Style::new().green(),
            removed: Style::new().red(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            hint: Style::new(),
            added: Style::new(),
            removed: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    pub fn format_skipped(&self, msg: &str) -> String {
        format!("{}", self.dim.apply_to(format!("○ {}", msg)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(title))
    }

    /// Color one line of a unified diff by its leading marker.
    pub fn format_diff_line(&self, line: &str) -> String {
        if line.starts_with("+++") || line.starts_with("---") {
            format!("{}", self.highlight.apply_to(line))
        } else if line.starts_with('+') {
            format!("{}", self.added.apply_to(line))
        } else if line.starts_with('-') {
            format!("{}", self.removed.apply_to(line))
        } else if line.starts_with("@@") {
            format!("{}", self.hint.apply_to(line))
        } else {
            line.to_string()
        }
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    console::Term::stdout().is_term()
}
