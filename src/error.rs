//! Error types for stencil operations.
//!
//! This module defines [`StencilError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `StencilError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `StencilError::Other`) for unexpected errors
//! - Every variant names the item, path, or field that failed

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for stencil operations.
#[derive(Debug, Error)]
pub enum StencilError {
    /// Project configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// An alias needed by a later stage has no path mapping.
    #[error("Alias '{alias}' could not be resolved to a directory. Check the paths in your tsconfig.json")]
    UnresolvedAlias { alias: String },

    /// Network or protocol failure talking to a registry.
    #[error("Failed to fetch {location}: {message}")]
    Transport { location: String, message: String },

    /// The registry has no item with this name.
    #[error("Item '{name}' was not found at {location}")]
    NotFound { name: String, location: String },

    /// The registry returned a payload that does not match the item schema.
    #[error("Invalid registry item '{name}':\n  {}", errors.join("\n  "))]
    Schema { name: String, errors: Vec<String> },

    /// A source file could not be transformed.
    #[error("Failed to transform {path}: {message}")]
    Transform { path: String, message: String },

    /// Writing a file to the project failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The package manager exited unsuccessfully.
    #[error("Dependency install failed with exit code {code:?}: {command}")]
    InstallFailed { command: String, code: Option<i32> },

    /// A prompt could not be answered.
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StencilError {
    /// Whether files may already have been written when this error surfaced.
    pub fn may_leave_partial_writes(&self) -> bool {
        matches!(self, Self::Write { .. } | Self::InstallFailed { .. })
    }
}

/// Result type alias for stencil operations.
pub type Result<T> = std::result::Result<T, StencilError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_path() {
        let err = StencilError::ConfigNotFound {
            path: PathBuf::from("/app/components.json"),
        };
        assert!(err.to_string().contains("/app/components.json"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = StencilError::ConfigParseError {
            path: PathBuf::from("/app/components.json"),
            message: "missing field `style`".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/app/components.json"));
        assert!(msg.contains("missing field `style`"));
    }

    #[test]
    fn unresolved_alias_displays_alias() {
        let err = StencilError::UnresolvedAlias {
            alias: "hooks".into(),
        };
        assert!(err.to_string().contains("'hooks'"));
    }

    #[test]
    fn not_found_displays_name() {
        let err = StencilError::NotFound {
            name: "does-not-exist".into(),
            location: "https://example.com/r/styles/default/does-not-exist.json".into(),
        };
        assert!(err.to_string().contains("does-not-exist"));
    }

    #[test]
    fn schema_error_lists_every_field() {
        let err = StencilError::Schema {
            name: "button".into(),
            errors: vec![
                "type: unknown item type \"registry:widget\"".into(),
                "files[0].path: expected a string".into(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("button"));
        assert!(msg.contains("registry:widget"));
        assert!(msg.contains("files[0].path"));
    }

    #[test]
    fn install_failed_displays_command_and_code() {
        let err = StencilError::InstallFailed {
            command: "npm install clsx".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("npm install clsx"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn partial_write_errors_are_flagged() {
        let install = StencilError::InstallFailed {
            command: "pnpm add clsx".into(),
            code: Some(1),
        };
        let write = StencilError::Write {
            path: PathBuf::from("/app/components/ui/button.tsx"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let config = StencilError::ConfigValidationError {
            message: "bad".into(),
        };
        assert!(install.may_leave_partial_writes());
        assert!(write.may_leave_partial_writes());
        assert!(!config.may_leave_partial_writes());
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: StencilError = io_err.into();
        assert!(matches!(err, StencilError::Io(_)));
    }
}
