//! Local registry fetching.
//!
//! A registry base that is not a URL is a directory laid out like the
//! hosted registry (`index.json`, `styles/<style>/<name>.json`).

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Result, StencilError};

/// Read a registry payload from disk on behalf of item `name`.
pub fn read_local(name: &str, path: &Path) -> Result<String> {
    tracing::debug!("Reading {}", path.display());
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => StencilError::NotFound {
            name: name.to_string(),
            location: path.display().to_string(),
        },
        _ => StencilError::Transport {
            location: path.display().to_string(),
            message: e.to_string(),
        },
    })
}
