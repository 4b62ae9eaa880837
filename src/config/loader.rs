//! Configuration file discovery and loading.
//!
//! Reads `components.json`, loads the project's path mapping, and resolves
//! every alias to an absolute location.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::paths::{normalize_path, PathMapping};
use crate::config::schema::{ProjectConfig, RawConfig, ResolvedPaths, CONFIG_FILE};
use crate::error::{Result, StencilError};

/// Path of the config file for a project root.
pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE)
}

/// Load `components.json` without resolving aliases.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the JSON is invalid or a required field is missing.
pub fn load_raw_config(project_root: &Path) -> Result<RawConfig> {
    let path = config_path(project_root);
    let content = fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StencilError::ConfigNotFound { path: path.clone() }
        } else {
            StencilError::Io(e)
        }
    })?;

    parse_config(&content, &path)
}

/// Parse JSON content into a [`RawConfig`].
///
/// # Arguments
///
/// * `content` - The JSON content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<RawConfig> {
    let raw: RawConfig =
        serde_json::from_str(content).map_err(|e| StencilError::ConfigParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;

    validate_raw(&raw)?;
    Ok(raw)
}

fn validate_raw(raw: &RawConfig) -> Result<()> {
    let mut problems = Vec::new();
    if raw.style.trim().is_empty() {
        problems.push("style: must not be empty");
    }
    if raw.tailwind.css.trim().is_empty() {
        problems.push("tailwind.css: must not be empty");
    }
    if raw.aliases.components.trim().is_empty() {
        problems.push("aliases.components: must not be empty");
    }
    if raw.aliases.utils.trim().is_empty() {
        problems.push("aliases.utils: must not be empty");
    }
    for namespace in raw.registries.keys() {
        if !namespace.starts_with('@') {
            return Err(StencilError::ConfigValidationError {
                message: format!("registries: namespace '{}' must start with '@'", namespace),
            });
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(StencilError::ConfigValidationError {
            message: problems.join("; "),
        })
    }
}

/// Load and fully resolve the project configuration.
pub fn load_config(project_root: &Path) -> Result<ProjectConfig> {
    let raw = load_raw_config(project_root)?;
    let mapping = PathMapping::load(project_root, raw.tsx)?;
    Ok(resolve_config(project_root, raw, &mapping))
}

/// Resolve every alias of `raw` through `mapping`.
pub fn resolve_config(project_root: &Path, raw: RawConfig, mapping: &PathMapping) -> ProjectConfig {
    let cwd = normalize_path(project_root);

    let components = mapping.resolve(&raw.aliases.components);
    let utils = mapping.resolve(&raw.aliases.utils);

    let ui = match &raw.aliases.ui {
        Some(alias) => mapping.resolve(alias),
        None => components.as_ref().map(|c| c.join("ui")),
    };

    let lib = match &raw.aliases.lib {
        Some(alias) => mapping.resolve(alias),
        None => utils.as_deref().map(utils_directory),
    };

    let hooks = match &raw.aliases.hooks {
        Some(alias) => mapping.resolve(alias),
        None => components
            .as_ref()
            .map(|c| normalize_path(&c.join("..").join("hooks"))),
    };

    let tailwind_css = normalize_path(&cwd.join(&raw.tailwind.css));

    tracing::debug!(
        "Resolved aliases: components={:?} utils={:?} ui={:?} lib={:?} hooks={:?}",
        components,
        utils,
        ui,
        lib,
        hooks
    );

    ProjectConfig {
        raw,
        resolved: ResolvedPaths {
            cwd,
            tailwind_css,
            components,
            utils,
            ui,
            lib,
            hooks,
        },
    }
}

/// Directory that holds the `utils` module.
///
/// `@/lib/utils` names a file, so library files belong next to it rather
/// than inside a `utils/` directory.
pub fn utils_directory(utils: &Path) -> PathBuf {
    let is_file_like = utils
        .file_stem()
        .map(|stem| stem == "utils")
        .unwrap_or(false);

    match utils.parent() {
        Some(parent) if is_file_like => parent.to_path_buf(),
        _ => utils.to_path_buf(),
    }
}

/// Write a config file (used by `init`).
pub fn write_config(project_root: &Path, raw: &RawConfig) -> Result<PathBuf> {
    let path = config_path(project_root);
    let json = serde_json::to_string_pretty(raw).map_err(anyhow::Error::from)?;
    fs::write(&path, format!("{}\n", json)).map_err(|source| StencilError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
