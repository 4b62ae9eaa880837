//! TypeScript path mapping and alias resolution.
//!
//! Aliases such as `@/components` are resolved the same way the TypeScript
//! compiler would: by matching them against `compilerOptions.paths` in
//! `tsconfig.json` (or `jsconfig.json`) relative to `compilerOptions.baseUrl`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, StencilError};

/// The `paths` table of a tsconfig, anchored at its base directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathMapping {
    /// Absolute directory that substitutions are relative to.
    pub base_dir: PathBuf,
    /// Pattern → substitutions, e.g. `@/*` → `["./src/*"]`.
    pub paths: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct TsConfig {
    #[serde(default, rename = "compilerOptions")]
    compiler_options: CompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
struct CompilerOptions {
    #[serde(default, rename = "baseUrl")]
    base_url: Option<String>,
    #[serde(default)]
    paths: BTreeMap<String, Vec<String>>,
}

impl PathMapping {
    /// Build a mapping directly (used by tests and `init`).
    pub fn new(base_dir: impl Into<PathBuf>, paths: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            base_dir: base_dir.into(),
            paths,
        }
    }

    /// Load the mapping for a project.
    ///
    /// TypeScript projects read `tsconfig.json` first, JavaScript projects
    /// `jsconfig.json` first; either falls back to the other.
    pub fn load(project_root: &Path, tsx: bool) -> Result<Self> {
        let candidates = if tsx {
            ["tsconfig.json", "jsconfig.json"]
        } else {
            ["jsconfig.json", "tsconfig.json"]
        };

        let path = candidates
            .iter()
            .map(|name| project_root.join(name))
            .find(|p| p.is_file())
            .ok_or_else(|| StencilError::ConfigNotFound {
                path: project_root.join(candidates[0]),
            })?;

        let content = fs::read_to_string(&path)?;
        Self::parse(&content, &path)
    }

    /// Parse tsconfig content located at `source_path`.
    pub fn parse(content: &str, source_path: &Path) -> Result<Self> {
        let cleaned = strip_jsonc(content);
        let tsconfig: TsConfig =
            serde_json::from_str(&cleaned).map_err(|e| StencilError::ConfigParseError {
                path: source_path.to_path_buf(),
                message: e.to_string(),
            })?;

        let config_dir = source_path.parent().unwrap_or(Path::new("."));
        let base_url = tsconfig
            .compiler_options
            .base_url
            .unwrap_or_else(|| ".".to_string());

        Ok(Self {
            base_dir: normalize_path(&config_dir.join(base_url)),
            paths: tsconfig.compiler_options.paths,
        })
    }

    /// Resolve an import specifier to an absolute path.
    ///
    /// Exact patterns win; otherwise the wildcard pattern with the longest
    /// prefix matches. Returns `None` when nothing matches.
    pub fn resolve(&self, specifier: &str) -> Option<PathBuf> {
        if let Some(subs) = self.paths.get(specifier).filter(|_| !specifier.contains('*')) {
            return subs
                .first()
                .map(|sub| normalize_path(&self.base_dir.join(sub)));
        }

        let mut best: Option<(usize, &str, &str)> = None;
        for (pattern, subs) in &self.paths {
            let Some((prefix, suffix)) = pattern.split_once('*') else {
                continue;
            };
            if specifier.len() < prefix.len() + suffix.len()
                || !specifier.starts_with(prefix)
                || !specifier.ends_with(suffix)
            {
                continue;
            }
            let Some(sub) = subs.first() else { continue };
            let captured = &specifier[prefix.len()..specifier.len() - suffix.len()];
            if best.is_none_or(|(len, _, _)| prefix.len() > len) {
                best = Some((prefix.len(), sub.as_str(), captured));
            }
        }

        best.map(|(_, sub, captured)| {
            normalize_path(&self.base_dir.join(sub.replacen('*', captured, 1)))
        })
    }
}

/// Lexically normalize a path, folding `.` and `..` without touching disk.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Remove `//` and `/* */` comments and trailing commas from JSON text.
///
/// tsconfig files are JSONC; string contents are left untouched.
pub fn strip_jsonc(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    let mut in_string = false;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' && i + 1 < chars.len() {
                out.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match (c, chars.get(i + 1)) {
            ('"', _) => {
                in_string = true;
                out.push(c);
                i += 1;
            }
            ('/', Some('/')) => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            ('/', Some('*')) => {
                i += 2;
                while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                    i += 1;
                }
                i += 2;
            }
            (',', _) => {
                let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
                i += 1;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}
