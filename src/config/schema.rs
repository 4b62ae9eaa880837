//! Configuration schema definitions for stencil.
//!
//! This module contains the struct definitions that map to the
//! `components.json` project configuration file, plus the resolved form
//! that downstream stages consume.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, StencilError};

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "components.json";

/// Root structure of `components.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawConfig {
    /// JSON schema reference (ignored)
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Catalog style, e.g. "new-york"
    pub style: String,

    /// Whether the project uses TypeScript
    #[serde(default = "default_true")]
    pub tsx: bool,

    /// Whether React Server Components are enabled
    #[serde(default)]
    pub rsc: bool,

    /// Tailwind settings
    pub tailwind: TailwindConfig,

    /// Import aliases
    pub aliases: Aliases,

    /// Additional registries keyed by namespace (e.g. "@acme")
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub registries: BTreeMap<String, RegistryEntry>,
}

fn default_true() -> bool {
    true
}

/// Tailwind settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TailwindConfig {
    /// Path to tailwind.config.*, kept for other tools; stencil never edits it
    #[serde(default)]
    pub config: String,

    /// Path to the global stylesheet
    pub css: String,

    /// Base color used by `init`
    #[serde(default = "default_base_color")]
    pub base_color: String,

    /// Whether theming uses CSS variables
    #[serde(default = "default_true")]
    pub css_variables: bool,

    /// Utility class prefix, e.g. "tw-"
    #[serde(default)]
    pub prefix: String,
}

fn default_base_color() -> String {
    "neutral".to_string()
}

/// Import aliases configured by the project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Aliases {
    /// Where components go, e.g. "@/components"
    pub components: String,

    /// Import path of the `cn` helper, e.g. "@/lib/utils"
    pub utils: String,

    /// Where UI primitives go (defaults to `<components>/ui`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<String>,

    /// Where library files go (defaults to the parent of `utils`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lib: Option<String>,

    /// Where hooks go (defaults to a `hooks` sibling of components)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<String>,
}

/// A namespaced registry declared in `components.json`.
///
/// Either a bare URL template or an object with headers:
///
/// ```json
/// "registries": {
///   "@acme": "https://acme.dev/r/{name}.json",
///   "@private": {
///     "url": "https://internal.example/r/{style}/{name}.json",
///     "headers": { "Authorization": "Bearer ${PRIVATE_TOKEN}" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RegistryEntry {
    Url(String),
    Detailed {
        url: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        headers: BTreeMap<String, String>,
    },
}

impl RegistryEntry {
    /// URL template with `{name}` / `{style}` placeholders.
    pub fn url(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::Detailed { url, .. } => url,
        }
    }

    /// Headers to send (values may reference `${ENV}` variables).
    pub fn headers(&self) -> BTreeMap<String, String> {
        match self {
            Self::Url(_) => BTreeMap::new(),
            Self::Detailed { headers, .. } => headers.clone(),
        }
    }
}

/// Aliases resolved to absolute filesystem locations.
///
/// A `None` entry means the alias had no matching path mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedPaths {
    pub cwd: PathBuf,
    pub tailwind_css: PathBuf,
    pub components: Option<PathBuf>,
    /// The `cn` helper module; a file path without extension.
    pub utils: Option<PathBuf>,
    pub ui: Option<PathBuf>,
    pub lib: Option<PathBuf>,
    pub hooks: Option<PathBuf>,
}

/// Logical alias keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasKey {
    Components,
    Utils,
    Ui,
    Lib,
    Hooks,
}

impl AliasKey {
    /// Config field name of this alias.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Components => "components",
            Self::Utils => "utils",
            Self::Ui => "ui",
            Self::Lib => "lib",
            Self::Hooks => "hooks",
        }
    }
}

impl ResolvedPaths {
    /// Look up a resolved alias, failing if it has no mapping.
    pub fn require(&self, key: AliasKey) -> Result<&Path> {
        let path = match key {
            AliasKey::Components => &self.components,
            AliasKey::Utils => &self.utils,
            AliasKey::Ui => &self.ui,
            AliasKey::Lib => &self.lib,
            AliasKey::Hooks => &self.hooks,
        };
        path.as_deref().ok_or_else(|| StencilError::UnresolvedAlias {
            alias: key.as_str().to_string(),
        })
    }
}

/// Fully loaded project configuration.
///
/// Built once per invocation by [`crate::config::load_config`] and only
/// ever handed out by shared reference afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    pub raw: RawConfig,
    pub resolved: ResolvedPaths,
}

impl ProjectConfig {
    pub fn style(&self) -> &str {
        &self.raw.style
    }

    pub fn rsc(&self) -> bool {
        self.raw.rsc
    }

    pub fn tsx(&self) -> bool {
        self.raw.tsx
    }

    pub fn tailwind(&self) -> &TailwindConfig {
        &self.raw.tailwind
    }

    pub fn aliases(&self) -> &Aliases {
        &self.raw.aliases
    }

    /// The alias UI primitives are imported from.
    pub fn ui_alias(&self) -> String {
        self.raw
            .aliases
            .ui
            .clone()
            .unwrap_or_else(|| format!("{}/ui", self.raw.aliases.components))
    }

    /// The alias library files are imported from; defaults to the
    /// directory holding `utils`.
    pub fn lib_alias(&self) -> String {
        self.raw.aliases.lib.clone().unwrap_or_else(|| {
            let utils = &self.raw.aliases.utils;
            match utils.rsplit_once('/') {
                Some((parent, "utils")) => parent.to_string(),
                _ => utils.clone(),
            }
        })
    }

    /// The alias hooks are imported from; defaults to a `hooks` sibling of
    /// the components alias.
    pub fn hooks_alias(&self) -> String {
        self.raw.aliases.hooks.clone().unwrap_or_else(|| {
            let components = &self.raw.aliases.components;
            match components.rsplit_once('/') {
                Some((parent, _)) => format!("{}/hooks", parent),
                None => "hooks".to_string(),
            }
        })
    }

    /// Project root directory.
    pub fn cwd(&self) -> &Path {
        &self.resolved.cwd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "style": "new-york",
        "tailwind": { "css": "app/globals.css" },
        "aliases": { "components": "@/components", "utils": "@/lib/utils" }
    }"#;

    #[test]
    fn minimal_config_applies_defaults() {
        let raw: RawConfig = serde_json::from_str(MINIMAL).unwrap();
        assert!(raw.tsx);
        assert!(!raw.rsc);
        assert!(raw.tailwind.css_variables);
        assert_eq!(raw.tailwind.base_color, "neutral");
        assert_eq!(raw.tailwind.prefix, "");
        assert!(raw.aliases.ui.is_none());
        assert!(raw.registries.is_empty());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let json = r#"{ "tailwind": { "css": "a.css" }, "aliases": { "components": "@/c", "utils": "@/u" } }"#;
        let err = serde_json::from_str::<RawConfig>(json).unwrap_err();
        assert!(err.to_string().contains("style"));
    }

    #[test]
    fn registries_accept_string_and_object_forms() {
        let json = r#"{
            "style": "default",
            "tailwind": { "css": "a.css", "baseColor": "zinc", "cssVariables": false },
            "aliases": { "components": "@/components", "utils": "@/lib/utils" },
            "registries": {
                "@acme": "https://acme.dev/r/{name}.json",
                "@private": { "url": "https://internal/r/{name}", "headers": { "X-Token": "${TOKEN}" } }
            }
        }"#;
        let raw: RawConfig = serde_json::from_str(json).unwrap();
        assert_eq!(raw.tailwind.base_color, "zinc");
        assert!(!raw.tailwind.css_variables);
        assert_eq!(
            raw.registries["@acme"].url(),
            "https://acme.dev/r/{name}.json"
        );
        assert!(raw.registries["@acme"].headers().is_empty());
        assert_eq!(
            raw.registries["@private"].headers().get("X-Token"),
            Some(&"${TOKEN}".to_string())
        );
    }

    #[test]
    fn derived_aliases_follow_components_and_utils() {
        let config = ProjectConfig {
            raw: serde_json::from_str(MINIMAL).unwrap(),
            resolved: ResolvedPaths::default(),
        };
        assert_eq!(config.ui_alias(), "@/components/ui");
        assert_eq!(config.lib_alias(), "@/lib");
        assert_eq!(config.hooks_alias(), "@/hooks");
    }

    #[test]
    fn require_reports_unresolved_alias() {
        let resolved = ResolvedPaths {
            components: Some(PathBuf::from("/app/components")),
            ..Default::default()
        };
        assert_eq!(
            resolved.require(AliasKey::Components).unwrap(),
            Path::new("/app/components")
        );
        let err = resolved.require(AliasKey::Hooks).unwrap_err();
        assert!(matches!(err, StencilError::UnresolvedAlias { alias } if alias == "hooks"));
    }
}
