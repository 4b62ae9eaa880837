//! Registry source configuration.
//!
//! Maps item names to the place their JSON lives:
//! - plain names (`button`) go to the default registry
//! - namespaced names (`@acme/button`) go to a registry from `components.json`
//! - absolute URLs and local `*.json` paths are used as-is
//!
//! A source whose base is not an `http(s)://` URL is a local directory.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::config::ProjectConfig;
use crate::error::{Result, StencilError};

/// Registry used when `REGISTRY_URL` is unset.
pub const DEFAULT_REGISTRY_URL: &str = "https://ui.shadcn.com/r";

/// Environment variable overriding the default registry base.
pub const REGISTRY_URL_ENV: &str = "REGISTRY_URL";

/// Environment variable holding a bearer token for the default registry.
pub const REGISTRY_TOKEN_ENV: &str = "REGISTRY_TOKEN";

/// Where a registry payload can be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// An HTTP(S) URL plus request headers.
    Url {
        url: String,
        headers: Vec<(String, String)>,
    },
    /// A JSON file on disk.
    File(PathBuf),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url { url, .. } => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A resolved reference to a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    pub location: Location,
    /// Items outside the default registry use `@/` imports relative to the
    /// registry root rather than `@/registry/<style>/`.
    pub remote: bool,
}

/// One registry: URL templates plus headers.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrySource {
    /// `@namespace` or `default`
    pub name: String,
    item_template: String,
    index_template: Option<String>,
    color_template: Option<String>,
    headers: BTreeMap<String, String>,
}

impl RegistrySource {
    /// The default registry rooted at `base`.
    pub fn default_at(base: &str, token: Option<&str>) -> Self {
        let base = base.trim_end_matches('/');
        let mut headers = BTreeMap::new();
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }

        Self {
            name: "default".to_string(),
            item_template: format!("{}/styles/{{style}}/{{name}}.json", base),
            index_template: Some(format!("{}/index.json", base)),
            color_template: Some(format!("{}/colors/{{color}}.json", base)),
            headers,
        }
    }

    /// A namespaced registry from a URL template.
    pub fn namespaced(
        namespace: &str,
        url_template: &str,
        headers: BTreeMap<String, String>,
    ) -> Self {
        Self {
            name: namespace.to_string(),
            item_template: url_template.to_string(),
            index_template: None,
            color_template: None,
            headers,
        }
    }

    fn headers(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(k, v)| (k.clone(), expand_env(v)))
            .collect()
    }

    fn locate(&self, expanded: String, root: &Path) -> Location {
        if is_url(&expanded) {
            Location::Url {
                url: expanded,
                headers: self.headers(),
            }
        } else {
            Location::File(root.join(expanded))
        }
    }
}

/// All registries known to a project.
#[derive(Debug, Clone)]
pub struct Sources {
    root: PathBuf,
    default: RegistrySource,
    namespaces: BTreeMap<String, RegistrySource>,
}

impl Sources {
    /// Sources for a loaded project, honoring `REGISTRY_URL` / `REGISTRY_TOKEN`.
    pub fn from_config(config: &ProjectConfig) -> Self {
        let base = std::env::var(REGISTRY_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string());
        let token = std::env::var(REGISTRY_TOKEN_ENV).ok();

        let mut sources = Self::new(config.cwd(), RegistrySource::default_at(&base, token.as_deref()));
        for (namespace, entry) in &config.raw.registries {
            sources.add_namespace(RegistrySource::namespaced(
                namespace,
                entry.url(),
                entry.headers(),
            ));
        }
        sources
    }

    /// Sources with only a default registry.
    pub fn new(root: &Path, default: RegistrySource) -> Self {
        Self {
            root: root.to_path_buf(),
            default,
            namespaces: BTreeMap::new(),
        }
    }

    pub fn add_namespace(&mut self, source: RegistrySource) {
        self.namespaces.insert(source.name.clone(), source);
    }

    /// Locate the payload for an item name.
    pub fn locate_item(&self, name: &str, style: &str) -> Result<ItemRef> {
        if is_url(name) {
            return Ok(ItemRef {
                location: Location::Url {
                    url: name.to_string(),
                    headers: Vec::new(),
                },
                remote: true,
            });
        }

        if name.ends_with(".json") {
            return Ok(ItemRef {
                location: Location::File(self.root.join(name)),
                remote: true,
            });
        }

        if let Some((namespace, item)) = split_namespace(name) {
            let source = self.namespaces.get(namespace).ok_or_else(|| {
                StencilError::ConfigValidationError {
                    message: format!(
                        "Unknown registry namespace '{}'. Add it to \"registries\" in components.json",
                        namespace
                    ),
                }
            })?;
            let expanded = fill(&source.item_template, &[("name", item), ("style", style)]);
            return Ok(ItemRef {
                location: source.locate(expanded, &self.root),
                remote: true,
            });
        }

        let expanded = fill(&self.default.item_template, &[("name", name), ("style", style)]);
        Ok(ItemRef {
            location: self.default.locate(expanded, &self.root),
            remote: false,
        })
    }

    /// Locate the default registry's index.
    pub fn locate_index(&self, style: &str) -> Option<Location> {
        self.default
            .index_template
            .as_ref()
            .map(|t| self.default.locate(fill(t, &[("style", style)]), &self.root))
    }

    /// Locate the theme variables for a base color.
    pub fn locate_base_color(&self, color: &str) -> Option<Location> {
        self.default
            .color_template
            .as_ref()
            .map(|t| self.default.locate(fill(t, &[("color", color)]), &self.root))
    }
}

/// Split `@ns/name` into `("@ns", "name")`.
fn split_namespace(name: &str) -> Option<(&str, &str)> {
    if !name.starts_with('@') {
        return None;
    }
    name.split_once('/').filter(|(_, item)| !item.is_empty())
}

fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), value)
    })
}

pub(crate) fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Whether a name refers to an item outside the default registry.
pub fn is_remote_name(name: &str) -> bool {
    is_url(name) || name.ends_with(".json") || split_namespace(name).is_some()
}

static ENV_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Replace `${VAR}` references with environment values (empty when unset).
pub fn expand_env(value: &str) -> String {
    ENV_REF.replace_all(value, |caps: &regex::Captures<'_>| {
        std::env::var(&caps[1]).unwrap_or_default()
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> Sources {
        let mut sources = Sources::new(
            Path::new("/app"),
            RegistrySource::default_at("https://registry.test/r/", None),
        );
        sources.add_namespace(RegistrySource::namespaced(
            "@acme",
            "https://acme.test/{style}/{name}.json",
            BTreeMap::new(),
        ));
        sources
    }

    #[test]
    fn plain_name_uses_default_style_path() {
        let item = sources().locate_item("button", "new-york").unwrap();
        assert_eq!(
            item.location.to_string(),
            "https://registry.test/r/styles/new-york/button.json"
        );
        assert!(!item.remote);
    }

    #[test]
    fn namespaced_name_uses_namespace_template() {
        let item = sources().locate_item("@acme/login-form", "default").unwrap();
        assert_eq!(
            item.location.to_string(),
            "https://acme.test/default/login-form.json"
        );
        assert!(item.remote);
    }

    #[test]
    fn unknown_namespace_is_config_error() {
        let err = sources().locate_item("@nope/button", "default").unwrap_err();
        assert!(err.to_string().contains("@nope"));
    }

    #[test]
    fn urls_and_json_paths_are_direct() {
        let url = sources()
            .locate_item("https://example.test/r/card.json", "default")
            .unwrap();
        assert_eq!(url.location.to_string(), "https://example.test/r/card.json");

        let file = sources().locate_item("./local/card.json", "default").unwrap();
        assert_eq!(file.location, Location::File(PathBuf::from("/app/./local/card.json")));
    }

    #[test]
    fn local_base_is_a_directory() {
        let sources = Sources::new(
            Path::new("/app"),
            RegistrySource::default_at("registry", None),
        );
        let item = sources.locate_item("button", "default").unwrap();
        assert_eq!(
            item.location,
            Location::File(PathBuf::from("/app/registry/styles/default/button.json"))
        );
        assert_eq!(
            sources.locate_index("default"),
            Some(Location::File(PathBuf::from("/app/registry/index.json")))
        );
    }

    #[test]
    fn token_becomes_bearer_header() {
        let sources = Sources::new(
            Path::new("/app"),
            RegistrySource::default_at("https://registry.test/r", Some("s3cret")),
        );
        match sources.locate_item("button", "default").unwrap().location {
            Location::Url { headers, .. } => assert_eq!(
                headers,
                vec![("Authorization".to_string(), "Bearer s3cret".to_string())]
            ),
            other => panic!("expected url, got {:?}", other),
        }
    }

    #[test]
    fn remote_names() {
        assert!(is_remote_name("@acme/button"));
        assert!(is_remote_name("https://example.test/card.json"));
        assert!(is_remote_name("./card.json"));
        assert!(!is_remote_name("button"));
        assert!(!is_remote_name("@acme"));
    }

    #[test]
    fn base_color_location() {
        assert_eq!(
            sources().locate_base_color("zinc").unwrap().to_string(),
            "https://registry.test/r/colors/zinc.json"
        );
    }

    #[test]
    fn expand_env_substitutes_and_blanks_missing() {
        std::env::set_var("STENCIL_TEST_EXPAND_TOKEN", "abc");
        assert_eq!(
            expand_env("Bearer ${STENCIL_TEST_EXPAND_TOKEN}"),
            "Bearer abc"
        );
        assert_eq!(expand_env("x-${STENCIL_TEST_UNSET_VAR_42}-y"), "x--y");
    }
}
