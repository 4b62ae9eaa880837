//! Registry item schema definitions.
//!
//! Registry payloads arrive as loosely shaped JSON. They are checked field by
//! field with [`validate_item`] before being deserialized into the typed
//! [`RegistryItem`], so a bad payload reports every problem at once.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StencilError};

/// Kind of registry item or file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    #[serde(rename = "registry:ui")]
    Ui,
    #[serde(rename = "registry:block")]
    Block,
    #[serde(rename = "registry:component")]
    Component,
    #[serde(rename = "registry:hook")]
    Hook,
    #[serde(rename = "registry:lib")]
    Lib,
    #[serde(rename = "registry:page")]
    Page,
    #[serde(rename = "registry:example")]
    Example,
    #[serde(rename = "registry:theme")]
    Theme,
    #[serde(rename = "registry:css")]
    Css,
    #[serde(rename = "registry:style")]
    Style,
    #[serde(rename = "registry:file")]
    File,
}

impl ItemType {
    pub const ALL: [ItemType; 11] = [
        Self::Ui,
        Self::Block,
        Self::Component,
        Self::Hook,
        Self::Lib,
        Self::Page,
        Self::Example,
        Self::Theme,
        Self::Css,
        Self::Style,
        Self::File,
    ];

    /// Wire name, e.g. `registry:ui`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ui => "registry:ui",
            Self::Block => "registry:block",
            Self::Component => "registry:component",
            Self::Hook => "registry:hook",
            Self::Lib => "registry:lib",
            Self::Page => "registry:page",
            Self::Example => "registry:example",
            Self::Theme => "registry:theme",
            Self::Css => "registry:css",
            Self::Style => "registry:style",
            Self::File => "registry:file",
        }
    }

    /// Whether files of this type are stylesheets rather than scripts.
    pub fn is_stylesheet(&self) -> bool {
        matches!(self, Self::Css)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown item type \"{}\"", s))
    }
}

/// A file shipped by a registry item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryFile {
    /// Path inside the registry, e.g. `registry/new-york/ui/button.tsx`
    pub path: String,

    /// File source; absent in index payloads
    #[serde(default)]
    pub content: Option<String>,

    /// Declared role of the file
    #[serde(rename = "type")]
    pub file_type: ItemType,

    /// Explicit destination relative to the project root
    #[serde(default)]
    pub target: Option<String>,
}

/// Theme variables keyed by scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CssVars {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub theme: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub light: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dark: BTreeMap<String, String>,
}

impl CssVars {
    pub fn is_empty(&self) -> bool {
        self.theme.is_empty() && self.light.is_empty() && self.dark.is_empty()
    }

    /// Overlay `other` on top of `self`; later values win per key.
    pub fn merge(&mut self, other: &CssVars) {
        for (k, v) in &other.theme {
            self.theme.insert(k.clone(), v.clone());
        }
        for (k, v) in &other.light {
            self.light.insert(k.clone(), v.clone());
        }
        for (k, v) in &other.dark {
            self.dark.insert(k.clone(), v.clone());
        }
    }
}

/// A named, typed unit in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryItem {
    pub name: String,

    #[serde(rename = "type")]
    pub item_type: ItemType,

    #[serde(default)]
    pub description: Option<String>,

    /// External runtime packages
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Packages installed as development dependencies
    #[serde(default)]
    pub dev_dependencies: Vec<String>,

    /// Other registry items this one needs
    #[serde(default)]
    pub registry_dependencies: Vec<String>,

    #[serde(default)]
    pub files: Vec<RegistryFile>,

    #[serde(default)]
    pub css_vars: CssVars,

    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl RegistryItem {
    /// Whether the item asks for a client-side execution directive.
    pub fn needs_client_directive(&self) -> bool {
        self.meta
            .get("client")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// An entry of the registry index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub name: String,

    #[serde(rename = "type")]
    pub item_type: ItemType,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub registry_dependencies: Vec<String>,
}

/// Theme variables for a base color.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseColor {
    #[serde(default)]
    pub css_vars: CssVars,
}

/// Check a raw item payload, returning one message per violation.
pub fn validate_item(value: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(obj) = value.as_object() else {
        errors.push("(root): expected an object".to_string());
        return errors;
    };

    match obj.get("name") {
        Some(Value::String(s)) if !s.trim().is_empty() => {}
        Some(Value::String(_)) => errors.push("name: must not be empty".to_string()),
        Some(_) => errors.push("name: expected a string".to_string()),
        None => errors.push("name: required".to_string()),
    }

    check_type(obj.get("type"), "type", &mut errors);
    check_string_array(obj.get("dependencies"), "dependencies", &mut errors);
    check_string_array(obj.get("devDependencies"), "devDependencies", &mut errors);
    check_string_array(
        obj.get("registryDependencies"),
        "registryDependencies",
        &mut errors,
    );

    match obj.get("files") {
        None | Some(Value::Null) => {}
        Some(Value::Array(files)) => {
            for (i, file) in files.iter().enumerate() {
                check_file(file, &format!("files[{}]", i), &mut errors);
            }
        }
        Some(_) => errors.push("files: expected an array".to_string()),
    }

    match obj.get("cssVars") {
        None | Some(Value::Null) => {}
        Some(Value::Object(scopes)) => {
            for (scope, vars) in scopes {
                if !matches!(scope.as_str(), "theme" | "light" | "dark") {
                    errors.push(format!("cssVars.{}: unknown scope", scope));
                    continue;
                }
                match vars.as_object() {
                    Some(vars) => {
                        for (key, v) in vars {
                            if !v.is_string() {
                                errors.push(format!("cssVars.{}.{}: expected a string", scope, key));
                            }
                        }
                    }
                    None => errors.push(format!("cssVars.{}: expected an object", scope)),
                }
            }
        }
        Some(_) => errors.push("cssVars: expected an object".to_string()),
    }

    if let Some(meta) = obj.get("meta") {
        if !meta.is_object() && !meta.is_null() {
            errors.push("meta: expected an object".to_string());
        }
    }

    errors
}

fn check_file(file: &Value, field: &str, errors: &mut Vec<String>) {
    let Some(obj) = file.as_object() else {
        errors.push(format!("{}: expected an object", field));
        return;
    };

    match obj.get("path") {
        Some(Value::String(s)) if !s.is_empty() => {}
        Some(Value::String(_)) => errors.push(format!("{}.path: must not be empty", field)),
        Some(_) => errors.push(format!("{}.path: expected a string", field)),
        None => errors.push(format!("{}.path: required", field)),
    }
    check_type(obj.get("type"), &format!("{}.type", field), errors);
    for key in ["content", "target"] {
        if let Some(v) = obj.get(key) {
            if !v.is_string() && !v.is_null() {
                errors.push(format!("{}.{}: expected a string", field, key));
            }
        }
    }
}

fn check_type(value: Option<&Value>, field: &str, errors: &mut Vec<String>) {
    match value {
        Some(Value::String(s)) => {
            if let Err(e) = s.parse::<ItemType>() {
                errors.push(format!("{}: {}", field, e));
            }
        }
        Some(_) => errors.push(format!("{}: expected a string", field)),
        None => errors.push(format!("{}: required", field)),
    }
}

fn check_string_array(value: Option<&Value>, field: &str, errors: &mut Vec<String>) {
    match value {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                if !item.is_string() {
                    errors.push(format!("{}[{}]: expected a string", field, i));
                }
            }
        }
        Some(_) => errors.push(format!("{}: expected an array", field)),
    }
}

/// Validate and deserialize a raw item payload fetched for `name`.
pub fn parse_item(name: &str, value: Value) -> Result<RegistryItem> {
    let errors = validate_item(&value);
    if !errors.is_empty() {
        return Err(StencilError::Schema {
            name: name.to_string(),
            errors,
        });
    }

    serde_json::from_value(value).map_err(|e| StencilError::Schema {
        name: name.to_string(),
        errors: vec![e.to_string()],
    })
}

/// Validate and deserialize a registry index payload.
pub fn parse_index(value: Value) -> Result<Vec<IndexEntry>> {
    let Value::Array(entries) = value else {
        return Err(StencilError::Schema {
            name: "index".to_string(),
            errors: vec!["(root): expected an array".to_string()],
        });
    };

    let mut errors = Vec::new();
    let mut parsed = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<IndexEntry>(entry) {
            Ok(e) => parsed.push(e),
            Err(e) => errors.push(format!("[{}]: {}", i, e)),
        }
    }

    if errors.is_empty() {
        Ok(parsed)
    } else {
        Err(StencilError::Schema {
            name: "index".to_string(),
            errors,
        })
    }
}
