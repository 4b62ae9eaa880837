//! Project configuration loading and alias resolution.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - `components.json` loading in [`loader`]
//! - tsconfig path mapping in [`paths`]
//!
//! # Example
//!
//! ```
//! use stencil::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(
//!     temp.path().join("components.json"),
//!     r#"{
//!         "style": "new-york",
//!         "tailwind": { "css": "app/globals.css" },
//!         "aliases": { "components": "@/components", "utils": "@/lib/utils" }
//!     }"#,
//! ).unwrap();
//! fs::write(
//!     temp.path().join("tsconfig.json"),
//!     r#"{ "compilerOptions": { "paths": { "@/*": ["./*"] } } }"#,
//! ).unwrap();
//!
//! let config = load_config(temp.path()).unwrap();
//! assert!(config.resolved.ui.unwrap().ends_with("components/ui"));
//! ```

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::{
    config_path, load_config, load_raw_config, parse_config, resolve_config, utils_directory,
    write_config,
};
pub use paths::{normalize_path, strip_jsonc, PathMapping};
pub use schema::{
    AliasKey, Aliases, ProjectConfig, RawConfig, RegistryEntry, ResolvedPaths, TailwindConfig,
    CONFIG_FILE,
};
