//! Stencil - copy UI components from a registry into your project.
//!
//! Stencil resolves named items from a component registry together with
//! their registry dependencies, rewrites each file for the host project
//! (import aliases, class prefixes, client directives), writes the results
//! into the configured directories, merges theme variables into the global
//! stylesheet, and installs the npm packages the items need.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - `components.json` loading and alias resolution
//! - [`error`] - Error types and result aliases
//! - [`install`] - Target planning, file writing, and package installs
//! - [`registry`] - Registry sources, fetching, and dependency resolution
//! - [`shell`] - Subprocess execution
//! - [`transform`] - Per-file source rewriting and stylesheet merging
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use stencil::registry::{resolve, InMemoryCatalog, RegistryItem};
//!
//! let item: RegistryItem = serde_json::from_value(serde_json::json!({
//!     "name": "button",
//!     "type": "registry:ui",
//!     "dependencies": ["@radix-ui/react-slot"]
//! }))
//! .unwrap();
//! let catalog = InMemoryCatalog::new().with_item(item);
//!
//! let set = resolve(&["button".to_string()], "new-york", &catalog).unwrap();
//! assert_eq!(set.names(), vec!["button"]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod install;
pub mod registry;
pub mod shell;
pub mod transform;
pub mod ui;

pub use error::{Result, StencilError};
