//! Registry access for stencil.
//!
//! This module handles everything between an item name and a validated
//! [`RegistryItem`]:
//! - Locating items in the default, namespaced, or direct sources ([`source`])
//! - Fetching payloads over HTTP or from disk ([`fetch`])
//! - Validating payloads against the item schema ([`schema`])
//! - Memoized catalog access ([`client`])
//! - Dependency closure ([`resolver`])
//!
//! # Example
//!
//! ```
//! use stencil::registry::{resolve, InMemoryCatalog, ItemType, RegistryItem};
//!
//! let item: RegistryItem = serde_json::from_value(serde_json::json!({
//!     "name": "button",
//!     "type": "registry:ui",
//!     "dependencies": ["clsx"]
//! })).unwrap();
//! let catalog = InMemoryCatalog::new().with_item(item);
//!
//! let set = resolve(&["button".to_string()], "new-york", &catalog).unwrap();
//! assert_eq!(set.names(), vec!["button"]);
//! assert_eq!(set.items()[0].item.item_type, ItemType::Ui);
//! ```

pub mod client;
pub mod fetch;
pub mod resolver;
pub mod schema;
pub mod source;

pub use client::{Catalog, CatalogClient, InMemoryCatalog};
pub use fetch::{fetch_json, FetchResponse, HttpFetcher};
pub use resolver::{package_name, resolve, DependencySet, ResolvedItem, ResolvedSet, INDEX_ITEM};
pub use schema::{
    parse_index, parse_item, validate_item, BaseColor, CssVars, IndexEntry, ItemType,
    RegistryFile, RegistryItem,
};
pub use source::{
    expand_env, is_remote_name, ItemRef, Location, RegistrySource, Sources, DEFAULT_REGISTRY_URL,
    REGISTRY_TOKEN_ENV, REGISTRY_URL_ENV,
};
