//! Catalog access with per-run memoization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{Result, StencilError};
use crate::registry::fetch::{fetch_json, HttpFetcher};
use crate::registry::schema::{parse_index, parse_item, BaseColor, IndexEntry, RegistryItem};
use crate::registry::source::Sources;

/// Read access to a registry.
pub trait Catalog: Send + Sync {
    /// Fetch one item by name for a style.
    fn fetch_item(&self, name: &str, style: &str) -> Result<Arc<RegistryItem>>;

    /// Fetch the summary index for a style.
    fn fetch_index(&self, style: &str) -> Result<Vec<IndexEntry>>;
}

/// Catalog backed by HTTP or local registry sources.
///
/// Items are cached per `(name, style)` for the lifetime of the client, so a
/// name reached twice during resolution costs one request.
pub struct CatalogClient {
    sources: Sources,
    http: HttpFetcher,
    cache: Mutex<HashMap<(String, String), Arc<RegistryItem>>>,
}

impl CatalogClient {
    pub fn new(sources: Sources) -> Self {
        Self::with_fetcher(sources, HttpFetcher::new())
    }

    pub fn with_fetcher(sources: Sources, http: HttpFetcher) -> Self {
        Self {
            sources,
            http,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn sources(&self) -> &Sources {
        &self.sources
    }

    /// Fetch the theme variables for a base color.
    pub fn fetch_base_color(&self, color: &str) -> Result<BaseColor> {
        let location = self.sources.locate_base_color(color).ok_or_else(|| {
            StencilError::ConfigValidationError {
                message: "The default registry does not provide base colors".to_string(),
            }
        })?;
        let value = fetch_json(&self.http, color, &location)?;
        serde_json::from_value(value).map_err(|e| StencilError::Schema {
            name: color.to_string(),
            errors: vec![e.to_string()],
        })
    }

    fn cached(&self, key: &(String, String)) -> Option<Arc<RegistryItem>> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(key).cloned()
    }
}

impl Catalog for CatalogClient {
    fn fetch_item(&self, name: &str, style: &str) -> Result<Arc<RegistryItem>> {
        let key = (name.to_string(), style.to_string());
        if let Some(item) = self.cached(&key) {
            tracing::debug!("Cache hit for {} ({})", name, style);
            return Ok(item);
        }

        let item_ref = self.sources.locate_item(name, style)?;
        let value = fetch_json(&self.http, name, &item_ref.location)?;
        let item = Arc::new(parse_item(name, value)?);

        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        Ok(cache.entry(key).or_insert(item).clone())
    }

    fn fetch_index(&self, style: &str) -> Result<Vec<IndexEntry>> {
        let location = self.sources.locate_index(style).ok_or_else(|| {
            StencilError::ConfigValidationError {
                message: "The default registry does not provide an index".to_string(),
            }
        })?;
        parse_index(fetch_json(&self.http, "index", &location)?)
    }
}

/// A catalog held entirely in memory.
///
/// Useful for dry runs and for exercising resolution without a registry.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    items: HashMap<String, Arc<RegistryItem>>,
    requests: Mutex<Vec<String>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item, keyed by its name.
    pub fn with_item(mut self, item: RegistryItem) -> Self {
        self.items.insert(item.name.clone(), Arc::new(item));
        self
    }

    /// Add an item under a lookup key other than its name.
    pub fn with_alias(mut self, key: &str, item: RegistryItem) -> Self {
        self.items.insert(key.to_string(), Arc::new(item));
        self
    }

    /// Names requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Catalog for InMemoryCatalog {
    fn fetch_item(&self, name: &str, _style: &str) -> Result<Arc<RegistryItem>> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(name.to_string());
        self.items
            .get(name)
            .cloned()
            .ok_or_else(|| StencilError::NotFound {
                name: name.to_string(),
                location: "memory".to_string(),
            })
    }

    fn fetch_index(&self, _style: &str) -> Result<Vec<IndexEntry>> {
        let mut entries: Vec<IndexEntry> = self
            .items
            .values()
            .map(|item| IndexEntry {
                name: item.name.clone(),
                item_type: item.item_type,
                description: item.description.clone(),
                registry_dependencies: item.registry_dependencies.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries.dedup_by(|a, b| a.name == b.name);
        Ok(entries)
    }
}
