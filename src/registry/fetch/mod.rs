//! Registry payload fetching from HTTP and local sources.

pub mod file;
pub mod http;

pub use file::read_local;
pub use http::{FetchResponse, HttpFetcher};

use serde_json::Value;

use crate::error::{Result, StencilError};
use crate::registry::source::Location;

/// Fetch and parse the JSON at `location` on behalf of item `name`.
pub fn fetch_json(http: &HttpFetcher, name: &str, location: &Location) -> Result<Value> {
    let content = match location {
        Location::Url { url, headers } => http.fetch(name, url, headers)?.content,
        Location::File(path) => read_local(name, path)?,
    };

    serde_json::from_str(&content).map_err(|e| StencilError::Schema {
        name: name.to_string(),
        errors: vec![format!("invalid JSON from {}: {}", location, e)],
    })
}
