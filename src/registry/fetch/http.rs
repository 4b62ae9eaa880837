//! HTTP registry fetching.
//!
//! Provides a blocking HTTP client that reads registry JSON and classifies
//! failures into not-found, auth, and transport errors.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;

use crate::error::{Result, StencilError};

/// Fetches registry payloads over HTTP/HTTPS.
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

/// Response from fetching a payload.
#[derive(Debug)]
pub struct FetchResponse {
    /// The response body.
    pub content: String,
    /// HTTP status code.
    pub status: u16,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher with default 30-second timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a new HTTP fetcher with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(concat!("stencil/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, timeout }
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch `url` on behalf of item `name`.
    ///
    /// # Errors
    ///
    /// - `NotFound` for HTTP 404
    /// - `Transport` for any other failure, with a hint for 401/403
    pub fn fetch(
        &self,
        name: &str,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<FetchResponse> {
        let mut request = self.client.get(url);
        for (key, value) in headers {
            request = request.header(key.as_str(), value.as_str());
        }

        tracing::debug!("GET {}", url);
        let response = request.send().map_err(|e| StencilError::Transport {
            location: url.to_string(),
            message: describe_send_error(&e),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(name, url, status));
        }

        let content = response.text().map_err(|e| StencilError::Transport {
            location: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(FetchResponse {
            content,
            status: status.as_u16(),
        })
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn describe_send_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("could not connect ({})", err)
    } else {
        err.to_string()
    }
}

fn classify_status(name: &str, url: &str, status: StatusCode) -> StencilError {
    let message = match status {
        StatusCode::NOT_FOUND => {
            return StencilError::NotFound {
                name: name.to_string(),
                location: url.to_string(),
            }
        }
        StatusCode::UNAUTHORIZED => {
            "HTTP 401 Unauthorized. Check the token or headers configured for this registry"
                .to_string()
        }
        StatusCode::FORBIDDEN => {
            "HTTP 403 Forbidden. Your credentials do not grant access to this item".to_string()
        }
        other => format!("HTTP {}", other),
    };

    StencilError::Transport {
        location: url.to_string(),
        message,
    }
}
