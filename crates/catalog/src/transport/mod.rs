//! Remote content fetch seam.
//!
//! Acquisition only needs "GET this URL as text". Keeping that behind
//! [`Fetch`] lets tests run the whole pipeline against canned payloads.

mod http;
mod memory;

pub use http::{DEFAULT_TIMEOUT, HttpFetcher};
pub use memory::StaticFetcher;

use thiserror::Error;

/// Transport failures. Acquisition treats them as opaque and never retries.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read response body from {url}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Blocking text fetch.
pub trait Fetch: Send + Sync {
    /// Fetch `url` and return the response body as text.
    fn fetch_text(&self, url: &str) -> Result<String, TransportError>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    fn fetch_text(&self, url: &str) -> Result<String, TransportError> {
        (**self).fetch_text(url)
    }
}
