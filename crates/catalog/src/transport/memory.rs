//! Canned-response fetcher for tests and offline runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{Fetch, TransportError};

/// In-memory [`Fetch`] that serves registered bodies and records every request.
///
/// Unknown URLs answer with status 404. Clones share the same responses and
/// request log.
#[derive(Clone, Default)]
pub struct StaticFetcher {
    responses: Arc<Mutex<HashMap<String, String>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the body served for `url`.
    pub fn respond(&self, url: impl Into<String>, body: impl Into<String>) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(url.into(), body.into());
        self
    }

    /// Stop serving `url`.
    pub fn forget(&self, url: &str) {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(url);
    }

    /// Every URL requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of requests made for `url`.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|seen| *seen == url).count()
    }

    pub fn clear_requests(&self) {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl Fetch for StaticFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(url.to_string());

        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
