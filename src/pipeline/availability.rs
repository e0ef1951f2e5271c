//! Reachability of external URLs.

use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use rustc_hash::FxHashMap;

/// Answers whether a URL can be fetched.
///
/// Implementations apply their own timeout and retry policy.
pub trait LinkAvailabilityChecker: Send + Sync {
    fn check_reachable(&self, url: &str) -> bool;
}

/// HTTP checker: `HEAD` first, `GET` when the server refuses `HEAD`.
///
/// Answers are cached per URL for the lifetime of the checker.
pub struct HttpChecker {
    client: Client,
    cache: Mutex<FxHashMap<String, bool>>,
}

impl HttpChecker {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(10))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            cache: Mutex::new(FxHashMap::default()),
        })
    }

    /// Cached answer for `url`, if it was already checked.
    pub fn cached(&self, url: &str) -> Option<bool> {
        self.cache.lock().get(url).copied()
    }

    fn fetch(&self, url: &str) -> bool {
        match self.client.head(url).send() {
            Ok(response) if response.status().is_success() => true,
            // some servers reject HEAD but serve GET
            _ => self
                .client
                .get(url)
                .send()
                .is_ok_and(|response| response.status().is_success()),
        }
    }
}

impl LinkAvailabilityChecker for HttpChecker {
    fn check_reachable(&self, url: &str) -> bool {
        if let Some(reachable) = self.cached(url) {
            return reachable;
        }
        let reachable = self.fetch(url);
        self.cache.lock().insert(url.to_string(), reachable);
        reachable
    }
}
