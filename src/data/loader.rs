//! Fetching feature collections for attached layers
//!
//! The viewer never fetches on its own. Hosts ask it which layers are waiting
//! for data (`PendingLoad`), fetch them with any `FeatureFetcher`, and hand the
//! bodies back.

use crate::prelude::HashMap;
use crate::{MapError, Result};
use async_trait::async_trait;
use reqwest::Url;

/// A load the viewer is waiting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    pub layer_id: String,
    pub url: String,
    /// Attach generation the result must match to be applied
    pub generation: u64,
}

/// Anything that can turn a feature-collection URL into its body
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FeatureFetcher {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches over HTTP, resolving relative URLs against an optional base
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base: Option<Url>,
}

impl HttpFetcher {
    pub fn new(base: Option<&str>) -> Result<Self> {
        let base = base
            .map(|b| {
                Url::parse(b).map_err(|e| MapError::Config(format!("invalid base url '{}': {}", b, e)))
            })
            .transpose()?;

        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    pub fn resolve(&self, url: &str) -> Result<Url> {
        match (Url::parse(url), &self.base) {
            (Ok(absolute), _) => Ok(absolute),
            (Err(_), Some(base)) => base
                .join(url)
                .map_err(|e| MapError::Config(format!("cannot resolve '{}': {}", url, e))),
            (Err(e), None) => Err(MapError::Config(format!(
                "relative url '{}' needs a base url: {}",
                url, e
            ))),
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FeatureFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let resolved = self.resolve(url)?;
        log::debug!("fetching features from {}", resolved);

        let response = self.client.get(resolved).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Serves bodies from memory, for embedded data and tests
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FeatureFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| MapError::Unavailable(url.to_string()))
    }
}
