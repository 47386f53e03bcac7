use std::time::Duration;

use commonpid_core::{doi_prefix, Doi, Work, WorkStore};
use serde::Deserialize;

use crate::error::{MetadataError, Result};
use crate::http::{head_location, RateLimitedClient};

const USER_AGENT: &str = "commonpid/0.1";

#[derive(Debug, Clone, Default, Deserialize)]
struct RaEntry {
    #[serde(rename = "DOI", default)]
    #[allow(dead_code)]
    doi: String,
    #[serde(rename = "RA", default)]
    ra: String,
}

/// Client for the public DOI handle service at doi.org: registration
/// agency lookup per prefix, and landing-page resolution via HEAD.
pub struct HandleClient {
    client: RateLimitedClient,
    base_url: String,
}

impl HandleClient {
    pub fn new() -> Result<Self> {
        Self::with_base("https://doi.org")
    }

    pub fn with_base(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: RateLimitedClient::new(Duration::from_millis(100), 2, USER_AGENT)?,
            base_url: base_url.to_string(),
        })
    }

    /// The registration agency name for a DOI prefix, or empty when
    /// the handle service does not know it or answers with an
    /// unexpected shape. Absence is not an error.
    pub async fn ra_for_prefix(&self, prefix: &str) -> String {
        let url = format!("{}/ra/{}", self.base_url, prefix);
        match self.client.get_json::<Vec<RaEntry>>(&url).await {
            Ok(entries) => entries.first().map(|e| e.ra.clone()).unwrap_or_default(),
            Err(e) => {
                tracing::debug!(prefix, error = %e, "handle RA lookup failed");
                String::new()
            }
        }
    }

    /// Resolve the landing URL for a DOI without following the
    /// redirect chain.
    pub async fn resolve_landing(&self, doi: &Doi) -> Result<Option<String>> {
        let url = format!("{}/{}", self.base_url, doi.value);
        head_location(&url, USER_AGENT).await
    }
}

/// Determines the registration agency for a pid: first from works
/// already stored under the same DOI prefix, then from the handle
/// service.
pub struct RegistryProbe {
    handle: HandleClient,
}

impl RegistryProbe {
    pub fn new(handle: HandleClient) -> Self {
        Self { handle }
    }

    /// The provider name for a pid (`"Crossref"`, `"DataCite"`, ...),
    /// or empty when the pid is not a DOI or no agency is known.
    pub async fn provider_for(&self, store: &WorkStore, pid: &str) -> Result<String> {
        let Some(prefix) = doi_prefix(pid) else {
            return Ok(String::new());
        };

        let pattern = format!("https://doi.org/{prefix}%");
        if let Some(work) = store.find_by_prefix(&pattern).await? {
            return Ok(work.provider);
        }

        let ra = self.handle.ra_for_prefix(&prefix).await;
        tracing::info!(pid, ra = %ra, "registration agency resolved from handle service");
        Ok(ra)
    }

    /// Create and store a minimal record for a DOI pid: landing URL
    /// from the handle redirect, provider from the registry.
    pub async fn create_minimal_work(&self, store: &WorkStore, pid: &str) -> Result<Work> {
        let doi =
            Doi::from_pid(pid).ok_or_else(|| MetadataError::InvalidDoi(pid.to_string()))?;
        let url = self.handle.resolve_landing(&doi).await?.unwrap_or_default();
        let provider = self.provider_for(store, pid).await?;
        let work = Work::minimal(pid, url, provider);
        Ok(store.upsert(&work).await?)
    }
}
