use async_trait::async_trait;
use commonpid_core::{Doi, Work};

use crate::error::Result;

pub mod crossref;
pub mod datacite;
pub mod handle;

pub use crossref::CrossrefClient;
pub use datacite::DataciteClient;
pub use handle::{HandleClient, RegistryProbe};

/// A registration agency API that can produce a normalized Work for a
/// DOI it registered.
#[async_trait]
pub trait UpstreamAdapter: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_work(&self, doi: &Doi) -> Result<Work>;
}
