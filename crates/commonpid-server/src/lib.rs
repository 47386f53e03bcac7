pub mod negotiate;
pub mod redirects;
pub mod resolver;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use commonpid_core::WorkStore;
use commonpid_metadata::{CrossrefClient, DataciteClient, HandleClient, RegistryProbe};

pub use negotiate::{negotiate, Negotiation};
pub use resolver::{resolve, ResolveError, NATIVE_TYPES};

pub const DEFAULT_DOCS_HOST: &str = "https://docs.commonpid.org";

/// Shared application state: the work store and the upstream clients.
pub struct AppState {
    pub store: WorkStore,
    pub crossref: CrossrefClient,
    pub datacite: DataciteClient,
    pub probe: RegistryProbe,
    pub docs_host: String,
}

impl AppState {
    pub fn new(
        store: WorkStore,
        docs_host: String,
        polite_email: Option<&str>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            store,
            crossref: CrossrefClient::new(polite_email)?,
            datacite: DataciteClient::new()?,
            probe: RegistryProbe::new(HandleClient::new()?),
            docs_host,
        })
    }
}

/// The full application router: legacy redirects plus the resolver
/// catch-all.
pub fn app_router(state: Arc<AppState>) -> Router {
    let router = Router::new();
    let router = redirects::register(router, &state.docs_host);
    router
        .route("/{*segment}", get(resolve))
        .with_state(state)
}
