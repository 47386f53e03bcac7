//! The resolver: look up a pid, populate from the registration agency
//! on a miss, and serve the negotiated representation.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use commonpid_core::{CoreError, RegistrationAgency, Work};
use commonpid_metadata::{
    write_csl, write_datacite, write_schema_org, write_unixref, MetadataError, UpstreamAdapter,
};
use serde_json::json;
use thiserror::Error;

use crate::negotiate::{negotiate, Negotiation};
use crate::AppState;

/// Content types served without delegating to the registration
/// agency's own negotiation service.
pub const NATIVE_TYPES: &[&str] = &[
    "text/html",
    "application/vnd.commonmeta+json",
    "application/json",
    "application/vnd.datacite.datacite+json",
    "application/vnd.citationstyles.csl+json",
    "application/vnd.crossref.unixsd+xml",
    "application/vnd.schemaorg.ld+json",
    "text/markdown",
    "application/vnd.jats+xml",
    "application/xml",
    "application/pdf",
];

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid identifier: {0}")]
    MalformedIdentifier(String),

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    UpstreamFetch(String),

    #[error("{0} version not available")]
    UnavailableArtifact(&'static str),

    #[error("Content-Type {0} not supported")]
    UnsupportedContentType(String),

    #[error("Work not yet converted to Commonmeta format")]
    NotYetNormalized,

    #[error("storage error: {0}")]
    Store(#[from] CoreError),
}

impl ResolveError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MalformedIdentifier(_) | Self::UpstreamFetch(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::UnavailableArtifact(_)
            | Self::UnsupportedContentType(_)
            | Self::NotYetNormalized => StatusCode::NOT_ACCEPTABLE,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        if let Self::Store(e) = &self {
            tracing::error!(error = %e, "store operation failed");
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// 302 with an exact Location, as the delegation templates require.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Path(segment): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ResolveError> {
    if segment.is_empty() {
        return Err(ResolveError::NotFound);
    }
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let negotiation =
        negotiate(&segment, accept).map_err(|e| ResolveError::MalformedIdentifier(e.to_string()))?;

    let mut work = state.store.find_by_pid(&negotiation.pid).await?;
    if work.is_none() {
        work = populate(&state, &negotiation).await?;
    }

    // Unsupported types are delegated to the agency's own content
    // negotiation; without a known agency there is nothing to serve.
    if !NATIVE_TYPES.contains(&negotiation.content_type.as_str()) {
        let ra = provider(&state, &negotiation.pid).await?;
        return match RegistrationAgency::parse(&ra) {
            Some(RegistrationAgency::Crossref) => Ok(found(&format!(
                "https://api.crossref.org/works/{}/transform/{}",
                negotiation.doi_suffix, negotiation.content_type
            ))),
            Some(RegistrationAgency::DataCite) => Ok(found(&format!(
                "https://data.crosscite.org/{}/{}",
                negotiation.content_type, negotiation.doi_suffix
            ))),
            None => Err(ResolveError::NotFound),
        };
    }

    let work = work.ok_or(ResolveError::NotFound)?;

    if negotiation.content_type == "text/html" {
        return Ok(found(&work.url));
    }

    // Everything below needs normalized metadata.
    if work.is_minimal() {
        return Err(ResolveError::NotYetNormalized);
    }

    match negotiation.content_type.as_str() {
        "application/vnd.commonmeta+json" | "application/json" => {
            let body = commonmeta_body(&state, &work).await?;
            Ok(Json(body).into_response())
        }
        "application/vnd.citationstyles.csl+json" => Ok(Json(write_csl(&work)).into_response()),
        "application/vnd.schemaorg.ld+json" => Ok(Json(write_schema_org(&work)).into_response()),
        "application/vnd.datacite.datacite+json" => Ok(Json(write_datacite(&work)).into_response()),
        "application/vnd.crossref.unixsd+xml" => {
            let xml = write_unixref(&work).map_err(|_| {
                ResolveError::UnsupportedContentType(negotiation.content_type.clone())
            })?;
            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/vnd.crossref.unixsd+xml")],
                xml,
            )
                .into_response())
        }
        "text/markdown" => match work.file_url("text/markdown") {
            Some(url) => Ok(found(url)),
            None => Err(ResolveError::UnavailableArtifact("Markdown")),
        },
        "application/pdf" => match work.file_url("application/pdf") {
            Some(url) => Ok(found(url)),
            None => Err(ResolveError::UnavailableArtifact("PDF")),
        },
        "application/vnd.jats+xml" | "application/xml" => {
            let url = work
                .file_url("application/xml")
                .or_else(|| work.file_url("application/vnd.jats+xml"));
            match url {
                Some(url) => Ok(found(url)),
                None => Err(ResolveError::UnavailableArtifact("JATS XML")),
            }
        }
        other => Err(ResolveError::UnsupportedContentType(other.to_string())),
    }
}

/// S4: resolve the registration agency and fetch from its API. Only
/// Crossref and DataCite DOIs can be populated.
async fn populate(
    state: &AppState,
    negotiation: &Negotiation,
) -> Result<Option<Work>, ResolveError> {
    let Some(doi) = &negotiation.doi else {
        return Ok(None);
    };
    let ra = provider(state, &negotiation.pid).await?;
    let adapter: &dyn UpstreamAdapter = match RegistrationAgency::parse(&ra) {
        Some(RegistrationAgency::Crossref) => &state.crossref,
        Some(RegistrationAgency::DataCite) => &state.datacite,
        None => return Ok(None),
    };

    tracing::info!(pid = %negotiation.pid, agency = %ra, "not found locally, fetching upstream");
    let fetched = adapter
        .fetch_work(doi)
        .await
        .map_err(|e| ResolveError::UpstreamFetch(e.to_string()))?;
    let stored = state.store.upsert(&fetched).await?;
    Ok(Some(stored))
}

async fn provider(state: &AppState, pid: &str) -> Result<String, ResolveError> {
    state.probe.provider_for(&state.store, pid).await.map_err(|e| match e {
        MetadataError::Core(core) => ResolveError::Store(core),
        other => ResolveError::UpstreamFetch(other.to_string()),
    })
}

/// The Commonmeta JSON body, with stored references expanded into the
/// full records when they exist. The expansion is single-level and is
/// never written back.
async fn commonmeta_body(state: &AppState, work: &Work) -> Result<serde_json::Value, ResolveError> {
    let mut body = serde_json::to_value(work).map_err(CoreError::Json)?;

    let pids: Vec<String> = work
        .references
        .iter()
        .filter(|r| !r.id.is_empty())
        .map(|r| r.id.clone())
        .collect();
    if !pids.is_empty() {
        let expanded = state.store.find_by_pids(&pids).await?;
        if !expanded.is_empty() {
            body["references"] = serde_json::to_value(&expanded).map_err(CoreError::Json)?;
        }
    }

    Ok(body)
}
