use url::Url;

use super::doi::{Doi, DOI_RE};
use crate::error::{CoreError, Result};

/// A parsed persistent identifier: the canonical absolute URL plus the
/// DOI, when the identifier is one.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPid {
    pub pid: String,
    pub url: Url,
    pub doi: Option<Doi>,
}

/// Classify a request path segment as a DOI or a bare host/path URL
/// and canonicalize it to an absolute `https` URL.
pub fn parse(segment: &str) -> Result<ParsedPid> {
    if segment.is_empty() {
        return Err(CoreError::InvalidIdentifier(segment.to_string()));
    }

    let (pid, doi) = if DOI_RE.is_match(segment) {
        let doi = Doi::parse(segment)?;
        (doi.url.clone(), Some(doi))
    } else {
        (format!("https://{segment}"), None)
    };

    let url = Url::parse(&pid).map_err(|_| CoreError::InvalidIdentifier(segment.to_string()))?;

    Ok(ParsedPid { pid, url, doi })
}

/// The DOI prefix of a pid URL (`10.xxxx`), or `None` for non-DOI pids.
pub fn doi_prefix(pid: &str) -> Option<String> {
    Doi::from_pid(pid).map(|doi| doi.prefix().to_string())
}
