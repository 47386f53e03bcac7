//! Content negotiation: fold the path-embedded content type and the
//! Accept header into one MIME type, canonicalizing the pid along the
//! way. Pure; no I/O.

use commonpid_core::{parse_pid, CoreError, Doi, DOI_RE};

#[derive(Debug, Clone, PartialEq)]
pub struct Negotiation {
    /// Canonical absolute pid URL, with any link-embedded content type
    /// stripped.
    pub pid: String,
    /// The DOI when the pid is one.
    pub doi: Option<Doi>,
    /// Bare identifier used in delegation URL templates (the DOI for
    /// doi.org pids, the original segment otherwise).
    pub doi_suffix: String,
    /// The negotiated MIME type, never empty.
    pub content_type: String,
}

/// Negotiate a request path segment and Accept header.
///
/// Path-embedded types win over the Accept header; when both the
/// DataCite prefix form (`/<type>/<subtype>/<doi>`) and the Crossref
/// suffix form (`…/transform/<type>/<subtype>`) are present, the first
/// match from the left wins.
pub fn negotiate(segment: &str, accept: &str) -> Result<Negotiation, CoreError> {
    let mut content_type = String::new();
    let mut segment = segment.to_string();

    // DataCite link form: the segment starts with <type>/<subtype>
    // followed by a DOI.
    if !DOI_RE.is_match(&segment) {
        let parts: Vec<&str> = segment.split('/').collect();
        if parts.len() >= 4 {
            let rest = parts[2..].join("/");
            if DOI_RE.is_match(&rest) {
                content_type = format!("{}/{}", parts[0], parts[1]);
                segment = rest;
            }
        }
    }

    let parsed = parse_pid(&segment)?;
    let mut pid = parsed.pid;
    let mut url = parsed.url;

    // Crossref link form: …/transform/<type>/<subtype> at the end of
    // the path.
    if content_type.is_empty() {
        let segments: Vec<String> = url
            .path()
            .trim_start_matches('/')
            .split('/')
            .map(str::to_string)
            .collect();
        if segments.len() > 2 && segments[segments.len() - 3] == "transform" {
            content_type = format!(
                "{}/{}",
                segments[segments.len() - 2],
                segments[segments.len() - 1]
            );
            url.set_path(&segments[..segments.len() - 3].join("/"));
            pid = url.to_string();
        }
    }

    if content_type.is_empty() {
        content_type = accept.split(',').next().unwrap_or("").trim().to_string();
    }
    if content_type.is_empty() || content_type == "*/*" {
        content_type = "text/html".to_string();
    }

    let doi = Doi::from_pid(&pid);
    let doi_suffix = match &doi {
        Some(doi) => doi.value.clone(),
        None => url.path().trim_start_matches('/').to_string(),
    };

    Ok(Negotiation { pid, doi, doi_suffix, content_type })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doi_with_accept_header() {
        let n = negotiate("10.5555/12345", "text/html").unwrap();
        assert_eq!(n.pid, "https://doi.org/10.5555/12345");
        assert_eq!(n.content_type, "text/html");
        assert_eq!(n.doi_suffix, "10.5555/12345");
    }

    #[test]
    fn empty_and_wildcard_accept_default_to_html() {
        assert_eq!(negotiate("10.5555/1", "").unwrap().content_type, "text/html");
        assert_eq!(negotiate("10.5555/1", "*/*").unwrap().content_type, "text/html");
    }

    #[test]
    fn first_accept_element_wins() {
        let n = negotiate("10.5555/1", "application/json, text/html").unwrap();
        assert_eq!(n.content_type, "application/json");
    }

    #[test]
    fn crossref_transform_form_is_stripped() {
        let n = negotiate("10.5555/1/transform/application/vnd.weird+json", "").unwrap();
        assert_eq!(n.pid, "https://doi.org/10.5555/1");
        assert_eq!(n.content_type, "application/vnd.weird+json");
        assert_eq!(n.doi_suffix, "10.5555/1");
    }

    #[test]
    fn datacite_prefix_form_is_stripped() {
        let n = negotiate("application/vnd.datacite.datacite+json/10.5555/1", "").unwrap();
        assert_eq!(n.pid, "https://doi.org/10.5555/1");
        assert_eq!(n.content_type, "application/vnd.datacite.datacite+json");
        assert_eq!(n.doi_suffix, "10.5555/1");
    }

    #[test]
    fn path_embedded_type_beats_accept_header() {
        let n = negotiate("10.5555/1/transform/text/csv", "application/json").unwrap();
        assert_eq!(n.content_type, "text/csv");
    }

    #[test]
    fn leftmost_embedded_type_wins() {
        let n = negotiate("text/markdown/10.5555/1/transform/text/csv", "").unwrap();
        assert_eq!(n.content_type, "text/markdown");
        assert_eq!(n.pid, "https://doi.org/10.5555/1/transform/text/csv");
    }

    #[test]
    fn plain_url_segment() {
        let n = negotiate("example.org/posts/hello", "text/html").unwrap();
        assert_eq!(n.pid, "https://example.org/posts/hello");
        assert!(n.doi.is_none());
        assert_eq!(n.doi_suffix, "posts/hello");
    }

    #[test]
    fn transform_on_plain_url() {
        let n = negotiate("example.org/posts/hello/transform/text/markdown", "").unwrap();
        assert_eq!(n.pid, "https://example.org/posts/hello");
        assert_eq!(n.content_type, "text/markdown");
    }

    #[test]
    fn invalid_segment_errors() {
        assert!(negotiate("exa mple", "").is_err());
        assert!(negotiate("", "").is_err());
    }
}
