use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, Result};

/// Matches a bare DOI: `10.<4-9 digit prefix>/<suffix>`.
pub static DOI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^10\.\d{4,9}/.+$").expect("valid DOI regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doi {
    /// The bare `10.x/y` form as given (case preserved; lookups are
    /// case-insensitive downstream).
    pub value: String,
    /// `https://doi.org/<value>`.
    pub url: String,
}

impl Doi {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        let stripped = if let Some(s) = input.strip_prefix("https://doi.org/") {
            s
        } else if let Some(s) = input.strip_prefix("http://doi.org/") {
            s
        } else if let Some(s) = input.strip_prefix("https://dx.doi.org/") {
            s
        } else if let Some(s) = input.strip_prefix("http://dx.doi.org/") {
            s
        } else if let Some(s) = input.strip_prefix("doi:") {
            s.trim_start()
        } else if let Some(s) = input.strip_prefix("DOI:") {
            s.trim_start()
        } else {
            input
        };

        if !DOI_RE.is_match(stripped) {
            return Err(CoreError::InvalidDoi(input.to_string()));
        }

        Ok(Self {
            value: stripped.to_string(),
            url: format!("https://doi.org/{stripped}"),
        })
    }

    /// Extract a DOI from a pid URL; `None` when the pid is not under
    /// doi.org.
    pub fn from_pid(pid: &str) -> Option<Self> {
        let u = Url::parse(pid).ok()?;
        if u.host_str() != Some("doi.org") && u.host_str() != Some("dx.doi.org") {
            return None;
        }
        let path = u.path().trim_start_matches('/');
        Self::parse(path).ok()
    }

    /// The registration prefix, `10.xxxx`.
    pub fn prefix(&self) -> &str {
        self.value.split('/').next().unwrap_or(&self.value)
    }

    pub fn suffix(&self) -> &str {
        match self.value.split_once('/') {
            Some((_, s)) => s,
            None => "",
        }
    }
}

/// `https://doi.org/<doi>` for a bare DOI, empty in, empty out.
pub fn doi_as_url(doi: &str) -> String {
    if doi.is_empty() {
        return String::new();
    }
    format!("https://doi.org/{doi}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_doi() {
        let doi = Doi::parse("10.1000/xyz123").unwrap();
        assert_eq!(doi.value, "10.1000/xyz123");
        assert_eq!(doi.url, "https://doi.org/10.1000/xyz123");
        assert_eq!(doi.prefix(), "10.1000");
        assert_eq!(doi.suffix(), "xyz123");
    }

    #[test]
    fn doi_with_https_prefix() {
        let doi = Doi::parse("https://doi.org/10.1000/xyz123").unwrap();
        assert_eq!(doi.value, "10.1000/xyz123");
    }

    #[test]
    fn doi_with_doi_colon_prefix() {
        let doi = Doi::parse("doi: 10.1000/xyz123").unwrap();
        assert_eq!(doi.value, "10.1000/xyz123");
    }

    #[test]
    fn case_is_preserved() {
        let doi = Doi::parse("10.1000/XYZ123").unwrap();
        assert_eq!(doi.value, "10.1000/XYZ123");
    }

    #[test]
    fn from_pid_requires_doi_org() {
        assert!(Doi::from_pid("https://doi.org/10.5555/12345").is_some());
        assert!(Doi::from_pid("https://dx.doi.org/10.5555/12345").is_some());
        assert!(Doi::from_pid("https://example.org/10.5555/12345").is_none());
        assert!(Doi::from_pid("https://doi.org/not-a-doi").is_none());
    }

    #[test]
    fn reject_not_a_doi() {
        assert!(Doi::parse("not-a-doi").is_err());
        assert!(Doi::parse("10.1000").is_err());
        assert!(Doi::parse("").is_err());
        assert!(Doi::parse("10.123/short-prefix").is_err());
    }

    #[test]
    fn doi_as_url_empty_passthrough() {
        assert_eq!(doi_as_url(""), "");
        assert_eq!(doi_as_url("10.1/x"), "https://doi.org/10.1/x");
    }
}
