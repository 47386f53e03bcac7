//! License URL normalization: Creative Commons aliases and the SPDX
//! lookup used by both readers.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use url::Url;

/// Canonical `…/legalcode` form per Creative Commons license,
/// folding jurisdiction-specific variants (`/us`, ...) onto the
/// generic license.
static NORMALIZED_LICENSES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("https://creativecommons.org/licenses/by/1.0", "https://creativecommons.org/licenses/by/1.0/legalcode"),
        ("https://creativecommons.org/licenses/by/2.0", "https://creativecommons.org/licenses/by/2.0/legalcode"),
        ("https://creativecommons.org/licenses/by/2.5", "https://creativecommons.org/licenses/by/2.5/legalcode"),
        ("https://creativecommons.org/licenses/by/3.0", "https://creativecommons.org/licenses/by/3.0/legalcode"),
        ("https://creativecommons.org/licenses/by/3.0/us", "https://creativecommons.org/licenses/by/3.0/legalcode"),
        ("https://creativecommons.org/licenses/by/4.0", "https://creativecommons.org/licenses/by/4.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nc/1.0", "https://creativecommons.org/licenses/by-nc/1.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nc/2.0", "https://creativecommons.org/licenses/by-nc/2.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nc/2.5", "https://creativecommons.org/licenses/by-nc/2.5/legalcode"),
        ("https://creativecommons.org/licenses/by-nc/3.0", "https://creativecommons.org/licenses/by-nc/3.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nc/4.0", "https://creativecommons.org/licenses/by-nc/4.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nd-nc/1.0", "https://creativecommons.org/licenses/by-nd-nc/1.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nd-nc/2.0", "https://creativecommons.org/licenses/by-nd-nc/2.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nd-nc/2.5", "https://creativecommons.org/licenses/by-nd-nc/2.5/legalcode"),
        ("https://creativecommons.org/licenses/by-nd-nc/3.0", "https://creativecommons.org/licenses/by-nd-nc/3.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nd-nc/4.0", "https://creativecommons.org/licenses/by-nd-nc/4.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nc-sa/1.0", "https://creativecommons.org/licenses/by-nc-sa/1.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nc-sa/2.0", "https://creativecommons.org/licenses/by-nc-sa/2.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nc-sa/2.5", "https://creativecommons.org/licenses/by-nc-sa/2.5/legalcode"),
        ("https://creativecommons.org/licenses/by-nc-sa/3.0", "https://creativecommons.org/licenses/by-nc-sa/3.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nc-sa/3.0/us", "https://creativecommons.org/licenses/by-nc-sa/3.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nc-sa/4.0", "https://creativecommons.org/licenses/by-nc-sa/4.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nd/1.0", "https://creativecommons.org/licenses/by-nd/1.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nd/2.0", "https://creativecommons.org/licenses/by-nd/2.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nd/2.5", "https://creativecommons.org/licenses/by-nd/2.5/legalcode"),
        ("https://creativecommons.org/licenses/by-nd/3.0", "https://creativecommons.org/licenses/by-nd/3.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nd/4.0", "https://creativecommons.org/licenses/by-nd/4.0/legalcode"),
        ("https://creativecommons.org/licenses/by-sa/1.0", "https://creativecommons.org/licenses/by-sa/1.0/legalcode"),
        ("https://creativecommons.org/licenses/by-sa/2.0", "https://creativecommons.org/licenses/by-sa/2.0/legalcode"),
        ("https://creativecommons.org/licenses/by-sa/2.5", "https://creativecommons.org/licenses/by-sa/2.5/legalcode"),
        ("https://creativecommons.org/licenses/by-sa/3.0", "https://creativecommons.org/licenses/by-sa/3.0/legalcode"),
        ("https://creativecommons.org/licenses/by-sa/4.0", "https://creativecommons.org/licenses/by-sa/4.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nc-nd/1.0", "https://creativecommons.org/licenses/by-nc-nd/1.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nc-nd/2.0", "https://creativecommons.org/licenses/by-nc-nd/2.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nc-nd/2.5", "https://creativecommons.org/licenses/by-nc-nd/2.5/legalcode"),
        ("https://creativecommons.org/licenses/by-nc-nd/3.0", "https://creativecommons.org/licenses/by-nc-nd/3.0/legalcode"),
        ("https://creativecommons.org/licenses/by-nc-nd/4.0", "https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode"),
        ("https://creativecommons.org/licenses/publicdomain", "https://creativecommons.org/licenses/publicdomain/"),
        ("https://creativecommons.org/publicdomain/zero/1.0", "https://creativecommons.org/publicdomain/zero/1.0/legalcode"),
    ])
});

/// Abbreviated SPDX lookup, keyed by normalized license URL.
static SPDX_LICENSES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("https://creativecommons.org/licenses/by/3.0/legalcode", "CC-BY-3.0"),
        ("https://creativecommons.org/licenses/by/4.0/legalcode", "CC-BY-4.0"),
        ("https://creativecommons.org/licenses/by-nc/3.0/legalcode", "CC-BY-NC-3.0"),
        ("https://creativecommons.org/licenses/by-nc/4.0/legalcode", "CC-BY-NC-4.0"),
        ("https://creativecommons.org/licenses/by-nc-nd/3.0/legalcode", "CC-BY-NC-ND-3.0"),
        ("https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode", "CC-BY-NC-ND-4.0"),
        ("https://creativecommons.org/licenses/by-nc-sa/3.0/legalcode", "CC-BY-NC-SA-3.0"),
        ("https://creativecommons.org/licenses/by-nc-sa/4.0/legalcode", "CC-BY-NC-SA-4.0"),
        ("https://creativecommons.org/licenses/by-nd/3.0/legalcode", "CC-BY-ND-3.0"),
        ("https://creativecommons.org/licenses/by-nd/4.0/legalcode", "CC-BY-ND-4.0"),
        ("https://creativecommons.org/licenses/by-sa/3.0/legalcode", "CC-BY-SA-3.0"),
        ("https://creativecommons.org/licenses/by-sa/4.0/legalcode", "CC-BY-SA-4.0"),
        ("https://creativecommons.org/publicdomain/zero/1.0/legalcode", "CC0-1.0"),
        ("https://creativecommons.org/licenses/publicdomain/", "CC0-1.0"),
        ("https://opensource.org/licenses/MIT", "MIT"),
        ("https://opensource.org/licenses/Apache-2.0", "Apache-2.0"),
        ("https://opensource.org/licenses/GPL-3.0", "GPL-3.0"),
    ])
});

/// Lowercase a URL, upgrade http to https, and drop a trailing path
/// slash. Unparseable input comes back unchanged.
pub fn normalize_url(input: &str, secure: bool, lower: bool) -> String {
    let Ok(mut u) = Url::parse(input) else {
        return input.to_string();
    };
    let path = u.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        u.set_path(path.trim_end_matches('/'));
    }
    if secure && u.scheme() == "http" {
        let _ = u.set_scheme("https");
    }
    let out = u.to_string();
    if lower {
        out.to_lowercase()
    } else {
        out
    }
}

/// Normalize a Creative Commons license URL to its `…/legalcode`
/// canonical form. URLs outside the alias table come back normalized
/// but otherwise unchanged.
pub fn normalize_cc_url(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let normalized = normalize_url(input, true, true);
    match NORMALIZED_LICENSES.get(normalized.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => normalized,
    }
}

/// The SPDX identifier for a normalized license URL, or empty when
/// unknown.
pub fn url_to_spdx(url: &str) -> String {
    SPDX_LICENSES.get(url).map(|s| (*s).to_string()).unwrap_or_default()
}
