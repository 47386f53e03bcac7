pub mod doi;
pub mod pid;

pub use doi::{doi_as_url, Doi, DOI_RE};
pub use pid::{doi_prefix, parse as parse_pid, ParsedPid};
