pub mod dates;
pub mod error;
pub mod identifiers;
pub mod models;
pub mod storage;

pub use error::{CoreError, Result};
pub use identifiers::{doi_as_url, doi_prefix, parse_pid, Doi, ParsedPid, DOI_RE};
pub use models::*;
pub use storage::{ConnectionPool, SqliteWorkRepository, WorkRepository, WorkStore};
