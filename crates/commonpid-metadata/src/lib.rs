pub mod error;
pub mod http;
pub mod licenses;
pub mod read;
pub mod sanitize;
pub mod sources;
pub mod write;

pub use error::{MetadataError, Result};
pub use read::{read_crossref, read_datacite};
pub use sources::{CrossrefClient, DataciteClient, HandleClient, RegistryProbe, UpstreamAdapter};
pub use write::{write_csl, write_datacite, write_schema_org, write_unixref};
