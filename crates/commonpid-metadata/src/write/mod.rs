mod csl;
mod datacite;
mod schema_org;
mod unixref;

pub use csl::write_csl;
pub use datacite::write_datacite;
pub use schema_org::write_schema_org;
pub use unixref::write_unixref;

/// Parse a partial ISO date (`YYYY`, `YYYY-MM`, `YYYY-MM-DD`, or a
/// timestamp with one of those as its date) into numeric date parts.
pub(crate) fn date_parts_of(date: &str) -> Vec<i64> {
    let date = date.split('T').next().unwrap_or(date);
    date.splitn(3, '-')
        .map_while(|part| part.parse::<i64>().ok())
        .collect()
}

/// The year of a partial ISO date, when present.
pub(crate) fn year_of(date: &str) -> Option<i64> {
    date_parts_of(date).first().copied()
}
