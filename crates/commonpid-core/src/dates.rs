//! Partial-date helpers for upstream `date-parts` arrays.

/// Format a Crossref `date-parts` value (`[[y]]`, `[[y, m]]`, or
/// `[[y, m, d]]`) as a zero-padded partial ISO date. Empty arrays and
/// zero years produce `None`.
pub fn date_from_date_parts(date_parts: &[Vec<i64>]) -> Option<String> {
    let parts = date_parts.first()?;
    date_from_parts(parts)
}

/// Format `[y]`, `[y, m]`, or `[y, m, d]` as `YYYY`, `YYYY-MM`, or
/// `YYYY-MM-DD`.
pub fn date_from_parts(parts: &[i64]) -> Option<String> {
    match parts {
        [] => None,
        [year] if *year == 0 => None,
        [year] => Some(format!("{year:04}")),
        [year, month] => Some(format!("{year:04}-{month:02}")),
        [year, month, day, ..] => Some(format!("{year:04}-{month:02}-{day:02}")),
    }
}
