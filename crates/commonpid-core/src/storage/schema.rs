use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA_VERSION: u32 = 1;

pub fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        ",
    )?;
    Ok(())
}

/// The single logical collection. The pid column collates NOCASE so
/// uniqueness and lookups are case-insensitive; JSON-valued fields are
/// stored as raw JSON text and round-trip byte-faithfully.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS works (
            pid                   TEXT NOT NULL PRIMARY KEY COLLATE NOCASE,
            type                  TEXT NOT NULL DEFAULT '',
            additional_type       TEXT NOT NULL DEFAULT '',
            url                   TEXT NOT NULL DEFAULT '',
            contributors          TEXT NOT NULL DEFAULT '[]',
            publisher             TEXT NOT NULL DEFAULT '{}',
            date                  TEXT NOT NULL DEFAULT '{}',
            titles                TEXT NOT NULL DEFAULT '[]',
            container             TEXT NOT NULL DEFAULT '{}',
            subjects              TEXT NOT NULL DEFAULT '[]',
            sizes                 TEXT NOT NULL DEFAULT '[]',
            formats               TEXT NOT NULL DEFAULT '[]',
            language              TEXT NOT NULL DEFAULT '',
            license               TEXT NOT NULL DEFAULT '{}',
            version               TEXT NOT NULL DEFAULT '',
            "references"          TEXT NOT NULL DEFAULT '[]',
            relations             TEXT NOT NULL DEFAULT '[]',
            funding_references    TEXT NOT NULL DEFAULT '[]',
            descriptions          TEXT NOT NULL DEFAULT '[]',
            geo_locations         TEXT NOT NULL DEFAULT '[]',
            provider              TEXT NOT NULL DEFAULT '',
            alternate_identifiers TEXT NOT NULL DEFAULT '[]',
            files                 TEXT NOT NULL DEFAULT '[]',
            archive_locations     TEXT NOT NULL DEFAULT '[]',
            created               TEXT NOT NULL,
            updated               TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}
