use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use tokio::sync::MutexGuard;

use crate::error::{CoreError, Result};
use crate::models::{Work, WorkType};

const WORK_COLUMNS: &str = "pid, type, additional_type, url, contributors, publisher, date, \
     titles, container, subjects, sizes, formats, language, license, version, \"references\", \
     relations, funding_references, descriptions, geo_locations, provider, \
     alternate_identifiers, files, archive_locations, created, updated";

pub trait WorkRepository {
    /// Case-insensitive exact lookup by pid.
    fn find_by_pid(&self, pid: &str) -> Result<Option<Work>>;
    /// All works whose pid matches one of the inputs, in input order.
    fn find_by_pids(&self, pids: &[String]) -> Result<Vec<Work>>;
    /// First work whose pid matches a `LIKE` pattern such as
    /// `https://doi.org/10.5555%`.
    fn find_by_prefix(&self, pattern: &str) -> Result<Option<Work>>;
    /// Atomic insert-or-update. `updated` is refreshed; `created` is
    /// preserved on existing rows. Returns the stored row.
    fn upsert(&self, work: &Work) -> Result<Work>;
}

pub struct SqliteWorkRepository<'a> {
    conn: MutexGuard<'a, Connection>,
}

impl<'a> SqliteWorkRepository<'a> {
    pub fn new(conn: MutexGuard<'a, Connection>) -> Self {
        Self { conn }
    }

    fn row_to_work(row: &Row) -> rusqlite::Result<Work> {
        let type_str: String = row.get(1)?;
        let mut work = Work::base(row.get::<_, String>(0)?);
        work.work_type = WorkType::parse(&type_str);
        work.additional_type = row.get(2)?;
        work.url = row.get(3)?;
        work.contributors = json_column(row, 4)?;
        work.publisher = json_column(row, 5)?;
        work.date = json_column(row, 6)?;
        work.titles = json_column(row, 7)?;
        work.container = json_column(row, 8)?;
        work.subjects = json_column(row, 9)?;
        work.sizes = json_column(row, 10)?;
        work.formats = json_column(row, 11)?;
        work.language = row.get(12)?;
        work.license = json_column(row, 13)?;
        work.version = row.get(14)?;
        work.references = json_column(row, 15)?;
        work.relations = json_column(row, 16)?;
        work.funding_references = json_column(row, 17)?;
        work.descriptions = json_column(row, 18)?;
        work.geo_locations = json_column(row, 19)?;
        work.provider = row.get(20)?;
        work.alternate_identifiers = json_column(row, 21)?;
        work.files = json_column(row, 22)?;
        work.archive_locations = json_column(row, 23)?;
        work.created = timestamp_column(row, 24)?;
        work.updated = timestamp_column(row, 25)?;
        Ok(work)
    }
}

fn json_column<T: serde::de::DeserializeOwned + Default>(
    row: &Row,
    idx: usize,
) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    Ok(serde_json::from_str(&raw).unwrap_or_default())
}

fn timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn json_string<T: serde::Serialize>(value: &T, empty: &'static str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| empty.to_string())
}

impl<'a> WorkRepository for SqliteWorkRepository<'a> {
    fn find_by_pid(&self, pid: &str) -> Result<Option<Work>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WORK_COLUMNS} FROM works WHERE LOWER(pid) = LOWER(?1) LIMIT 1"
        ))?;
        let work = stmt.query_row(params![pid], Self::row_to_work);
        match work {
            Ok(work) => Ok(Some(work)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CoreError::Database(e)),
        }
    }

    fn find_by_pids(&self, pids: &[String]) -> Result<Vec<Work>> {
        if pids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; pids.len()].join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WORK_COLUMNS} FROM works WHERE pid IN ({placeholders})"
        ))?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(pids.iter()), Self::row_to_work)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // Return in input order; the IN clause does not guarantee one.
        let mut ordered: Vec<Work> = Vec::with_capacity(rows.len());
        for pid in pids {
            if let Some(work) = rows
                .iter()
                .find(|w| w.pid.eq_ignore_ascii_case(pid))
            {
                ordered.push(work.clone());
            }
        }
        Ok(ordered)
    }

    fn find_by_prefix(&self, pattern: &str) -> Result<Option<Work>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WORK_COLUMNS} FROM works WHERE pid LIKE ?1 LIMIT 1"
        ))?;
        let work = stmt.query_row(params![pattern], Self::row_to_work);
        match work {
            Ok(work) => Ok(Some(work)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CoreError::Database(e)),
        }
    }

    fn upsert(&self, work: &Work) -> Result<Work> {
        let now = Utc::now();
        self.conn.execute(
            r#"INSERT INTO works (pid, type, additional_type, url, contributors, publisher,
                date, titles, container, subjects, sizes, formats, language, license,
                version, "references", relations, funding_references, descriptions,
                geo_locations, provider, alternate_identifiers, files, archive_locations,
                created, updated)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26)
               ON CONFLICT(pid) DO UPDATE SET
                type = excluded.type,
                additional_type = excluded.additional_type,
                url = excluded.url,
                contributors = excluded.contributors,
                publisher = excluded.publisher,
                date = excluded.date,
                titles = excluded.titles,
                container = excluded.container,
                subjects = excluded.subjects,
                sizes = excluded.sizes,
                formats = excluded.formats,
                language = excluded.language,
                license = excluded.license,
                version = excluded.version,
                "references" = excluded."references",
                relations = excluded.relations,
                funding_references = excluded.funding_references,
                descriptions = excluded.descriptions,
                geo_locations = excluded.geo_locations,
                provider = excluded.provider,
                alternate_identifiers = excluded.alternate_identifiers,
                files = excluded.files,
                archive_locations = excluded.archive_locations,
                updated = excluded.updated"#,
            params![
                work.pid,
                work.work_type.map(|t| t.as_str()).unwrap_or(""),
                work.additional_type,
                work.url,
                json_string(&work.contributors, "[]"),
                json_string(&work.publisher, "{}"),
                json_string(&work.date, "{}"),
                json_string(&work.titles, "[]"),
                json_string(&work.container, "{}"),
                json_string(&work.subjects, "[]"),
                json_string(&work.sizes, "[]"),
                json_string(&work.formats, "[]"),
                work.language,
                json_string(&work.license, "{}"),
                work.version,
                json_string(&work.references, "[]"),
                json_string(&work.relations, "[]"),
                json_string(&work.funding_references, "[]"),
                json_string(&work.descriptions, "[]"),
                json_string(&work.geo_locations, "[]"),
                work.provider,
                json_string(&work.alternate_identifiers, "[]"),
                json_string(&work.files, "[]"),
                json_string(&work.archive_locations, "[]"),
                work.created.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;

        self.find_by_pid(&work.pid)?
            .ok_or_else(|| CoreError::InvalidIdentifier(work.pid.clone()))
    }
}

// TODO: reverse citation lookup (works whose references contain a given
// pid) once a consumer for it lands; the `references` column already
// stores the pids needed for the query.
