mod connection;
mod schema;
mod work_repository;

use std::path::Path;

pub use connection::ConnectionPool;
pub use schema::{apply_pragmas, create_tables, SCHEMA_VERSION};
pub use work_repository::{SqliteWorkRepository, WorkRepository};

use crate::error::Result;
use crate::models::Work;

/// The shared work store: one `works` collection keyed by pid.
///
/// All operations take the connection mutex for their full duration,
/// so an upsert is atomic with respect to readers and concurrent
/// upserts for the same key converge to a single row (last writer
/// wins on non-key fields).
pub struct WorkStore {
    pool: ConnectionPool,
}

impl WorkStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self { pool: ConnectionPool::open(path)? })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self { pool: ConnectionPool::open_in_memory()? })
    }

    pub async fn find_by_pid(&self, pid: &str) -> Result<Option<Work>> {
        let conn = self.pool.get_connection().await;
        SqliteWorkRepository::new(conn).find_by_pid(pid)
    }

    pub async fn find_by_pids(&self, pids: &[String]) -> Result<Vec<Work>> {
        let conn = self.pool.get_connection().await;
        SqliteWorkRepository::new(conn).find_by_pids(pids)
    }

    pub async fn find_by_prefix(&self, pattern: &str) -> Result<Option<Work>> {
        let conn = self.pool.get_connection().await;
        SqliteWorkRepository::new(conn).find_by_prefix(pattern)
    }

    pub async fn upsert(&self, work: &Work) -> Result<Work> {
        let conn = self.pool.get_connection().await;
        SqliteWorkRepository::new(conn).upsert(work)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{File, Reference, Title, WorkType};

    fn sample_work(pid: &str) -> Work {
        let mut work = Work::base(pid);
        work.work_type = Some(WorkType::JournalArticle);
        work.url = "https://example.org/a".to_string();
        work.provider = "Crossref".to_string();
        work.titles = vec![Title { title: "T".into(), ..Default::default() }];
        work.references = vec![Reference {
            key: "ref1".into(),
            id: "https://doi.org/10.1/b".into(),
            ..Default::default()
        }];
        work.files = vec![File {
            url: "https://ex/x.pdf".into(),
            mime_type: "application/pdf".into(),
        }];
        work
    }

    #[tokio::test]
    async fn upsert_and_find_roundtrip() {
        let store = WorkStore::open_in_memory().unwrap();
        let work = sample_work("https://doi.org/10.5555/12345");
        store.upsert(&work).await.unwrap();

        let found = store
            .find_by_pid("https://doi.org/10.5555/12345")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.work_type, Some(WorkType::JournalArticle));
        assert_eq!(found.titles, work.titles);
        assert_eq!(found.references, work.references);
        assert_eq!(found.files, work.files);
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive() {
        let store = WorkStore::open_in_memory().unwrap();
        store.upsert(&sample_work("https://doi.org/10.5555/AbCdE")).await.unwrap();

        let found = store
            .find_by_pid("https://doi.org/10.5555/abcde")
            .await
            .unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().pid, "https://doi.org/10.5555/AbCdE");
    }

    #[tokio::test]
    async fn case_variant_upserts_converge_to_one_row() {
        let store = WorkStore::open_in_memory().unwrap();
        store.upsert(&sample_work("https://doi.org/10.5555/x1")).await.unwrap();
        let mut second = sample_work("https://doi.org/10.5555/X1");
        second.url = "https://example.org/b".to_string();
        store.upsert(&second).await.unwrap();

        let found = store.find_by_pid("https://doi.org/10.5555/x1").await.unwrap().unwrap();
        assert_eq!(found.url, "https://example.org/b");
    }

    #[tokio::test]
    async fn upsert_is_idempotent_modulo_updated() {
        let store = WorkStore::open_in_memory().unwrap();
        let work = sample_work("https://doi.org/10.5555/67890");
        let first = store.upsert(&work).await.unwrap();
        let second = store.upsert(&work).await.unwrap();

        assert_eq!(first.pid, second.pid);
        assert_eq!(first.work_type, second.work_type);
        assert_eq!(first.titles, second.titles);
        assert_eq!(first.references, second.references);
        assert_eq!(first.created, second.created);
        assert!(second.updated >= first.updated);
    }

    #[tokio::test]
    async fn created_is_preserved_on_update() {
        let store = WorkStore::open_in_memory().unwrap();
        let work = sample_work("https://doi.org/10.5555/keep");
        let first = store.upsert(&work).await.unwrap();

        let mut rewritten = sample_work("https://doi.org/10.5555/keep");
        rewritten.url = "https://example.org/new".to_string();
        let second = store.upsert(&rewritten).await.unwrap();

        assert_eq!(second.created, first.created);
        assert!(second.updated >= second.created);
        assert_eq!(second.url, "https://example.org/new");
    }

    #[tokio::test]
    async fn find_by_pids_preserves_input_order() {
        let store = WorkStore::open_in_memory().unwrap();
        store.upsert(&sample_work("https://doi.org/10.1/a")).await.unwrap();
        store.upsert(&sample_work("https://doi.org/10.1/b")).await.unwrap();

        let found = store
            .find_by_pids(&[
                "https://doi.org/10.1/b".to_string(),
                "https://doi.org/10.1/missing".to_string(),
                "https://doi.org/10.1/a".to_string(),
            ])
            .await
            .unwrap();
        let pids: Vec<&str> = found.iter().map(|w| w.pid.as_str()).collect();
        assert_eq!(pids, vec!["https://doi.org/10.1/b", "https://doi.org/10.1/a"]);
    }

    #[tokio::test]
    async fn find_by_prefix_matches_doi_prefix() {
        let store = WorkStore::open_in_memory().unwrap();
        store.upsert(&sample_work("https://doi.org/10.5555/12345")).await.unwrap();

        let found = store
            .find_by_prefix("https://doi.org/10.5555%")
            .await
            .unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().provider, "Crossref");

        let missing = store.find_by_prefix("https://doi.org/10.4444%").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn minimal_record_roundtrips() {
        let store = WorkStore::open_in_memory().unwrap();
        let minimal = Work::minimal(
            "https://doi.org/10.5555/min",
            "https://example.org/landing",
            "DataCite",
        );
        let stored = store.upsert(&minimal).await.unwrap();
        assert!(stored.is_minimal());
        assert_eq!(stored.url, "https://example.org/landing");
        assert_eq!(stored.provider, "DataCite");
    }

    #[tokio::test]
    async fn persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("works.db");
        {
            let store = WorkStore::open(&path).unwrap();
            store.upsert(&sample_work("https://doi.org/10.5555/disk")).await.unwrap();
        }
        let store = WorkStore::open(&path).unwrap();
        let found = store.find_by_pid("https://doi.org/10.5555/disk").await.unwrap();
        assert!(found.is_some());
    }
}
