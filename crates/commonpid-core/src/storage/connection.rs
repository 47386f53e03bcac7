use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::{Mutex, MutexGuard};

use super::schema::{apply_pragmas, create_tables};
use crate::error::Result;

/// A single SQLite connection shared across request tasks. The mutex
/// is the store's synchronization point; every statement runs while
/// holding it, so readers never observe a torn row.
pub struct ConnectionPool {
    path: Option<String>,
    connection: Arc<Mutex<Connection>>,
}

impl ConnectionPool {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        apply_pragmas(&conn)?;
        create_tables(&conn)?;
        Ok(Self {
            path: Some(path.to_string_lossy().to_string()),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_pragmas(&conn)?;
        create_tables(&conn)?;
        Ok(Self {
            path: None,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn get_connection(&self) -> MutexGuard<'_, Connection> {
        self.connection.lock().await
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.is_none()
    }
}
