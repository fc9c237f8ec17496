//! SQLite record backend
//!
//! Same contract as the in-memory backend, but records survive restarts.

use std::path::{Path, PathBuf};

use rusqlite::{params, OptionalExtension};

use super::{RecordBackend, StoreResult};
use crate::db::Database;
use crate::models::{Namespace, StoredRecord};

#[derive(Clone)]
pub struct SqliteBackend {
    database: Database,
    path: PathBuf,
}

impl SqliteBackend {
    /// Open the database at `path`, creating and migrating it as needed
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let database = Database::open(path.as_ref())?;
        Ok(Self {
            database,
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordBackend for SqliteBackend {
    fn kind(&self) -> &'static str {
        "sqlite"
    }

    fn put(&self, namespace: Namespace, record: StoredRecord) -> StoreResult<()> {
        let payload = serde_json::to_string(&record.payload)?;
        let conn = self.database.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO records (namespace, user_id, payload, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(namespace, user_id) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
            params![namespace.as_str(), record.user_id, payload, record.updated_at],
        )?;
        Ok(())
    }

    fn get(&self, namespace: Namespace, user_id: &str) -> StoreResult<Option<StoredRecord>> {
        let conn = self.database.get_conn()?;
        let row = conn
            .query_row(
                "SELECT payload, updated_at FROM records WHERE namespace = ?1 AND user_id = ?2",
                params![namespace.as_str(), user_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            Some((payload, updated_at)) => Ok(Some(StoredRecord {
                user_id: user_id.to_string(),
                payload: serde_json::from_str(&payload)?,
                updated_at,
            })),
            None => Ok(None),
        }
    }

    fn count(&self, namespace: Namespace) -> StoreResult<usize> {
        let conn = self.database.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM records WHERE namespace = ?1",
            params![namespace.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
