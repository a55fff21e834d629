use std::path::PathBuf;

use rusqlite::Connection;

use super::schema;
use super::{Backend, Objects, StorageError};
use crate::models::Instance;

/// Stores one row per object in a SQLite `objects` table.
///
/// The full instance is kept as JSON in `data`; `class`, `id` and
/// `updated_at` are copied out into columns so the table stays inspectable
/// with plain SQL.
pub struct SqliteBackend {
    conn: Connection,
    location: String,
}

impl SqliteBackend {
    pub fn open(path: PathBuf) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::with_connection(conn, path.display().to_string())
    }

    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, ":memory:".to_string())
    }

    fn with_connection(conn: Connection, location: String) -> Result<Self, StorageError> {
        schema::run_migrations(&conn).map_err(StorageError::Migration)?;
        Ok(Self { conn, location })
    }
}

impl Backend for SqliteBackend {
    fn load(&self) -> Result<Vec<Instance>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT data FROM objects ORDER BY key")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let instances = rows
            .iter()
            .map(|data| serde_json::from_str(data))
            .collect::<Result<Vec<Instance>, _>>()?;

        Ok(instances)
    }

    fn store(&self, objects: &Objects) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM objects", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO objects (key, class, id, data, updated_at) VALUES (?, ?, ?, ?, ?)",
            )?;
            for (key, instance) in objects {
                stmt.execute((
                    key,
                    instance.class.as_str(),
                    instance.id.to_string(),
                    serde_json::to_string(instance)?,
                    instance.updated_at.to_rfc3339(),
                ))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.location)
    }
}
