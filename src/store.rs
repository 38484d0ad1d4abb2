use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StorageError;
use crate::models::poll::Poll;

const DB_SCHEMA_VERSION: i64 = 1;

/// Every stored key carries this prefix so poll records never collide with
/// unrelated data sharing the same database.
const STORAGE_PREFIX: &str = "pollshare_";

/// Key-value persistence for poll records. The only module that touches the
/// database; everything else goes through `save`/`get`, so the backend can be
/// swapped without touching vote logic.
///
/// Access is single-threaded and synchronous. Two processes writing the same
/// poll race last-write-wins, an accepted limitation.
pub struct PollStore {
    conn: Connection,
}

impl PollStore {
    /// Opens (creating if needed) the poll database under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(data_dir)?;
        let conn = Connection::open(data_dir.join("polls.db"))?;
        initialize_schema(&conn)?;
        Ok(PollStore { conn })
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(PollStore { conn })
    }

    /// Serializes `poll` and writes it under the namespaced key for `id`,
    /// replacing any previous record. No retry on failure.
    pub fn save(&self, id: &str, poll: &Poll) -> Result<(), StorageError> {
        let value = serde_json::to_string(poll)?;
        let now = chrono::Utc::now().timestamp();

        self.conn.execute(
            "
            INSERT INTO polls (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
            params![storage_key(id), value, now],
        )?;

        Ok(())
    }

    /// Reads the record for `id`. Absent keys, read failures, corrupt JSON and
    /// structurally invalid records all come back as `None`; failures are
    /// logged, never returned to the caller.
    pub fn get(&self, id: &str) -> Option<Poll> {
        let raw = match self.read_raw(id) {
            Ok(raw) => raw?,
            Err(err) => {
                log::warn!("Failed to read poll {id}: {err}");
                return None;
            }
        };

        let poll: Poll = match serde_json::from_str(&raw) {
            Ok(poll) => poll,
            Err(err) => {
                log::warn!("Discarding corrupt record for poll {id}: {err}");
                return None;
            }
        };

        if !poll.is_consistent() {
            log::warn!("Discarding inconsistent record for poll {id}");
            return None;
        }

        Some(poll)
    }

    fn read_raw(&self, id: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT value FROM polls WHERE key = ?1",
                params![storage_key(id)],
                |row| row.get(0),
            )
            .optional()
    }
}

fn storage_key(id: &str) -> String {
    format!("{STORAGE_PREFIX}{id}")
}

fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;

    let mut version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS polls (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT 0
            );
            ",
        )?;
        version = 1;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version > DB_SCHEMA_VERSION {
        // Future schema; do not fail reads/writes for forward-compatible changes.
        conn.pragma_update(None, "user_version", version)?;
    }

    Ok(())
}
