//! SQLite-backed key-value store
//!
//! All wallshift state lives in one `kv(key, value)` table. Values are
//! stored as text; the typed accessors fall back to a caller-supplied
//! default when a key is missing or its value does not parse, so a single
//! corrupt field never aborts a schedule load. Batch writes run inside one
//! SQLite transaction.

use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::StoreResult;

/// SQLite-backed key-value store
pub struct KvStore {
    conn: Mutex<Connection>,
}

impl KvStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }

    /// Raw string lookup. `None` means the key is absent.
    pub fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let conn = self.conn.lock().unwrap();

        let value: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;

        Ok(value)
    }

    /// String lookup with a default for absent keys.
    pub fn get_string(&self, key: &str, default: &str) -> StoreResult<String> {
        Ok(self.get(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// Integer lookup. A missing or unparseable value yields the default.
    pub fn get_int(&self, key: &str, default: i64) -> StoreResult<i64> {
        let Some(raw) = self.get(key)? else {
            return Ok(default);
        };

        match raw.trim().parse::<i64>() {
            Ok(v) => Ok(v),
            Err(_) => {
                warn!(key, value = %raw, "Corrupt integer value, using default");
                Ok(default)
            }
        }
    }

    /// Boolean lookup. A missing or unparseable value yields the default.
    pub fn get_bool(&self, key: &str, default: bool) -> StoreResult<bool> {
        let Some(raw) = self.get(key)? else {
            return Ok(default);
        };

        match raw.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => {
                warn!(key, value = %other, "Corrupt boolean value, using default");
                Ok(default)
            }
        }
    }

    /// All keys starting with the given prefix, in key order.
    pub fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();

        let pattern = format!("{}%", prefix.replace('%', "\\%").replace('_', "\\_"));
        let mut stmt =
            conn.prepare("SELECT key FROM kv WHERE key LIKE ? ESCAPE '\\' ORDER BY key")?;

        let rows = stmt.query_map([pattern], |row| row.get::<_, String>(0))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }

    /// Run a batch of writes inside a single transaction.
    ///
    /// Either every write in the batch commits or none do; this is the
    /// atomicity unit for "one day's schedule".
    pub fn with_batch<T>(
        &self,
        f: impl FnOnce(&mut KvBatch<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let out = {
            let mut batch = KvBatch { tx: &tx };
            f(&mut batch)?
        };

        tx.commit()?;
        Ok(out)
    }

    /// Check if the store is healthy
    pub fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}

/// Write handle for a single transaction
pub struct KvBatch<'a> {
    tx: &'a Transaction<'a>,
}

impl KvBatch<'_> {
    pub fn put(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.tx.execute(
            "INSERT INTO kv (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn put_int(&mut self, key: &str, value: i64) -> StoreResult<()> {
        self.put(key, &value.to_string())
    }

    pub fn put_bool(&mut self, key: &str, value: bool) -> StoreResult<()> {
        self.put(key, if value { "true" } else { "false" })
    }

    /// Put for optional values: `None` removes the key, matching the
    /// semantics the schedule model relies on for wallpaper assignments.
    pub fn put_opt(&mut self, key: &str, value: Option<&str>) -> StoreResult<()> {
        match value {
            Some(v) => self.put(key, v),
            None => self.remove(key),
        }
    }

    pub fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.tx.execute("DELETE FROM kv WHERE key = ?", [key])?;
        Ok(())
    }
}
