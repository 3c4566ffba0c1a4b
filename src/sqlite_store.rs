use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::store::{KeyValueStore, quota_error};

pub const STORE_DB: &str = "cache_store.sqlite";

pub struct SqliteStore {
    conn: Connection,
    capacity: usize,
}

impl SqliteStore {
    pub fn open(path: &Path, capacity: usize) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create cache dir {}", parent.display()))?;
        }
        let conn =
            Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
        Self::with_connection(conn, capacity)
    }

    pub fn in_memory(capacity: usize) -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
        Self::with_connection(conn, capacity)
    }

    fn with_connection(conn: Connection, capacity: usize) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self { conn, capacity })
    }

    fn contains(&self, key: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM kv WHERE key = ?1", params![key], |_| Ok(()))
            .optional()
            .context("query cache key")?;
        Ok(found.is_some())
    }

    fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .context("count cache entries")?;
        Ok(usize::try_from(n).unwrap_or(0))
    }
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );
        "#,
    )
    .context("init cache schema")?;
    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .with_context(|| format!("read cache key {key}"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if !self.contains(key)? && self.count()? >= self.capacity {
            return Err(quota_error(self.name(), self.capacity, key));
        }
        self.conn
            .execute(
                r#"
                INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
                params![key, value, Utc::now().timestamp_millis()],
            )
            .with_context(|| format!("write cache key {key}"))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .with_context(|| format!("delete cache key {key}"))?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv ORDER BY key")
            .context("prepare cache keys")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .context("query cache keys")?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("decode cache key")?);
        }
        Ok(out)
    }
}
