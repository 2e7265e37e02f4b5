//! SQLite store backing the pipeline caches and the raw dataset.

use crate::error::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::path::Path;

/// SQLite database shared by the zone geometry cache and the raw store.
#[derive(Debug)]
pub struct SqliteCache {
    conn: Connection,
}

/// Bookkeeping row written whenever a cached table is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBuild {
    /// Table name
    pub table: String,
    /// Rows inserted by the build
    pub row_count: usize,
    /// When the build committed
    pub built_at: DateTime<Utc>,
}

impl SqliteCache {
    /// Create a new SQLite cache.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Initialize the database schema.
    ///
    /// Only bookkeeping lives here; data tables are created by their builders
    /// so that their presence means they are populated.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS table_builds (
                name TEXT PRIMARY KEY,
                row_count INTEGER NOT NULL,
                built_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    pub(crate) const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Check whether a table is present.
    pub fn table_exists(&self, table: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Number of rows in a table, or `None` when it does not exist.
    pub fn row_count(&self, table: &str) -> Result<Option<usize>> {
        if !self.table_exists(table)? {
            return Ok(None);
        }
        // `table` is always one of the crate's table constants.
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })?;
        Ok(Some(count as usize))
    }

    /// Record a completed build inside the builder's transaction.
    pub(crate) fn record_build(tx: &Transaction<'_>, table: &str, row_count: usize) -> Result<()> {
        tx.execute(
            "INSERT OR REPLACE INTO table_builds (name, row_count, built_at)
             VALUES (?1, ?2, ?3)",
            params![table, row_count as i64, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Look up the last build of a table.
    pub fn last_build(&self, table: &str) -> Result<Option<TableBuild>> {
        let row = self
            .conn
            .query_row(
                "SELECT name, row_count, built_at FROM table_builds WHERE name = ?1",
                params![table],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.and_then(|(table, row_count, built_at)| {
            DateTime::parse_from_rfc3339(&built_at)
                .ok()
                .map(|built_at| TableBuild {
                    table,
                    row_count: row_count as usize,
                    built_at: built_at.with_timezone(&Utc),
                })
        }))
    }

    /// Drop a cached table so the next access rebuilds it.
    pub fn drop_table(&self, table: &str) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {table}"), [])?;
        tx.execute("DELETE FROM table_builds WHERE name = ?1", params![table])?;
        tx.commit()?;
        Ok(())
    }

    /// Summary of the cached tables.
    pub fn get_stats(&self) -> Result<CacheStats> {
        Ok(CacheStats {
            zone_geometries: self.row_count(super::zones::ZONE_TABLE)?,
            raw_records: self.row_count(crate::raw::RAW_TABLE)?,
        })
    }
}

/// Cache statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Cached zone geometries, `None` when the cache has not been built
    pub zone_geometries: Option<usize>,
    /// Raw establishment-quarter rows, `None` when the table is absent
    pub raw_records: Option<usize>,
}
