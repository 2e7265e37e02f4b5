//! Persisted zone geometry cache.
//!
//! The table is created and filled in a single transaction, so `exists()`
//! implies a complete build. A single writer is assumed; two processes racing
//! to build would both see the table missing.

use super::sqlite::SqliteCache;
use crate::error::Result;
use crate::geometry::ZoneGeometry;
use rusqlite::params;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Table holding zone code and WKT geometry.
pub const ZONE_TABLE: &str = "zone_geometries";

/// A cached row before its geometry text has been parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedZone {
    /// Zone code
    pub zone_code: String,
    /// Well-known-text geometry
    pub geometry_wkt: String,
}

impl CachedZone {
    /// Parse the geometry text.
    pub fn parse(&self) -> Result<ZoneGeometry> {
        ZoneGeometry::from_wkt(&self.zone_code, &self.geometry_wkt)
    }
}

/// Cache of reference-territory zone boundaries.
#[derive(Debug, Clone)]
pub struct ZoneGeometryCache {
    store: Rc<SqliteCache>,
}

impl ZoneGeometryCache {
    /// Wrap a shared SQLite store.
    pub const fn new(store: Rc<SqliteCache>) -> Self {
        Self { store }
    }

    /// Check whether the cache has been built.
    pub fn exists(&self) -> Result<bool> {
        self.store.table_exists(ZONE_TABLE)
    }

    /// Create and populate the cache table.
    ///
    /// Zones are inserted in the given order; `read()` returns them in that
    /// order. A zone code seen twice keeps its first geometry.
    pub fn build(&self, zones: &[ZoneGeometry]) -> Result<usize> {
        let tx = self.store.conn().unchecked_transaction()?;
        tx.execute(
            "CREATE TABLE IF NOT EXISTS zone_geometries (
                zone_code TEXT PRIMARY KEY,
                geometry_wkt TEXT NOT NULL
            )",
            [],
        )?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO zone_geometries (zone_code, geometry_wkt)
                 VALUES (?1, ?2)",
            )?;
            for zone in zones {
                inserted += stmt.execute(params![zone.zone_code, zone.to_wkt()])?;
            }
        }

        SqliteCache::record_build(&tx, ZONE_TABLE, inserted)?;
        tx.commit()?;

        log::info!("Cached {} zone geometries", inserted);
        Ok(inserted)
    }

    /// Read cached rows in insertion order.
    pub fn read(&self) -> Result<Vec<CachedZone>> {
        let mut stmt = self
            .store
            .conn()
            .prepare("SELECT zone_code, geometry_wkt FROM zone_geometries ORDER BY rowid")?;

        let rows = stmt.query_map([], |row| {
            Ok(CachedZone {
                zone_code: row.get(0)?,
                geometry_wkt: row.get(1)?,
            })
        })?;

        let mut zones = Vec::new();
        for row in rows {
            zones.push(row?);
        }
        Ok(zones)
    }

    /// Read and parse every cached geometry. Any malformed row is fatal.
    pub fn read_geometries(&self) -> Result<Vec<ZoneGeometry>> {
        self.read()?.iter().map(CachedZone::parse).collect()
    }

    /// Zone codes present in the cache.
    pub fn zone_codes(&self) -> Result<BTreeSet<String>> {
        let mut stmt = self
            .store
            .conn()
            .prepare("SELECT zone_code FROM zone_geometries")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut codes = BTreeSet::new();
        for row in rows {
            codes.insert(row?);
        }
        Ok(codes)
    }

    /// Invalidate the cache.
    pub fn clear(&self) -> Result<()> {
        self.store.drop_table(ZONE_TABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use geo::{MultiPolygon, polygon};

    fn zone(code: &str, x0: f64) -> ZoneGeometry {
        ZoneGeometry::new(
            code,
            MultiPolygon::new(vec![polygon![
                (x: x0, y: 18.0),
                (x: x0 + 0.1, y: 18.0),
                (x: x0 + 0.1, y: 18.1),
                (x: x0, y: 18.1),
                (x: x0, y: 18.0),
            ]]),
        )
    }

    fn cache() -> ZoneGeometryCache {
        ZoneGeometryCache::new(Rc::new(SqliteCache::in_memory().unwrap()))
    }

    #[test]
    fn test_build_then_read() {
        let cache = cache();
        assert!(!cache.exists().unwrap());

        let zones = vec![zone("00603", -67.1), zone("00601", -66.7)];
        assert_eq!(cache.build(&zones).unwrap(), 2);
        assert!(cache.exists().unwrap());

        let read = cache.read_geometries().unwrap();
        assert_eq!(read, zones);

        let codes = cache.zone_codes().unwrap();
        assert_eq!(codes.into_iter().collect::<Vec<_>>(), vec!["00601", "00603"]);
    }

    #[test]
    fn test_empty_build_still_exists() {
        let cache = cache();
        cache.build(&[]).unwrap();
        assert!(cache.exists().unwrap());
        assert!(cache.read().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_zone_keeps_first() {
        let cache = cache();
        let first = zone("00601", -66.7);
        let inserted = cache.build(&[first.clone(), zone("00601", -60.0)]).unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(cache.read_geometries().unwrap(), vec![first]);
    }

    #[test]
    fn test_clear_invalidates() {
        let cache = cache();
        cache.build(&[zone("00601", -66.7)]).unwrap();
        cache.clear().unwrap();
        assert!(!cache.exists().unwrap());
    }

    #[test]
    fn test_malformed_row_is_fatal() {
        let cache = cache();
        cache.build(&[zone("00601", -66.7)]).unwrap();
        cache
            .store
            .conn()
            .execute(
                "INSERT INTO zone_geometries VALUES ('00602', 'MULTIPOLYGON(((oops')",
                [],
            )
            .unwrap();

        let err = cache.read_geometries().unwrap_err();
        assert!(matches!(err, DataError::MalformedGeometry { zone, .. } if zone == "00602"));
    }
}
