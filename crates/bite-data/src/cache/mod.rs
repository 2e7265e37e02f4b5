//! Caching layer for zone geometries and the raw dataset.

pub mod sqlite;
pub mod zones;

pub use sqlite::{CacheStats, SqliteCache, TableBuild};
pub use zones::{CachedZone, ZONE_TABLE, ZoneGeometryCache};
