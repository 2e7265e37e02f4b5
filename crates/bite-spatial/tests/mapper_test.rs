//! Integration tests for the cached zone-area mapper.

use bite_data::{
    AreaBoundaryProvider, AreaGeometry, DataError, SqliteCache, ZoneBoundaryProvider,
    ZoneGeometry, ZoneGeometryCache,
};
use bite_spatial::{SpatialError, ZoneAreaMapper};
use geo::{MultiPolygon, polygon};
use std::cell::Cell;
use std::rc::Rc;

fn square(lon: f64, lat: f64, size: f64) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon![
        (x: lon, y: lat),
        (x: lon + size, y: lat),
        (x: lon + size, y: lat + size),
        (x: lon, y: lat + size),
        (x: lon, y: lat),
    ]])
}

/// Zone source that counts how often it is asked.
#[derive(Debug, Default)]
struct CountingZones {
    calls: Cell<usize>,
}

impl ZoneBoundaryProvider for CountingZones {
    async fn zone_boundaries(&self) -> bite_data::Result<Vec<ZoneGeometry>> {
        self.calls.set(self.calls.get() + 1);
        Ok(vec![
            ZoneGeometry::new("00601", square(-66.9, 18.1, 0.05)),
            ZoneGeometry::new("00602", square(-66.52, 18.1, 0.05)),
            ZoneGeometry::new("00603", square(-60.0, 10.0, 0.05)),
        ])
    }
}

/// Zone source that must never be reached.
#[derive(Debug)]
struct Unreachable;

impl ZoneBoundaryProvider for Unreachable {
    async fn zone_boundaries(&self) -> bite_data::Result<Vec<ZoneGeometry>> {
        Err(DataError::Http("zone source should not be called".to_string()))
    }
}

#[derive(Debug)]
struct Counties;

impl AreaBoundaryProvider for Counties {
    async fn county_polygons(&self) -> bite_data::Result<Vec<AreaGeometry>> {
        Ok(vec![
            AreaGeometry::new("72001", square(-67.0, 18.0, 0.5)),
            AreaGeometry::new("72003", square(-66.5, 18.0, 0.5)),
        ])
    }
}

fn store() -> Rc<SqliteCache> {
    Rc::new(SqliteCache::in_memory().unwrap())
}

#[tokio::test]
async fn test_mapping_after_first_build() {
    let cache = ZoneGeometryCache::new(store());
    let mapper = ZoneAreaMapper::new(cache, CountingZones::default(), Counties);

    let mapping = mapper.zone_area_mapping().await.unwrap();
    assert_eq!(mapping.area_of("00601"), Some("72001"));
    // 00602 spans -66.52..-66.47 and touches both counties; the first wins.
    assert_eq!(mapping.area_of("00602"), Some("72001"));
    assert_eq!(mapping.area_of("00603"), None);
    assert_eq!(mapping.len(), 2);
}

#[tokio::test]
async fn test_zone_source_is_used_once() {
    let cache = ZoneGeometryCache::new(store());
    let mapper = ZoneAreaMapper::new(cache, CountingZones::default(), Counties);

    let first = mapper.reference_zone_set().await.unwrap();
    let second = mapper.reference_zone_set().await.unwrap();
    mapper.zone_area_mapping().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
    assert!(first.contains("00603"));
    assert!(mapper.cache().exists().unwrap());
    assert_eq!(mapper.zone_source().calls.get(), 1);
}

#[tokio::test]
async fn test_existing_cache_skips_zone_source() {
    let shared = store();
    {
        let mapper = ZoneAreaMapper::new(
            ZoneGeometryCache::new(Rc::clone(&shared)),
            CountingZones::default(),
            Counties,
        );
        assert!(mapper.ensure_zone_cache().await.unwrap());
    }

    let mapper = ZoneAreaMapper::new(ZoneGeometryCache::new(shared), Unreachable, Counties);
    let set = mapper.reference_zone_set().await.unwrap();
    assert_eq!(set.len(), 3);
    assert!(!mapper.ensure_zone_cache().await.unwrap());
}

#[tokio::test]
async fn test_zone_source_failure_is_fatal() {
    let mapper = ZoneAreaMapper::new(ZoneGeometryCache::new(store()), Unreachable, Counties);
    let err = mapper.zone_area_mapping().await.unwrap_err();
    assert!(matches!(err, SpatialError::Data(DataError::Http(_))));
    assert!(!mapper.cache().exists().unwrap());
}
