//! Pipeline tests over in-memory records and fake boundary sources.

use approx::assert_relative_eq;
use bite::data::{
    AreaBoundaryProvider, AreaGeometry, BiteConfig, DataError, InMemoryRawProvider, RawRecord,
    SqliteCache, ZoneBoundaryProvider, ZoneGeometry, ZoneGeometryCache,
};
use bite::panel::{IndustrySelector, PanelBuilder, PanelError};
use bite::spatial::{SpatialError, ZoneAreaMapper};
use bite::{DefaultPipeline, Pipeline, PipelineError};
use geo::{MultiPolygon, polygon};
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

#[derive(Debug)]
struct Zones;

impl ZoneBoundaryProvider for Zones {
    async fn zone_boundaries(&self) -> bite::data::Result<Vec<ZoneGeometry>> {
        Ok(vec![
            ZoneGeometry::new("00601", square(-66.9, 18.1, 0.05)),
            ZoneGeometry::new("00602", square(-66.8, 18.3, 0.05)),
            ZoneGeometry::new("00603", square(-66.2, 18.1, 0.05)),
            ZoneGeometry::new("00604", square(-60.0, 10.0, 0.05)),
        ])
    }
}

#[derive(Debug)]
struct Offline;

impl ZoneBoundaryProvider for Offline {
    async fn zone_boundaries(&self) -> bite::data::Result<Vec<ZoneGeometry>> {
        Err(DataError::Http("503 Service Unavailable".to_string()))
    }
}

#[derive(Debug)]
struct Counties;

impl AreaBoundaryProvider for Counties {
    async fn county_polygons(&self) -> bite::data::Result<Vec<AreaGeometry>> {
        Ok(vec![
            AreaGeometry::new("06037", square(-67.0, 18.0, 0.5)),
            AreaGeometry::new("72003", square(-66.5, 18.0, 0.5)),
        ])
    }
}

fn report(phys: &str, ui: &str, ein: &str, employment: i64, wages: f64) -> RawRecord {
    RawRecord {
        year: 2015,
        qtr: 1,
        phys_addr_5_zip: Some(phys.to_string()),
        ui_addr_5_zip: Some(ui.to_string()),
        mail_addr_5_zip: Some(ui.to_string()),
        ein: Some(ein.to_string()),
        first_month_employment: Some(employment),
        second_month_employment: Some(employment),
        third_month_employment: Some(employment),
        total_wages: Some(wages),
        naics_code: Some("722511".to_string()),
    }
}

fn raw() -> InMemoryRawProvider {
    InMemoryRawProvider::new(vec![
        report("00601", "00601", "660000001", 10, 50_000.0),
        report("00602", "00602", "660000002", 20, 80_000.0),
        report("00603", "33101", "590000003", 5, 6_500.0),
        report("00604", "00604", "660000004", 5, 6_500.0),
    ])
}

fn pipeline<Z: ZoneBoundaryProvider>(zones: Z) -> Pipeline<InMemoryRawProvider, Z, Counties> {
    let cache = ZoneGeometryCache::new(Rc::new(SqliteCache::in_memory().unwrap()));
    Pipeline::new(
        PanelBuilder::new(raw()),
        ZoneAreaMapper::new(cache, zones, Counties),
    )
}

#[tokio::test]
async fn test_domestic_panel() {
    let pipeline = pipeline(Zones);
    let panel = pipeline
        .build_panel(&IndustrySelector::FoodServices, false)
        .await
        .unwrap();

    // 00604 lies outside every county and drops out.
    assert_eq!(panel.len(), 1);
    let row = panel.get(2015, 1, "06037").unwrap();
    assert_relative_eq!(row.total_employment, 30.0);
    assert_relative_eq!(row.total_wages, 130_000.0);
    assert_relative_eq!(row.avg_weekly_wage, 333.333_333, epsilon = 1e-5);
    assert_relative_eq!(row.min_wage, 290.0);
    assert_relative_eq!(row.k_index, 0.87, epsilon = 1e-9);
}

#[tokio::test]
async fn test_foreign_panel() {
    let pipeline = pipeline(Zones);
    let panel = pipeline
        .build_panel(&IndustrySelector::FoodServices, true)
        .await
        .unwrap();

    assert_eq!(panel.len(), 1);
    let row = panel.get(2015, 1, "72003").unwrap();
    assert_relative_eq!(row.total_employment, 5.0);
    assert_relative_eq!(row.avg_weekly_wage, 100.0);
}

#[tokio::test]
async fn test_reference_set_includes_unmapped_zones() {
    let pipeline = pipeline(Zones);
    let reference = pipeline.reference_zone_set().await.unwrap();
    let mapping = pipeline.zone_area_mapping().await.unwrap();

    assert_eq!(reference.len(), 4);
    assert!(reference.contains("00604"));
    assert_eq!(mapping.area_of("00604"), None);
    assert_eq!(mapping.len(), 3);
    assert_eq!(pipeline.reference_zone_set().await.unwrap(), reference);
}

#[tokio::test]
async fn test_zone_source_failure_propagates() {
    let pipeline = pipeline(Offline);
    let err = pipeline
        .build_panel(&IndustrySelector::FoodServices, false)
        .await
        .unwrap_err();

    match err {
        PipelineError::Spatial(SpatialError::Data(inner)) => assert!(inner.is_acquisition()),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_cleaned_records_do_not_need_boundaries() {
    let pipeline = pipeline(Offline);
    assert_eq!(pipeline.cleaned_records().unwrap().height(), 4);
}

#[test]
fn test_cardinality_is_distinguishable() {
    let err = PipelineError::from(PanelError::Cardinality {
        zone: "00601".to_string(),
    });
    assert!(err.is_cardinality());
    assert!(!PipelineError::from(PanelError::MissingReferenceZones).is_cardinality());
}

#[test]
fn test_from_config_rejects_bad_prefix() {
    let config = BiteConfig {
        zone_prefix: "0".to_string(),
        ..BiteConfig::default()
    };
    let err = DefaultPipeline::from_config(&config).unwrap_err();
    assert!(matches!(err, PipelineError::Data(DataError::Config(_))));
}
