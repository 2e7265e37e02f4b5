//! Boundary shapefiles.
//!
//! TIGER/Line archives ship a `.shp`/`.dbf` pair inside a zip file. Both
//! members are read into memory and decoded together.

use crate::config::BiteConfig;
use crate::error::{DataError, Result};
use crate::fetch::FileFetcher;
use crate::geometry::{AreaGeometry, ZoneGeometry, into_multipolygon};
use geo::{Geometry, MultiPolygon};
use shapefile::dbase::{FieldValue, Record};
use std::future::Future;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// Zone code attribute in the TIGER 2020 ZCTA layer.
pub const ZCTA_FIELD: &str = "ZCTA5CE20";

/// County identifier attribute (state FIPS followed by county FIPS).
pub const COUNTY_FIELD: &str = "GEOID";

/// Source of reference-territory zone boundaries.
pub trait ZoneBoundaryProvider {
    /// Zone boundaries for the reference territory.
    fn zone_boundaries(&self) -> impl Future<Output = Result<Vec<ZoneGeometry>>>;
}

/// Source of administrative area boundaries.
pub trait AreaBoundaryProvider {
    /// County polygons with their identifiers.
    fn county_polygons(&self) -> impl Future<Output = Result<Vec<AreaGeometry>>>;
}

/// Text value of a character attribute, if set.
fn character_field<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    match record.get(field) {
        Some(FieldValue::Character(Some(value))) => Some(value.as_str()),
        _ => None,
    }
}

/// Pull the `.shp` and `.dbf` members out of a zip archive.
fn archive_members(path: &Path) -> Result<(Vec<u8>, Vec<u8>)> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut shp = None;
    let mut dbf = None;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_ascii_lowercase();
        let slot = if name.ends_with(".shp") {
            &mut shp
        } else if name.ends_with(".dbf") {
            &mut dbf
        } else {
            continue;
        };
        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut buf)?;
        *slot = Some(buf);
    }

    match (shp, dbf) {
        (Some(shp), Some(dbf)) => Ok((shp, dbf)),
        _ => Err(DataError::Shapefile(format!(
            "{} does not contain a .shp/.dbf pair",
            path.display()
        ))),
    }
}

/// Read polygons from a zipped shapefile.
///
/// `key` picks the identifier from each attribute record; shapes of records
/// for which it returns `None` are dropped before conversion to `geo` types.
pub fn read_shapefile_archive<F>(
    path: &Path,
    mut key: F,
) -> Result<Vec<(String, MultiPolygon<f64>)>>
where
    F: FnMut(&Record) -> Option<String>,
{
    let (shp, dbf) = archive_members(path)?;
    let shape_reader = shapefile::ShapeReader::new(Cursor::new(shp))?;
    let dbase_reader = shapefile::dbase::Reader::new(Cursor::new(dbf))
        .map_err(|e| DataError::Shapefile(e.to_string()))?;
    let mut reader = shapefile::Reader::new(shape_reader, dbase_reader);

    let mut out = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;
        let Some(id) = key(&record) else {
            continue;
        };
        let geometry = Geometry::<f64>::try_from(shape)
            .map_err(|e| DataError::Shapefile(format!("{id}: {e}")))?;
        let polygons = into_multipolygon(geometry)
            .map_err(|reason| DataError::Shapefile(format!("{id}: {reason}")))?;
        out.push((id, polygons));
    }

    log::debug!("Read {} shapes from {}", out.len(), path.display());
    Ok(out)
}

/// TIGER ZCTA boundaries restricted to a two-character prefix.
#[derive(Debug, Clone)]
pub struct TigerZoneShapes<F> {
    fetcher: F,
    url: String,
    path: PathBuf,
    prefix: String,
}

impl<F: FileFetcher> TigerZoneShapes<F> {
    /// Create a zone source.
    pub fn new(
        fetcher: F,
        url: impl Into<String>,
        path: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            url: url.into(),
            path: path.into(),
            prefix: prefix.into(),
        }
    }

    /// Create a zone source from the pipeline configuration.
    pub fn from_config(fetcher: F, config: &BiteConfig) -> Self {
        Self::new(
            fetcher,
            config.zone_shape_url.clone(),
            config.zone_shape_path(),
            config.zone_prefix.clone(),
        )
    }
}

impl<F: FileFetcher> ZoneBoundaryProvider for TigerZoneShapes<F> {
    async fn zone_boundaries(&self) -> Result<Vec<ZoneGeometry>> {
        self.fetcher.fetch_file(&self.url, &self.path).await?;

        let prefix = self.prefix.as_str();
        let shapes = read_shapefile_archive(&self.path, |record| {
            character_field(record, ZCTA_FIELD)
                .filter(|code| code.starts_with(prefix))
                .map(str::to_string)
        })?;

        let zones: Vec<ZoneGeometry> = shapes
            .into_iter()
            .map(|(code, geometry)| ZoneGeometry::new(&code, geometry))
            .collect();
        log::info!("Loaded {} zones with prefix {:?}", zones.len(), self.prefix);
        Ok(zones)
    }
}

/// TIGER county boundaries keyed by GEOID.
#[derive(Debug, Clone)]
pub struct TigerCountyShapes<F> {
    fetcher: F,
    url: String,
    path: PathBuf,
}

impl<F: FileFetcher> TigerCountyShapes<F> {
    /// Create a county source.
    pub fn new(fetcher: F, url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            url: url.into(),
            path: path.into(),
        }
    }

    /// Create a county source from the pipeline configuration.
    pub fn from_config(fetcher: F, config: &BiteConfig) -> Self {
        Self::new(fetcher, config.county_shape_url.clone(), config.county_shape_path())
    }
}

impl<F: FileFetcher> AreaBoundaryProvider for TigerCountyShapes<F> {
    async fn county_polygons(&self) -> Result<Vec<AreaGeometry>> {
        self.fetcher.fetch_file(&self.url, &self.path).await?;

        let shapes = read_shapefile_archive(&self.path, |record| {
            character_field(record, COUNTY_FIELD).map(|geoid| geoid.trim().to_string())
        })?;

        let areas: Vec<AreaGeometry> = shapes
            .into_iter()
            .map(|(fips, geometry)| AreaGeometry::new(fips, geometry))
            .collect();
        log::info!("Loaded {} county polygons", areas.len());
        Ok(areas)
    }
}
