//! Zone and area boundary types and their text encoding.

use crate::error::{DataError, Result};
use geo::{Geometry, MultiPolygon};
use wkt::{ToWkt, TryFromWkt};

/// A postal zone's boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneGeometry {
    /// Trimmed zone code
    pub zone_code: String,
    /// Boundary in the coordinates of the source shapefile
    pub geometry: MultiPolygon<f64>,
}

impl ZoneGeometry {
    /// Create a zone geometry, trimming the code.
    pub fn new(zone_code: &str, geometry: MultiPolygon<f64>) -> Self {
        Self {
            zone_code: zone_code.trim().to_string(),
            geometry,
        }
    }

    /// Well-known-text encoding of the boundary.
    pub fn to_wkt(&self) -> String {
        self.geometry.wkt_string()
    }

    /// Parse a cached row back into a zone geometry.
    pub fn from_wkt(zone_code: &str, text: &str) -> Result<Self> {
        let geometry = parse_multipolygon(text).map_err(|reason| DataError::MalformedGeometry {
            zone: zone_code.to_string(),
            reason,
        })?;
        Ok(Self::new(zone_code, geometry))
    }
}

/// An administrative area's boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaGeometry {
    /// Area identifier (county FIPS)
    pub area_fips: String,
    /// Boundary in the coordinates of the source shapefile
    pub geometry: MultiPolygon<f64>,
}

impl AreaGeometry {
    /// Create an area geometry.
    pub fn new(area_fips: impl Into<String>, geometry: MultiPolygon<f64>) -> Self {
        Self {
            area_fips: area_fips.into(),
            geometry,
        }
    }
}

/// Coerce an arbitrary geometry into a multipolygon.
pub fn into_multipolygon(geometry: Geometry<f64>) -> std::result::Result<MultiPolygon<f64>, String> {
    match geometry {
        Geometry::Polygon(polygon) => Ok(MultiPolygon::new(vec![polygon])),
        Geometry::MultiPolygon(multi) => Ok(multi),
        Geometry::Rect(rect) => Ok(MultiPolygon::new(vec![rect.to_polygon()])),
        Geometry::GeometryCollection(collection) => {
            let mut polygons = Vec::new();
            for member in collection {
                polygons.extend(into_multipolygon(member)?);
            }
            Ok(MultiPolygon::new(polygons))
        }
        other => Err(format!("expected a polygonal geometry, got {other:?}")),
    }
}

fn parse_multipolygon(text: &str) -> std::result::Result<MultiPolygon<f64>, String> {
    let geometry = Geometry::<f64>::try_from_wkt_str(text).map_err(|e| e.to_string())?;
    into_multipolygon(geometry)
}
