//! Coordinate reference systems and reprojection.
//!
//! Only the two systems the pipeline uses are supported: NAD83 geographic
//! coordinates, as shipped in TIGER/Line files, and World Mercator, a metric
//! planar system used for intersection tests. The NAD83 to WGS84 datum shift
//! is treated as null, which matches PROJ without transformation grids.

use derive_more::Display;
use geo::{Coord, MapCoords, MultiPolygon};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// WGS84 semi-major axis in metres.
const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS84 flattening.
const FLATTENING: f64 = 1.0 / 298.257_223_563;

/// Iterations of the inverse latitude series.
const INVERSE_ITERATIONS: usize = 15;

/// Coordinate reference systems known to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Crs {
    /// NAD83 longitude/latitude in degrees
    #[display("EPSG:4269")]
    Nad83,
    /// World Mercator in metres
    #[display("EPSG:3395")]
    WorldMercator,
}

impl Crs {
    /// EPSG code.
    pub const fn epsg(&self) -> u32 {
        match self {
            Self::Nad83 => 4269,
            Self::WorldMercator => 3395,
        }
    }

    /// Parse an `EPSG:nnnn` identifier.
    pub fn from_epsg(code: u32) -> Option<Self> {
        match code {
            4269 => Some(Self::Nad83),
            3395 => Some(Self::WorldMercator),
            _ => None,
        }
    }

    /// True for systems measured in metres.
    pub const fn is_planar(&self) -> bool {
        matches!(self, Self::WorldMercator)
    }
}

fn eccentricity() -> f64 {
    (FLATTENING * (2.0 - FLATTENING)).sqrt()
}

/// Project a longitude/latitude pair in degrees to World Mercator metres.
pub fn mercator_forward(c: Coord<f64>) -> Coord<f64> {
    let e = eccentricity();
    let lambda = c.x.to_radians();
    let phi = c.y.to_radians();
    let es = e * phi.sin();
    let y = ((FRAC_PI_4 + phi / 2.0).tan() * ((1.0 - es) / (1.0 + es)).powf(e / 2.0)).ln();
    Coord {
        x: SEMI_MAJOR_AXIS * lambda,
        y: SEMI_MAJOR_AXIS * y,
    }
}

/// Invert [`mercator_forward`].
pub fn mercator_inverse(c: Coord<f64>) -> Coord<f64> {
    let e = eccentricity();
    let t = (-c.y / SEMI_MAJOR_AXIS).exp();
    let mut phi = FRAC_PI_2 - 2.0 * t.atan();
    for _ in 0..INVERSE_ITERATIONS {
        let es = e * phi.sin();
        phi = FRAC_PI_2 - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(e / 2.0)).atan();
    }
    Coord {
        x: (c.x / SEMI_MAJOR_AXIS).to_degrees(),
        y: phi.to_degrees(),
    }
}

/// Reproject a boundary between reference systems.
pub fn reproject(geometry: &MultiPolygon<f64>, from: Crs, to: Crs) -> MultiPolygon<f64> {
    match (from, to) {
        (Crs::Nad83, Crs::WorldMercator) => geometry.map_coords(mercator_forward),
        (Crs::WorldMercator, Crs::Nad83) => geometry.map_coords(mercator_inverse),
        _ => geometry.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::polygon;
    use rstest::rstest;

    #[rstest]
    #[case(-66.0, 18.0, -7_347_086.392_356, 2_024_351.425_670)]
    #[case(-118.25, 34.05, -13_163_529.786_305, 4_011_593.919_101)]
    #[case(0.0, 0.0, 0.0, 0.0)]
    fn test_forward_reference_values(
        #[case] lon: f64,
        #[case] lat: f64,
        #[case] x: f64,
        #[case] y: f64,
    ) {
        let projected = mercator_forward(Coord { x: lon, y: lat });
        assert_relative_eq!(projected.x, x, epsilon = 1e-3);
        assert_relative_eq!(projected.y, y, epsilon = 1e-3);
    }

    #[test]
    fn test_inverse_recovers_input() {
        let original = Coord { x: -66.7, y: 18.2 };
        let back = mercator_inverse(mercator_forward(original));
        assert_relative_eq!(back.x, original.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, original.y, epsilon = 1e-9);
    }

    #[test]
    fn test_identity_reprojection() {
        let geometry = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ]]);
        assert_eq!(reproject(&geometry, Crs::Nad83, Crs::Nad83), geometry);
    }

    #[test]
    fn test_crs_display() {
        assert_eq!(Crs::Nad83.to_string(), "EPSG:4269");
        assert_eq!(Crs::WorldMercator.to_string(), "EPSG:3395");
        assert_eq!(Crs::from_epsg(3395), Some(Crs::WorldMercator));
        assert_eq!(Crs::from_epsg(4326), None);
        assert!(Crs::WorldMercator.is_planar());
    }
}
