//! Zone to area mapping backed by the zone geometry cache.

use crate::error::Result;
use crate::join::{JoinOutcome, join_first_intersecting};
use crate::mapping::{ReferenceZoneSet, ZoneAreaMapping};
use crate::projection::{Crs, reproject};
use bite_data::{
    AreaBoundaryProvider, AreaGeometry, ZoneBoundaryProvider, ZoneGeometry, ZoneGeometryCache,
};

/// Builds the zone-area mapping and the reference zone set.
///
/// The zone boundaries are processed once and persisted; every later call
/// reads the cache. Area boundaries are requested on every mapping build.
#[derive(Debug)]
pub struct ZoneAreaMapper<Z, A> {
    cache: ZoneGeometryCache,
    zones: Z,
    areas: A,
    source_crs: Crs,
    target_crs: Crs,
}

impl<Z: ZoneBoundaryProvider, A: AreaBoundaryProvider> ZoneAreaMapper<Z, A> {
    /// Create a mapper reading NAD83 shapes and joining in World Mercator.
    pub const fn new(cache: ZoneGeometryCache, zones: Z, areas: A) -> Self {
        Self {
            cache,
            zones,
            areas,
            source_crs: Crs::Nad83,
            target_crs: Crs::WorldMercator,
        }
    }

    /// Override the source and join reference systems.
    pub fn with_crs(mut self, source: Crs, target: Crs) -> Self {
        self.source_crs = source;
        self.target_crs = target;
        self
    }

    /// The underlying cache.
    pub const fn cache(&self) -> &ZoneGeometryCache {
        &self.cache
    }

    /// The zone boundary source used to build the cache.
    pub const fn zone_source(&self) -> &Z {
        &self.zones
    }

    /// Build the zone cache if it is absent. Returns whether a build happened.
    pub async fn ensure_zone_cache(&self) -> Result<bool> {
        if self.cache.exists()? {
            log::debug!("Zone geometry cache present");
            return Ok(false);
        }

        log::info!("Zone geometry cache missing, processing boundary shapefile");
        let zones = self.zones.zone_boundaries().await?;
        self.cache.build(&zones)?;
        Ok(true)
    }

    /// Cached zone geometries, in source coordinates.
    pub async fn zone_geometries(&self) -> Result<Vec<ZoneGeometry>> {
        self.ensure_zone_cache().await?;
        Ok(self.cache.read_geometries()?)
    }

    /// Every zone code in the cache, whether or not it maps to an area.
    pub async fn reference_zone_set(&self) -> Result<ReferenceZoneSet> {
        self.ensure_zone_cache().await?;
        Ok(ReferenceZoneSet::new(self.cache.zone_codes()?))
    }

    /// Join cached zones against the area boundaries.
    pub async fn spatial_join(&self) -> Result<JoinOutcome> {
        let zones: Vec<ZoneGeometry> = self
            .zone_geometries()
            .await?
            .into_iter()
            .map(|zone| ZoneGeometry {
                geometry: reproject(&zone.geometry, self.source_crs, self.target_crs),
                ..zone
            })
            .collect();

        let areas: Vec<AreaGeometry> = self
            .areas
            .county_polygons()
            .await?
            .into_iter()
            .map(|area| AreaGeometry {
                geometry: reproject(&area.geometry, self.source_crs, self.target_crs),
                ..area
            })
            .collect();

        log::info!(
            "Joining {} zones against {} areas in {}",
            zones.len(),
            areas.len(),
            self.target_crs
        );
        let outcome = join_first_intersecting(&zones, &areas);

        if !outcome.ambiguous.is_empty() {
            log::info!(
                "{} zones intersect several areas; kept the first match",
                outcome.ambiguous.len()
            );
        }
        if !outcome.unmatched.is_empty() {
            log::warn!(
                "{} zones intersect no area and stay unmapped: {}",
                outcome.unmatched.len(),
                outcome.unmatched.join(", ")
            );
        }
        Ok(outcome)
    }

    /// Zone code to area identifier, one area per zone.
    pub async fn zone_area_mapping(&self) -> Result<ZoneAreaMapping> {
        Ok(self.spatial_join().await?.mapping)
    }
}
