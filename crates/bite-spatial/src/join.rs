//! Spatial join of zones against areas.

use crate::mapping::ZoneAreaMapping;
use bite_data::{AreaGeometry, ZoneGeometry};
use geo::{BoundingRect, Intersects, Rect};

/// Result of joining zones to areas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinOutcome {
    /// One area per matched zone
    pub mapping: ZoneAreaMapping,
    /// Zones intersecting no area, in input order
    pub unmatched: Vec<String>,
    /// Zones intersecting more than one area
    pub ambiguous: Vec<String>,
}

/// Left-join zones to areas with the `intersects` predicate.
///
/// Zones are visited in input order and areas in provider order; each zone
/// keeps the first area it intersects. Both inputs must share a reference
/// system.
pub fn join_first_intersecting(zones: &[ZoneGeometry], areas: &[AreaGeometry]) -> JoinOutcome {
    let area_bounds: Vec<Option<Rect<f64>>> =
        areas.iter().map(|a| a.geometry.bounding_rect()).collect();

    let mut outcome = JoinOutcome::default();
    for zone in zones {
        let Some(zone_bounds) = zone.geometry.bounding_rect() else {
            outcome.unmatched.push(zone.zone_code.clone());
            continue;
        };

        let mut hits = areas
            .iter()
            .zip(&area_bounds)
            .filter(|(_, bounds)| bounds.is_some_and(|b| b.intersects(&zone_bounds)))
            .filter(|(area, _)| zone.geometry.intersects(&area.geometry))
            .map(|(area, _)| area);

        match hits.next() {
            Some(first) => {
                outcome
                    .mapping
                    .insert_first(zone.zone_code.clone(), first.area_fips.clone());
                if hits.next().is_some() {
                    outcome.ambiguous.push(zone.zone_code.clone());
                }
            }
            None => outcome.unmatched.push(zone.zone_code.clone()),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{MultiPolygon, polygon};

    fn square(x0: f64, y0: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
            (x: x0, y: y0),
        ]])
    }

    fn areas() -> Vec<AreaGeometry> {
        vec![
            AreaGeometry::new("72001", square(0.0, 0.0, 10.0)),
            AreaGeometry::new("72003", square(10.0, 0.0, 10.0)),
        ]
    }

    #[test]
    fn test_contained_zone() {
        let zones = vec![ZoneGeometry::new("00601", square(2.0, 2.0, 1.0))];
        let outcome = join_first_intersecting(&zones, &areas());
        assert_eq!(outcome.mapping.area_of("00601"), Some("72001"));
        assert!(outcome.unmatched.is_empty());
        assert!(outcome.ambiguous.is_empty());
    }

    #[test]
    fn test_straddling_zone_takes_first_area() {
        let zones = vec![ZoneGeometry::new("00602", square(9.0, 2.0, 2.0))];
        let outcome = join_first_intersecting(&zones, &areas());
        assert_eq!(outcome.mapping.area_of("00602"), Some("72001"));
        assert_eq!(outcome.ambiguous, vec!["00602".to_string()]);

        let mut reversed = areas();
        reversed.reverse();
        let outcome = join_first_intersecting(&zones, &reversed);
        assert_eq!(outcome.mapping.area_of("00602"), Some("72003"));
    }

    #[test]
    fn test_outside_zone_is_unmatched() {
        let zones = vec![
            ZoneGeometry::new("00603", square(50.0, 50.0, 1.0)),
            ZoneGeometry::new("00604", square(12.0, 1.0, 1.0)),
        ];
        let outcome = join_first_intersecting(&zones, &areas());
        assert_eq!(outcome.unmatched, vec!["00603".to_string()]);
        assert_eq!(outcome.mapping.len(), 1);
        assert_eq!(outcome.mapping.area_of("00604"), Some("72003"));
    }

    #[test]
    fn test_mapping_is_a_function() {
        let zones: Vec<ZoneGeometry> = (0..20)
            .map(|i| ZoneGeometry::new(&format!("{:05}", 600 + i), square(i as f64, 1.0, 1.5)))
            .collect();
        let outcome = join_first_intersecting(&zones, &areas());

        let mut seen = std::collections::HashSet::new();
        for (zone, _) in outcome.mapping.iter() {
            assert!(seen.insert(zone.to_string()));
        }
        assert_eq!(outcome.mapping.len(), 20);
    }
}
