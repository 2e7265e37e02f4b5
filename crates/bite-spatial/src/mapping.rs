//! Zone to area mapping and the reference zone set.

use crate::error::{Result, SpatialError};
use polars::prelude::*;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// Function from zone code to the single area containing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneAreaMapping {
    areas: BTreeMap<String, String>,
}

impl ZoneAreaMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping, rejecting any zone listed with two different areas.
    pub fn from_pairs<I, Z, A>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Z, A)>,
        Z: Into<String>,
        A: Into<String>,
    {
        let mut mapping = Self::new();
        for (zone, area) in pairs {
            let zone = zone.into();
            let area = area.into();
            match mapping.areas.get(&zone) {
                Some(existing) if *existing != area => {
                    return Err(SpatialError::Cardinality {
                        zone,
                        first: existing.clone(),
                        second: area,
                    });
                }
                Some(_) => {}
                None => {
                    mapping.areas.insert(zone, area);
                }
            }
        }
        Ok(mapping)
    }

    /// Record `area` for `zone` unless the zone already has one.
    ///
    /// Returns whether the pair was inserted.
    pub fn insert_first(&mut self, zone: impl Into<String>, area: impl Into<String>) -> bool {
        match self.areas.entry(zone.into()) {
            Entry::Vacant(slot) => {
                slot.insert(area.into());
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Area containing `zone`.
    pub fn area_of(&self, zone: &str) -> Option<&str> {
        self.areas.get(zone).map(String::as_str)
    }

    /// Number of mapped zones.
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// True when no zone is mapped.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Iterate `(zone, area)` pairs ordered by zone code.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.areas.iter().map(|(z, a)| (z.as_str(), a.as_str()))
    }

    /// Two-column frame `[zipcode, area_fips]`.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let zones: Vec<&str> = self.areas.keys().map(String::as_str).collect();
        let areas: Vec<&str> = self.areas.values().map(String::as_str).collect();

        let df = DataFrame::new(vec![
            Series::new("zipcode".into(), zones).into(),
            Series::new("area_fips".into(), areas).into(),
        ])?;
        Ok(df)
    }
}

/// Zone codes of the reference territory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceZoneSet {
    zones: BTreeSet<String>,
}

impl ReferenceZoneSet {
    /// Wrap a set of zone codes.
    pub const fn new(zones: BTreeSet<String>) -> Self {
        Self { zones }
    }

    /// Membership test.
    pub fn contains(&self, zone: &str) -> bool {
        self.zones.contains(zone)
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// True when the set is empty.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Iterate zone codes in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ReferenceZoneSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicting_pairs_rejected() {
        let err =
            ZoneAreaMapping::from_pairs([("00601", "72001"), ("00601", "72003")]).unwrap_err();
        match err {
            SpatialError::Cardinality {
                zone,
                first,
                second,
            } => {
                assert_eq!(zone, "00601");
                assert_eq!(first, "72001");
                assert_eq!(second, "72003");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_repeated_identical_pair_is_accepted() {
        let mapping =
            ZoneAreaMapping::from_pairs([("00601", "72001"), ("00601", "72001")]).unwrap();
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_insert_first_keeps_first() {
        let mut mapping = ZoneAreaMapping::new();
        assert!(mapping.insert_first("00601", "72001"));
        assert!(!mapping.insert_first("00601", "72003"));
        assert_eq!(mapping.area_of("00601"), Some("72001"));
        assert_eq!(mapping.area_of("00602"), None);
    }

    #[test]
    fn test_to_frame() {
        let mapping =
            ZoneAreaMapping::from_pairs([("00602", "72003"), ("00601", "72001")]).unwrap();
        let df = mapping.to_frame().unwrap();
        assert_eq!(df.height(), 2);
        let zips = df.column("zipcode").unwrap().str().unwrap();
        assert_eq!(zips.get(0), Some("00601"));
        let areas = df.column("area_fips").unwrap().str().unwrap();
        assert_eq!(areas.get(1), Some("72003"));
    }

    #[test]
    fn test_reference_set() {
        let set: ReferenceZoneSet = ["00601", "00602"].into_iter().collect();
        assert!(set.contains("00601"));
        assert!(!set.contains("33101"));
        assert_eq!(set.len(), 2);
    }
}
