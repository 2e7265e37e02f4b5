//! Pipeline configuration.
//!
//! Everything the pipeline needs to locate its inputs and its cache lives
//! here. Values can be loaded from a JSON file; missing keys fall back to the
//! defaults.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// TIGER/Line 2024 ZCTA boundaries.
pub const DEFAULT_ZONE_SHAPE_URL: &str =
    "https://www2.census.gov/geo/tiger/TIGER2024/ZCTA520/tl_2024_us_zcta520.zip";

/// TIGER/Line 2024 county boundaries.
pub const DEFAULT_COUNTY_SHAPE_URL: &str =
    "https://www2.census.gov/geo/tiger/TIGER2024/COUNTY/tl_2024_us_county.zip";

/// Zones starting with this prefix form the reference territory.
pub const DEFAULT_ZONE_PREFIX: &str = "00";

/// First year kept in the panel.
pub const DEFAULT_MIN_YEAR: i32 = 2012;

/// Configuration for the panel pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiteConfig {
    /// Root directory for the database, downloads and raw CSV files
    pub saving_dir: PathBuf,
    /// SQLite database file name, relative to `saving_dir`
    pub database_file: String,
    /// Zone boundary shapefile archive
    pub zone_shape_url: String,
    /// County boundary shapefile archive
    pub county_shape_url: String,
    /// Two-character prefix selecting the reference zones
    pub zone_prefix: String,
    /// First year kept in the panel
    pub min_year: i32,
    /// User agent sent with downloads
    pub user_agent: String,
    /// Connect and per-read timeout for downloads, in seconds
    pub timeout_secs: u64,
}

impl Default for BiteConfig {
    fn default() -> Self {
        Self {
            saving_dir: PathBuf::from("data"),
            database_file: "bite.db".to_string(),
            zone_shape_url: DEFAULT_ZONE_SHAPE_URL.to_string(),
            county_shape_url: DEFAULT_COUNTY_SHAPE_URL.to_string(),
            zone_prefix: DEFAULT_ZONE_PREFIX.to_string(),
            min_year: DEFAULT_MIN_YEAR,
            user_agent: concat!("bite/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 60,
        }
    }
}

impl BiteConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Use a different root directory.
    pub fn with_saving_dir<P: Into<PathBuf>>(mut self, saving_dir: P) -> Self {
        self.saving_dir = saving_dir.into();
        self
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.zone_prefix.chars().count() != 2 {
            return Err(DataError::Config(format!(
                "zone_prefix must be two characters, got {:?}",
                self.zone_prefix
            )));
        }
        if self.database_file.is_empty() {
            return Err(DataError::Config("database_file is empty".to_string()));
        }
        Ok(())
    }

    /// Path of the SQLite database.
    pub fn database_path(&self) -> PathBuf {
        self.saving_dir.join(&self.database_file)
    }

    /// Directory holding downloaded external resources.
    pub fn external_dir(&self) -> PathBuf {
        self.saving_dir.join("external")
    }

    /// Local copy of the zone boundary archive.
    pub fn zone_shape_path(&self) -> PathBuf {
        self.external_dir().join("zips_shape.zip")
    }

    /// Local copy of the county boundary archive.
    pub fn county_shape_path(&self) -> PathBuf {
        self.external_dir().join("county_shape.zip")
    }

    /// Directory scanned for raw establishment CSV files.
    pub fn raw_dir(&self) -> PathBuf {
        self.saving_dir.join("raw")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_paths() {
        let config = BiteConfig::default().with_saving_dir("/tmp/bite");
        assert_eq!(config.database_path(), PathBuf::from("/tmp/bite/bite.db"));
        assert_eq!(
            config.zone_shape_path(),
            PathBuf::from("/tmp/bite/external/zips_shape.zip")
        );
        assert_eq!(config.raw_dir(), PathBuf::from("/tmp/bite/raw"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: BiteConfig =
            serde_json::from_str(r#"{"saving_dir": "out", "min_year": 2015}"#).unwrap();
        assert_eq!(config.saving_dir, PathBuf::from("out"));
        assert_eq!(config.min_year, 2015);
        assert_eq!(config.zone_prefix, DEFAULT_ZONE_PREFIX);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case("0")]
    #[case("007")]
    #[case("")]
    fn test_invalid_prefix(#[case] prefix: &str) {
        let config = BiteConfig {
            zone_prefix: prefix.to_string(),
            ..BiteConfig::default()
        };
        assert!(matches!(config.validate(), Err(DataError::Config(_))));
    }
}
