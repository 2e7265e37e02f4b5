#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/diffreg/bite/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod geometry;
pub mod raw;
pub mod shapes;

pub use cache::{CacheStats, SqliteCache, ZoneGeometryCache};
pub use config::BiteConfig;
pub use error::{DataError, Result};
pub use fetch::{FileFetcher, HttpFetcher};
pub use geometry::{AreaGeometry, ZoneGeometry};
pub use raw::{InMemoryRawProvider, RawDataProvider, RawRecord, SqliteRawStore};
pub use shapes::{AreaBoundaryProvider, TigerCountyShapes, TigerZoneShapes, ZoneBoundaryProvider};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
