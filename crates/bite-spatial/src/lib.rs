#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/diffreg/bite/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod join;
pub mod mapper;
pub mod mapping;
pub mod projection;

pub use error::{Result, SpatialError};
pub use join::{JoinOutcome, join_first_intersecting};
pub use mapper::ZoneAreaMapper;
pub use mapping::{ReferenceZoneSet, ZoneAreaMapping};
pub use projection::{Crs, reproject};
