#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/diffreg/bite/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod cleaner;
pub mod error;
mod frame;
pub mod industry;
pub mod minwage;
pub mod panel;
pub mod predicate;
pub mod record;

pub use builder::{PanelBuilder, PanelConfig, WEEKS_PER_QUARTER, ensure_many_to_one};
pub use cleaner::EstablishmentCleaner;
pub use error::{PanelError, Result};
pub use industry::IndustrySelector;
pub use minwage::{MinWageBracket, MinimumWageSchedule, UNKNOWN_MIN_WAGE};
pub use panel::{PANEL_COLUMNS, PanelRow, QuarterlyAreaPanel};
pub use predicate::{DomesticPredicate, FOREIGN_COLUMN, flag_foreign};
pub use record::EstablishmentQuarterRecord;
