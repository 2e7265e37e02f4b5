#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/diffreg/bite/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod summary;

pub use export::{ExportError, ExportFormat, Exporter, PanelExport};
pub use summary::{PanelSummary, YearSummary};
