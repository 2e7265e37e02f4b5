#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/diffreg/bite/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod pipeline;

// Re-export main types from sub-crates
pub use bite_data as data;
pub use bite_output as output;
pub use bite_panel as panel;
pub use bite_spatial as spatial;

pub use error::{PipelineError, Result};
pub use pipeline::{DefaultPipeline, Pipeline};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
