//! Errors surfaced by the end-to-end pipeline.

use bite_data::DataError;
use bite_panel::PanelError;
use bite_spatial::SpatialError;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Any failure while producing a panel.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration, acquisition or cache failure
    #[error(transparent)]
    Data(#[from] DataError),

    /// Zone-area mapping failure
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    /// Cleaning or aggregation failure
    #[error(transparent)]
    Panel(#[from] PanelError),
}

impl PipelineError {
    /// True when a zone maps to more than one area.
    pub const fn is_cardinality(&self) -> bool {
        matches!(
            self,
            Self::Spatial(SpatialError::Cardinality { .. })
                | Self::Panel(PanelError::Cardinality { .. })
                | Self::Panel(PanelError::Spatial(SpatialError::Cardinality { .. }))
        )
    }
}
