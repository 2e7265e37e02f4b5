//! Error types for panel construction.

use bite_data::DataError;
use bite_spatial::SpatialError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Result type for panel operations.
pub type Result<T> = std::result::Result<T, PanelError>;

/// Errors that can occur while cleaning records or building the panel.
#[derive(Debug, Error)]
pub enum PanelError {
    /// Failure loading the raw dataset
    #[error(transparent)]
    Data(#[from] DataError),

    /// Failure converting the zone-area mapping
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// The zone-area mapping lists a zone more than once
    #[error("Zone {zone} appears more than once in the zone-area mapping")]
    Cardinality {
        /// Duplicated zone code
        zone: String,
    },

    /// No reference zones to classify establishments against
    #[error("Reference zone set is empty")]
    MissingReferenceZones,

    /// A required value was null
    #[error("Missing value in column {column} at row {row}")]
    MissingValue {
        /// Column name
        column: String,
        /// Row index
        row: usize,
    },
}
