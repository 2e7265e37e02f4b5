//! Error types for spatial operations.

use bite_data::DataError;
use thiserror::Error;

/// Result type for spatial operations.
pub type Result<T> = std::result::Result<T, SpatialError>;

/// Errors that can occur while building the zone-area mapping.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// Failure loading, fetching or caching boundaries
    #[error(transparent)]
    Data(#[from] DataError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// A zone was assigned to two different areas
    #[error("Zone {zone} maps to both {first} and {second}")]
    Cardinality {
        /// Zone code
        zone: String,
        /// Area already recorded for the zone
        first: String,
        /// Conflicting area
        second: String,
    },
}
