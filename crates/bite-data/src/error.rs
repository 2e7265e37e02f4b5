//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Shapefile reading error
    #[error("Shapefile error: {0}")]
    Shapefile(String),

    /// Archive error
    #[error("Archive error: {0}")]
    Zip(String),

    /// Text-encoded geometry could not be parsed
    #[error("Malformed geometry for zone {zone}: {reason}")]
    MalformedGeometry {
        /// Zone code of the offending row
        zone: String,
        /// Parser message
        reason: String,
    },

    /// Missing data
    #[error("Missing data for {what}: {reason}")]
    MissingData {
        /// What was being loaded
        what: String,
        /// Reason for missing data
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<zip::result::ZipError> for DataError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Zip(err.to_string())
    }
}

impl From<shapefile::Error> for DataError {
    fn from(err: shapefile::Error) -> Self {
        Self::Shapefile(err.to_string())
    }
}

impl DataError {
    /// Returns true for failures while acquiring remote or on-disk inputs.
    pub const fn is_acquisition(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Http(_) | Self::Io(_) | Self::Zip(_) | Self::Shapefile(_)
        )
    }
}
