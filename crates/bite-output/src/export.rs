//! CSV and JSON export of quarterly area panels.

use bite_panel::{PanelRow, QuarterlyAreaPanel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Comma-separated values format.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// A panel with the selection that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelExport {
    /// Industry selector, as given on the command line.
    pub industry: String,

    /// Whether the panel covers foreign employers.
    pub foreign_only: bool,

    /// When the export was produced.
    pub generated_at: DateTime<Utc>,

    /// Panel rows sorted by year, quarter and area.
    pub rows: Vec<PanelRow>,
}

impl PanelExport {
    /// Wrap a panel for export.
    pub fn new(
        industry: impl Into<String>,
        foreign_only: bool,
        panel: &QuarterlyAreaPanel,
    ) -> Self {
        Self {
            industry: industry.into(),
            foreign_only,
            generated_at: Utc::now(),
            rows: panel.rows().to_vec(),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Serialize rows as CSV with a header line.
fn rows_to_csv<'a, I>(rows: I) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a PanelRow>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

impl Exporter for PanelExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            // Metadata only travels in JSON
            ExportFormat::Csv => rows_to_csv(&self.rows),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for QuarterlyAreaPanel {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => rows_to_csv(self.rows()),
            ExportFormat::Json => Ok(serde_json::to_string(self.rows())?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self.rows())?),
        }
    }
}
