//! Establishment record cleaning.

use crate::error::Result;
use crate::record::EstablishmentQuarterRecord;
use bite_data::RawDataProvider;
use polars::prelude::*;

/// Months in a quarter, for averaging monthly employment.
const MONTHS_PER_QUARTER: f64 = 3.0;

/// Turns raw establishment reports into cleaned quarterly records.
#[derive(Debug, Clone)]
pub struct EstablishmentCleaner<R> {
    provider: R,
}

impl<R: RawDataProvider> EstablishmentCleaner<R> {
    /// Create a cleaner over a raw data provider.
    pub const fn new(provider: R) -> Self {
        Self { provider }
    }

    /// The raw data provider.
    pub const fn provider(&self) -> &R {
        &self.provider
    }

    /// Cleaned records as a frame.
    ///
    /// Builds the raw dataset first if it is absent.
    pub fn cleaned_records(&self) -> Result<DataFrame> {
        self.provider.ensure_raw_dataset()?;
        let raw = self.provider.raw_records()?;
        let raw_rows = raw.height();

        let cleaned = clean(raw.lazy()).collect()?;
        log::debug!(
            "Cleaned {} raw records into {} establishment-quarters",
            raw_rows,
            cleaned.height()
        );
        Ok(cleaned)
    }

    /// Cleaned records as typed values.
    pub fn cleaned_rows(&self) -> Result<Vec<EstablishmentQuarterRecord>> {
        EstablishmentQuarterRecord::from_frame(&self.cleaned_records()?)
    }
}

/// Cleaning plan over a raw frame.
pub fn clean(raw: LazyFrame) -> LazyFrame {
    let months = [
        "first_month_employment",
        "second_month_employment",
        "third_month_employment",
    ];

    raw.select([
        col("year"),
        col("qtr"),
        col("phys_addr_5_zip").alias("zipcode"),
        col("ui_addr_5_zip"),
        col("mail_addr_5_zip"),
        col("ein"),
        col(months[0]),
        col(months[1]),
        col(months[2]),
        col("total_wages"),
        col("naics_code"),
    ])
    // Null compares as null and is dropped with the empty strings
    .filter(
        col("zipcode")
            .neq(lit(""))
            .and(col("naics_code").neq(lit(""))),
    )
    .with_columns([
        col(months[0]).fill_null(lit(0)).cast(DataType::Int64),
        col(months[1]).fill_null(lit(0)).cast(DataType::Int64),
        col(months[2]).fill_null(lit(0)).cast(DataType::Int64),
        col("total_wages").fill_null(lit(0.0)).cast(DataType::Float64),
    ])
    .with_column(
        ((col(months[0]) + col(months[1]) + col(months[2])).cast(DataType::Float64)
            / lit(MONTHS_PER_QUARTER))
        .alias("total_employment"),
    )
    .filter(
        col("total_employment")
            .neq(lit(0.0))
            .and(col("total_wages").neq(lit(0.0))),
    )
    .with_column(
        col("naics_code")
            .str()
            .slice(lit(0), lit(2))
            .alias("sector"),
    )
}
