//! Quarterly area panel.

use crate::error::Result;
use crate::frame::{f64_values, i32_values, required, str_values};
use crate::minwage::UNKNOWN_MIN_WAGE;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column names of the panel frame, in order.
pub const PANEL_COLUMNS: [&str; 8] = [
    "year",
    "qtr",
    "area_fips",
    "total_employment",
    "total_wages",
    "avg_weekly_wage",
    "min_wage",
    "k_index",
];

/// Aggregates for one area in one quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRow {
    /// Reference year
    pub year: i32,
    /// Quarter, 1 to 4
    pub qtr: i32,
    /// County identifier
    pub area_fips: String,
    /// Summed mean monthly employment
    pub total_employment: f64,
    /// Summed quarterly wages
    pub total_wages: f64,
    /// `total_wages / (total_employment * 13)`
    pub avg_weekly_wage: f64,
    /// Weekly minimum wage, or -1 when the year is not covered
    pub min_wage: f64,
    /// `min_wage / avg_weekly_wage`
    pub k_index: f64,
}

impl PanelRow {
    /// False for rows carrying the unknown minimum wage sentinel.
    pub fn has_defined_min_wage(&self) -> bool {
        self.min_wage != UNKNOWN_MIN_WAGE
    }
}

/// Panel of (year, quarter, area) rows sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyAreaPanel {
    rows: Vec<PanelRow>,
}

impl QuarterlyAreaPanel {
    /// Wrap rows, sorting them by (year, quarter, area).
    pub fn new(mut rows: Vec<PanelRow>) -> Self {
        rows.sort_by(|a, b| {
            (a.year, a.qtr, a.area_fips.as_str()).cmp(&(b.year, b.qtr, b.area_fips.as_str()))
        });
        Self { rows }
    }

    /// Read a panel frame with [`PANEL_COLUMNS`].
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let years = required(i32_values(df, "year")?, "year")?;
        let qtrs = required(i32_values(df, "qtr")?, "qtr")?;
        let areas = required(str_values(df, "area_fips")?, "area_fips")?;
        let employment = required(f64_values(df, "total_employment")?, "total_employment")?;
        let wages = required(f64_values(df, "total_wages")?, "total_wages")?;
        let weekly = required(f64_values(df, "avg_weekly_wage")?, "avg_weekly_wage")?;
        let min_wage = required(f64_values(df, "min_wage")?, "min_wage")?;
        let k_index = required(f64_values(df, "k_index")?, "k_index")?;

        let rows = (0..df.height())
            .map(|i| PanelRow {
                year: years[i],
                qtr: qtrs[i],
                area_fips: areas[i].clone(),
                total_employment: employment[i],
                total_wages: wages[i],
                avg_weekly_wage: weekly[i],
                min_wage: min_wage[i],
                k_index: k_index[i],
            })
            .collect();
        Ok(Self::new(rows))
    }

    /// Panel as a frame with [`PANEL_COLUMNS`].
    pub fn to_frame(&self) -> Result<DataFrame> {
        let rows = &self.rows;
        let df = DataFrame::new(vec![
            Series::new("year".into(), rows.iter().map(|r| r.year).collect::<Vec<_>>()).into(),
            Series::new("qtr".into(), rows.iter().map(|r| r.qtr).collect::<Vec<_>>()).into(),
            Series::new(
                "area_fips".into(),
                rows.iter().map(|r| r.area_fips.as_str()).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "total_employment".into(),
                rows.iter().map(|r| r.total_employment).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "total_wages".into(),
                rows.iter().map(|r| r.total_wages).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "avg_weekly_wage".into(),
                rows.iter().map(|r| r.avg_weekly_wage).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "min_wage".into(),
                rows.iter().map(|r| r.min_wage).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "k_index".into(),
                rows.iter().map(|r| r.k_index).collect::<Vec<_>>(),
            )
            .into(),
        ])?;
        Ok(df)
    }

    /// The rows.
    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    /// Consume the panel, returning its rows.
    pub fn into_rows(self) -> Vec<PanelRow> {
        self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the panel has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for one key.
    pub fn get(&self, year: i32, qtr: i32, area_fips: &str) -> Option<&PanelRow> {
        self.rows
            .iter()
            .find(|r| r.year == year && r.qtr == qtr && r.area_fips == area_fips)
    }

    /// Panel without the rows whose year has no minimum wage.
    pub fn with_defined_min_wage(&self) -> Self {
        Self {
            rows: self
                .rows
                .iter()
                .filter(|r| r.has_defined_min_wage())
                .cloned()
                .collect(),
        }
    }
}
