//! Quarterly area panel construction.

use crate::cleaner::EstablishmentCleaner;
use crate::error::{PanelError, Result};
use crate::industry::IndustrySelector;
use crate::minwage::MinimumWageSchedule;
use crate::panel::{PANEL_COLUMNS, QuarterlyAreaPanel};
use crate::predicate::{DomesticPredicate, FOREIGN_COLUMN, flag_foreign};
use bite_data::config::DEFAULT_MIN_YEAR;
use bite_data::{BiteConfig, RawDataProvider};
use bite_spatial::ZoneAreaMapping;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Weeks in a quarter, for weekly wage averages.
pub const WEEKS_PER_QUARTER: f64 = 13.0;

/// Panel construction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Earliest year kept
    pub min_year: i32,
    /// Minimum wage by year
    pub schedule: MinimumWageSchedule,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            min_year: DEFAULT_MIN_YEAR,
            schedule: MinimumWageSchedule::default(),
        }
    }
}

impl PanelConfig {
    /// Settings taken from the pipeline configuration.
    pub fn from_config(config: &BiteConfig) -> Self {
        Self {
            min_year: config.min_year,
            ..Self::default()
        }
    }
}

/// Builds industry panels from cleaned establishment records.
#[derive(Debug, Clone)]
pub struct PanelBuilder<R> {
    cleaner: EstablishmentCleaner<R>,
    config: PanelConfig,
}

impl<R: RawDataProvider> PanelBuilder<R> {
    /// Create a builder with default settings.
    pub fn new(provider: R) -> Self {
        Self {
            cleaner: EstablishmentCleaner::new(provider),
            config: PanelConfig::default(),
        }
    }

    /// Replace the settings.
    pub fn with_config(mut self, config: PanelConfig) -> Self {
        self.config = config;
        self
    }

    /// The record cleaner.
    pub const fn cleaner(&self) -> &EstablishmentCleaner<R> {
        &self.cleaner
    }

    /// The settings.
    pub const fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Cleaned records of one industry and one side of the foreign split.
    ///
    /// The returned frame carries the [`FOREIGN_COLUMN`] flag.
    pub fn select_records<P: DomesticPredicate + ?Sized>(
        &self,
        selector: &IndustrySelector,
        foreign_only: bool,
        predicate: &P,
    ) -> Result<DataFrame> {
        predicate.validate()?;
        let cleaned = self.cleaner.cleaned_records()?;

        let in_industry = cleaned
            .lazy()
            .filter(col("year").gt_eq(lit(self.config.min_year)))
            .filter(selector.expr("naics_code"))
            .filter(col("ein").neq(lit("")))
            .collect()?;

        let flagged = flag_foreign(in_industry, predicate)?;
        let wanted = i32::from(foreign_only);
        let selected = flagged
            .lazy()
            .filter(col(FOREIGN_COLUMN).eq(lit(wanted)))
            .collect()?;

        log::debug!(
            "Selected {} {} records in industry {}",
            selected.height(),
            if foreign_only { "foreign" } else { "domestic" },
            selector
        );
        Ok(selected)
    }

    /// Aggregate selected records to (year, quarter, area) rows.
    pub fn aggregate(&self, selected: DataFrame, mapping: DataFrame) -> Result<DataFrame> {
        ensure_many_to_one(&mapping)?;

        // Step 1: Attach areas; unmapped zones drop out
        let joined = selected.lazy().join(
            mapping.lazy(),
            [col("zipcode")],
            [col("zipcode")],
            JoinArgs::new(JoinType::Inner),
        );

        // Step 2: Sum employment and wages per area-quarter
        let totals = joined
            .group_by([col("year"), col("qtr"), col("area_fips")])
            .agg([
                col("total_employment").sum().cast(DataType::Float64),
                col("total_wages").sum().cast(DataType::Float64),
            ]);

        // Step 3: Weekly wage, minimum wage and their ratio
        let panel = totals
            .with_column(
                (col("total_wages") / (col("total_employment") * lit(WEEKS_PER_QUARTER)))
                    .alias("avg_weekly_wage"),
            )
            .with_column(self.config.schedule.expr(col("year")).alias("min_wage"))
            .with_column((col("min_wage") / col("avg_weekly_wage")).alias("k_index"))
            .select(PANEL_COLUMNS.map(col))
            .sort(["year", "qtr", "area_fips"], Default::default())
            .collect()?;

        Ok(panel)
    }

    /// Build the panel for one industry and one side of the foreign split.
    pub fn build_panel<P: DomesticPredicate + ?Sized>(
        &self,
        selector: &IndustrySelector,
        foreign_only: bool,
        mapping: &ZoneAreaMapping,
        predicate: &P,
    ) -> Result<QuarterlyAreaPanel> {
        let selected = self.select_records(selector, foreign_only, predicate)?;
        let frame = self.aggregate(selected, mapping.to_frame()?)?;
        let panel = QuarterlyAreaPanel::from_frame(&frame)?;

        log::info!(
            "Built {} panel for industry {} with {} area-quarters",
            if foreign_only { "foreign" } else { "domestic" },
            selector,
            panel.len()
        );
        Ok(panel)
    }
}

/// Reject a mapping frame that lists a zone more than once.
pub fn ensure_many_to_one(mapping: &DataFrame) -> Result<()> {
    let mut seen = HashSet::new();
    for zone in mapping.column("zipcode")?.str()?.into_iter().flatten() {
        if !seen.insert(zone) {
            return Err(PanelError::Cardinality {
                zone: zone.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bite_data::InMemoryRawProvider;

    #[test]
    fn test_duplicate_zone_is_a_cardinality_error() {
        let mapping = df!(
            "zipcode" => ["00601", "00602", "00601"],
            "area_fips" => ["72001", "72003", "72003"],
        )
        .unwrap();

        let err = ensure_many_to_one(&mapping).unwrap_err();
        match err {
            PanelError::Cardinality { zone } => assert_eq!(zone, "00601"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_aggregate_metrics() {
        let selected = df!(
            "year" => [2015i32, 2015, 2025],
            "qtr" => [1i32, 1, 1],
            "zipcode" => ["00601", "00602", "00601"],
            "total_employment" => [10.0, 20.0, 5.0],
            "total_wages" => [50_000.0, 80_000.0, 6_500.0],
        )
        .unwrap();
        let mapping = df!(
            "zipcode" => ["00601", "00602"],
            "area_fips" => ["06037", "06037"],
        )
        .unwrap();

        let builder = PanelBuilder::new(InMemoryRawProvider::default());
        let frame = builder.aggregate(selected, mapping).unwrap();
        let panel = QuarterlyAreaPanel::from_frame(&frame).unwrap();

        assert_eq!(panel.len(), 2);
        let row = panel.get(2015, 1, "06037").unwrap();
        assert_relative_eq!(row.total_employment, 30.0);
        assert_relative_eq!(row.total_wages, 130_000.0);
        assert_relative_eq!(row.avg_weekly_wage, 130_000.0 / 390.0, epsilon = 1e-9);
        assert_relative_eq!(row.min_wage, 290.0);
        assert_relative_eq!(row.k_index, 290.0 * 390.0 / 130_000.0, epsilon = 1e-9);

        let future = panel.get(2025, 1, "06037").unwrap();
        assert_relative_eq!(future.min_wage, -1.0);
    }

    #[test]
    fn test_config_from_pipeline_config() {
        let config = BiteConfig {
            min_year: 2015,
            ..BiteConfig::default()
        };
        let panel_config = PanelConfig::from_config(&config);
        assert_eq!(panel_config.min_year, 2015);
        assert_eq!(panel_config.schedule, MinimumWageSchedule::default());
    }
}
