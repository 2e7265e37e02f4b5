//! Panel summaries for terminal and Markdown display.

use bite_panel::QuarterlyAreaPanel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Aggregates over the rows of one year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearSummary {
    /// Reference year.
    pub year: i32,

    /// Number of area-quarter rows.
    pub rows: usize,

    /// Distinct areas observed during the year.
    pub areas: usize,

    /// Employment summed over areas, averaged over quarters.
    pub mean_quarterly_employment: f64,

    /// Weekly minimum wage, or -1 when unknown.
    pub min_wage: f64,

    /// Mean k-index over the year's rows, if the minimum wage is known.
    pub mean_k_index: Option<f64>,
}

/// Overview of a quarterly area panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelSummary {
    /// Label of the panel, usually the industry selector.
    pub name: String,

    /// Number of area-quarter rows.
    pub rows: usize,

    /// Distinct areas.
    pub areas: usize,

    /// Distinct (year, quarter) periods.
    pub quarters: usize,

    /// First and last period covered.
    pub period: Option<((i32, i32), (i32, i32))>,

    /// Employment summed over all rows.
    pub total_employment: f64,

    /// Mean k-index over rows with a known minimum wage.
    pub mean_k_index: Option<f64>,

    /// Rows whose year has no minimum wage.
    pub undefined_min_wage_rows: usize,

    /// Per-year breakdown.
    pub years: Vec<YearSummary>,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

impl PanelSummary {
    /// Summarise a panel.
    ///
    /// # Examples
    ///
    /// ```
    /// use bite_output::PanelSummary;
    /// use bite_panel::QuarterlyAreaPanel;
    ///
    /// let summary = PanelSummary::new("72-food", &QuarterlyAreaPanel::default());
    /// assert_eq!(summary.rows, 0);
    /// assert_eq!(summary.mean_k_index, None);
    /// ```
    pub fn new(name: impl Into<String>, panel: &QuarterlyAreaPanel) -> Self {
        let rows = panel.rows();
        let areas: BTreeSet<&str> = rows.iter().map(|r| r.area_fips.as_str()).collect();
        let quarters: BTreeSet<(i32, i32)> = rows.iter().map(|r| (r.year, r.qtr)).collect();
        let defined: Vec<f64> = rows
            .iter()
            .filter(|r| r.has_defined_min_wage())
            .map(|r| r.k_index)
            .collect();

        let mut by_year: BTreeMap<i32, Vec<_>> = BTreeMap::new();
        for row in rows {
            by_year.entry(row.year).or_default().push(row);
        }
        let years = by_year
            .into_iter()
            .map(|(year, rows)| {
                let quarters: BTreeSet<i32> = rows.iter().map(|r| r.qtr).collect();
                let areas: BTreeSet<&str> = rows.iter().map(|r| r.area_fips.as_str()).collect();
                let employment: f64 = rows.iter().map(|r| r.total_employment).sum();
                let k: Vec<f64> = rows
                    .iter()
                    .filter(|r| r.has_defined_min_wage())
                    .map(|r| r.k_index)
                    .collect();
                YearSummary {
                    year,
                    rows: rows.len(),
                    areas: areas.len(),
                    mean_quarterly_employment: employment / quarters.len() as f64,
                    min_wage: rows[0].min_wage,
                    mean_k_index: mean(&k),
                }
            })
            .collect();

        Self {
            name: name.into(),
            rows: rows.len(),
            areas: areas.len(),
            quarters: quarters.len(),
            period: quarters.first().copied().zip(quarters.last().copied()),
            total_employment: rows.iter().map(|r| r.total_employment).sum(),
            mean_k_index: mean(&defined),
            undefined_min_wage_rows: rows.len() - defined.len(),
            years,
        }
    }

    fn period_label(&self) -> String {
        match self.period {
            Some(((y0, q0), (y1, q1))) => format!("{y0}Q{q0} to {y1}Q{q1}"),
            None => "empty".to_string(),
        }
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nPanel Summary: {}\n", self.name));
        output.push_str(&format!("Period: {}\n", self.period_label()));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        output.push_str(&format!("  Area-quarters:            {}\n", self.rows));
        output.push_str(&format!("  Areas:                    {}\n", self.areas));
        output.push_str(&format!("  Quarters:                 {}\n", self.quarters));
        output.push_str(&format!(
            "  Total employment:         {:.1}\n",
            self.total_employment
        ));
        match self.mean_k_index {
            Some(k) => output.push_str(&format!("  Mean k-index:             {k:.4}\n")),
            None => output.push_str("  Mean k-index:             n/a\n"),
        }
        if self.undefined_min_wage_rows > 0 {
            output.push_str(&format!(
                "  Rows without min wage:    {}\n",
                self.undefined_min_wage_rows
            ));
        }

        if !self.years.is_empty() {
            output.push_str("\nBy Year:\n");
            output.push_str(&"-".repeat(72));
            output.push('\n');
            output.push_str(&format!(
                "{:<6} {:>8} {:>8} {:>16} {:>12} {:>12}\n",
                "Year", "Rows", "Areas", "Employment", "Min Wage", "k-index"
            ));
            output.push_str(&"-".repeat(72));
            output.push('\n');

            for year in &self.years {
                let k = year
                    .mean_k_index
                    .map_or_else(|| "n/a".to_string(), |k| format!("{k:.4}"));
                output.push_str(&format!(
                    "{:<6} {:>8} {:>8} {:>16.1} {:>12.2} {:>12}\n",
                    year.year,
                    year.rows,
                    year.areas,
                    year.mean_quarterly_employment,
                    year.min_wage,
                    k
                ));
            }
        }

        output.push_str(&"=".repeat(72));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Panel Summary: {}\n\n", self.name));
        output.push_str(&format!("**Period:** {}\n\n", self.period_label()));
        output.push_str(&format!("- **Area-quarters:** {}\n", self.rows));
        output.push_str(&format!("- **Areas:** {}\n", self.areas));
        output.push_str(&format!("- **Total employment:** {:.1}\n", self.total_employment));
        if let Some(k) = self.mean_k_index {
            output.push_str(&format!("- **Mean k-index:** {k:.4}\n"));
        }
        output.push('\n');

        if !self.years.is_empty() {
            output.push_str("| Year | Rows | Areas | Employment | Min Wage | k-index |\n");
            output.push_str("|------|------|-------|------------|----------|---------|\n");
            for year in &self.years {
                let k = year
                    .mean_k_index
                    .map_or_else(|| "n/a".to_string(), |k| format!("{k:.4}"));
                output.push_str(&format!(
                    "| {} | {} | {} | {:.1} | {:.2} | {} |\n",
                    year.year,
                    year.rows,
                    year.areas,
                    year.mean_quarterly_employment,
                    year.min_wage,
                    k
                ));
            }
        }

        output
    }
}

impl fmt::Display for PanelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Panel Summary: {} ({})", self.name, self.period_label())?;
        writeln!(f, "  Area-quarters: {}", self.rows)?;
        writeln!(f, "  Areas: {}", self.areas)?;
        writeln!(f, "  Total employment: {:.1}", self.total_employment)?;
        match self.mean_k_index {
            Some(k) => writeln!(f, "  Mean k-index: {k:.4}")?,
            None => writeln!(f, "  Mean k-index: n/a")?,
        }
        Ok(())
    }
}
