//! Statutory minimum wage by year.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Weekly minimum wage reported for years outside the schedule.
pub const UNKNOWN_MIN_WAGE: f64 = -1.0;

/// Weekly hours used to turn hourly rates into weekly amounts.
pub const HOURS_PER_WEEK: f64 = 40.0;

/// An hourly rate in force for an inclusive range of years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinWageBracket {
    /// First year the rate applies
    pub first_year: i32,
    /// Last year the rate applies
    pub last_year: i32,
    /// Hourly rate
    pub hourly: f64,
}

impl MinWageBracket {
    /// Create a bracket.
    pub const fn new(first_year: i32, last_year: i32, hourly: f64) -> Self {
        Self {
            first_year,
            last_year,
            hourly,
        }
    }

    /// Whether `year` falls in the bracket.
    pub const fn contains(&self, year: i32) -> bool {
        year >= self.first_year && year <= self.last_year
    }
}

/// Piecewise minimum wage schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimumWageSchedule {
    brackets: Vec<MinWageBracket>,
    hours_per_week: f64,
}

impl Default for MinimumWageSchedule {
    fn default() -> Self {
        Self::new(
            vec![
                MinWageBracket::new(2002, 2009, 5.15),
                MinWageBracket::new(2010, 2022, 7.25),
                MinWageBracket::new(2023, 2023, 8.50),
                MinWageBracket::new(2024, 2024, 10.50),
            ],
            HOURS_PER_WEEK,
        )
    }
}

impl MinimumWageSchedule {
    /// Create a schedule. Earlier brackets take precedence on overlap.
    pub const fn new(brackets: Vec<MinWageBracket>, hours_per_week: f64) -> Self {
        Self {
            brackets,
            hours_per_week,
        }
    }

    /// The brackets, in precedence order.
    pub fn brackets(&self) -> &[MinWageBracket] {
        &self.brackets
    }

    /// Weekly minimum wage for `year`, or [`UNKNOWN_MIN_WAGE`].
    pub fn weekly(&self, year: i32) -> f64 {
        self.brackets
            .iter()
            .find(|b| b.contains(year))
            .map_or(UNKNOWN_MIN_WAGE, |b| b.hourly * self.hours_per_week)
    }

    /// Polars expression evaluating [`Self::weekly`] on a year column.
    pub fn expr(&self, year: Expr) -> Expr {
        self.brackets
            .iter()
            .rev()
            .fold(lit(UNKNOWN_MIN_WAGE), |otherwise, b| {
                when(
                    year.clone()
                        .gt_eq(lit(b.first_year))
                        .and(year.clone().lt_eq(lit(b.last_year))),
                )
                .then(lit(b.hourly * self.hours_per_week))
                .otherwise(otherwise)
            })
    }
}
