//! Industry selection by NAICS code prefix.

use derive_more::Display;
use polars::prelude::*;
use std::convert::Infallible;
use std::str::FromStr;

/// A named group of NAICS prefixes, or a literal prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum IndustrySelector {
    /// Manufacturing, sectors 31 to 33
    #[display("31-33")]
    Manufacturing,
    /// Retail trade, sectors 44 and 45
    #[display("44-45")]
    RetailTrade,
    /// Transportation and warehousing, sectors 48 and 49
    #[display("48-49")]
    Transportation,
    /// Accommodation, industry groups 7211 to 7213
    #[display("72-accommodation")]
    Accommodation,
    /// Food services and drinking places, industry groups 7223 to 7225
    #[display("72-food")]
    FoodServices,
    /// Any other code prefix
    #[display("{_0}")]
    Prefix(String),
}

impl IndustrySelector {
    /// NAICS prefixes making up the selection.
    pub fn prefixes(&self) -> Vec<&str> {
        match self {
            Self::Manufacturing => vec!["31", "32", "33"],
            Self::RetailTrade => vec!["44", "45"],
            Self::Transportation => vec!["48", "49"],
            Self::Accommodation => vec!["7211", "7212", "7213"],
            Self::FoodServices => vec!["7223", "7224", "7225"],
            Self::Prefix(prefix) => vec![prefix.as_str()],
        }
    }

    /// Whether an industry code belongs to the selection.
    pub fn matches(&self, naics_code: &str) -> bool {
        self.prefixes()
            .iter()
            .any(|prefix| naics_code.starts_with(prefix))
    }

    /// Boolean expression selecting rows of `column` in the selection.
    pub fn expr(&self, column: &str) -> Expr {
        let mut prefixes = self.prefixes().into_iter();
        let first = prefixes
            .next()
            .map_or(lit(false), |p| col(column).str().starts_with(lit(p)));
        prefixes.fold(first, |acc, p| acc.or(col(column).str().starts_with(lit(p))))
    }
}

impl From<&str> for IndustrySelector {
    fn from(s: &str) -> Self {
        match s {
            "31-33" => Self::Manufacturing,
            "44-45" => Self::RetailTrade,
            "48-49" => Self::Transportation,
            "72-accommodation" => Self::Accommodation,
            "72-food" => Self::FoodServices,
            other => Self::Prefix(other.to_string()),
        }
    }
}

impl FromStr for IndustrySelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}
