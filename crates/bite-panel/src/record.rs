//! Cleaned establishment-quarter records.

use crate::error::Result;
use crate::frame::{f64_values, i32_values, i64_values, required, str_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One establishment's report for one quarter, after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstablishmentQuarterRecord {
    /// Reference year
    pub year: i32,
    /// Quarter, 1 to 4
    pub qtr: i32,
    /// Physical-address zone code
    pub zipcode: String,
    /// UI-address zone code
    pub ui_addr_5_zip: Option<String>,
    /// Mailing-address zone code
    pub mail_addr_5_zip: Option<String>,
    /// Employer identification number
    pub ein: Option<String>,
    /// Employment in the first month
    pub first_month_employment: i64,
    /// Employment in the second month
    pub second_month_employment: i64,
    /// Employment in the third month
    pub third_month_employment: i64,
    /// Total quarterly wages
    pub total_wages: f64,
    /// Industry code
    pub naics_code: String,
    /// Mean of the three monthly employment counts
    pub total_employment: f64,
    /// First two characters of the industry code
    pub sector: String,
}

impl EstablishmentQuarterRecord {
    /// Read records from a cleaned frame.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>> {
        let years = required(i32_values(df, "year")?, "year")?;
        let qtrs = required(i32_values(df, "qtr")?, "qtr")?;
        let zips = required(str_values(df, "zipcode")?, "zipcode")?;
        let ui = str_values(df, "ui_addr_5_zip")?;
        let mail = str_values(df, "mail_addr_5_zip")?;
        let eins = str_values(df, "ein")?;
        let m1 = required(i64_values(df, "first_month_employment")?, "first_month_employment")?;
        let m2 = required(i64_values(df, "second_month_employment")?, "second_month_employment")?;
        let m3 = required(i64_values(df, "third_month_employment")?, "third_month_employment")?;
        let wages = required(f64_values(df, "total_wages")?, "total_wages")?;
        let naics = required(str_values(df, "naics_code")?, "naics_code")?;
        let employment = required(f64_values(df, "total_employment")?, "total_employment")?;
        let sectors = required(str_values(df, "sector")?, "sector")?;

        let records = (0..df.height())
            .map(|i| Self {
                year: years[i],
                qtr: qtrs[i],
                zipcode: zips[i].clone(),
                ui_addr_5_zip: ui[i].clone(),
                mail_addr_5_zip: mail[i].clone(),
                ein: eins[i].clone(),
                first_month_employment: m1[i],
                second_month_employment: m2[i],
                third_month_employment: m3[i],
                total_wages: wages[i],
                naics_code: naics[i].clone(),
                total_employment: employment[i],
                sector: sectors[i].clone(),
            })
            .collect();
        Ok(records)
    }
}
