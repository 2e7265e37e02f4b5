//! Raw establishment-quarter records.
//!
//! The raw table is built once from the CSV extracts under
//! `<saving_dir>/raw/` and reused afterwards.

use crate::cache::SqliteCache;
use crate::error::{DataError, Result};
use polars::prelude::*;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Table holding the raw establishment-quarter rows.
pub const RAW_TABLE: &str = "qcewtable";

/// Column names of the raw frame, in order.
pub const RAW_COLUMNS: [&str; 11] = [
    "year",
    "qtr",
    "phys_addr_5_zip",
    "ui_addr_5_zip",
    "mail_addr_5_zip",
    "ein",
    "first_month_employment",
    "second_month_employment",
    "third_month_employment",
    "total_wages",
    "naics_code",
];

/// Supplier of raw establishment-quarter records.
pub trait RawDataProvider {
    /// Make sure the raw dataset exists, building it if absent.
    fn ensure_raw_dataset(&self) -> Result<()>;

    /// Raw rows with the columns in [`RAW_COLUMNS`].
    fn raw_records(&self) -> Result<DataFrame>;
}

/// One raw establishment report for one quarter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Reference year
    pub year: i32,
    /// Quarter, 1 to 4
    pub qtr: i32,
    /// Physical-address zone code
    pub phys_addr_5_zip: Option<String>,
    /// UI-address zone code
    pub ui_addr_5_zip: Option<String>,
    /// Mailing-address zone code
    pub mail_addr_5_zip: Option<String>,
    /// Employer identification number
    pub ein: Option<String>,
    /// Employment in the first month of the quarter
    pub first_month_employment: Option<i64>,
    /// Employment in the second month of the quarter
    pub second_month_employment: Option<i64>,
    /// Employment in the third month of the quarter
    pub third_month_employment: Option<i64>,
    /// Total quarterly wages
    pub total_wages: Option<f64>,
    /// Industry code
    pub naics_code: Option<String>,
}

/// Build the raw frame from typed rows.
pub fn records_to_frame(records: &[RawRecord]) -> Result<DataFrame> {
    let years: Vec<i32> = records.iter().map(|r| r.year).collect();
    let qtrs: Vec<i32> = records.iter().map(|r| r.qtr).collect();
    let phys: Vec<Option<String>> = records.iter().map(|r| r.phys_addr_5_zip.clone()).collect();
    let ui: Vec<Option<String>> = records.iter().map(|r| r.ui_addr_5_zip.clone()).collect();
    let mail: Vec<Option<String>> = records.iter().map(|r| r.mail_addr_5_zip.clone()).collect();
    let eins: Vec<Option<String>> = records.iter().map(|r| r.ein.clone()).collect();
    let m1: Vec<Option<i64>> = records.iter().map(|r| r.first_month_employment).collect();
    let m2: Vec<Option<i64>> = records.iter().map(|r| r.second_month_employment).collect();
    let m3: Vec<Option<i64>> = records.iter().map(|r| r.third_month_employment).collect();
    let wages: Vec<Option<f64>> = records.iter().map(|r| r.total_wages).collect();
    let naics: Vec<Option<String>> = records.iter().map(|r| r.naics_code.clone()).collect();

    let df = DataFrame::new(vec![
        Series::new("year".into(), years).into(),
        Series::new("qtr".into(), qtrs).into(),
        Series::new("phys_addr_5_zip".into(), phys).into(),
        Series::new("ui_addr_5_zip".into(), ui).into(),
        Series::new("mail_addr_5_zip".into(), mail).into(),
        Series::new("ein".into(), eins).into(),
        Series::new("first_month_employment".into(), m1).into(),
        Series::new("second_month_employment".into(), m2).into(),
        Series::new("third_month_employment".into(), m3).into(),
        Series::new("total_wages".into(), wages).into(),
        Series::new("naics_code".into(), naics).into(),
    ])?;

    Ok(df)
}

/// Raw records held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRawProvider {
    records: Vec<RawRecord>,
}

impl InMemoryRawProvider {
    /// Wrap a set of raw records.
    pub const fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }
}

impl RawDataProvider for InMemoryRawProvider {
    fn ensure_raw_dataset(&self) -> Result<()> {
        Ok(())
    }

    fn raw_records(&self) -> Result<DataFrame> {
        records_to_frame(&self.records)
    }
}

/// Raw dataset stored in the pipeline database.
#[derive(Debug, Clone)]
pub struct SqliteRawStore {
    store: Rc<SqliteCache>,
    source_dir: PathBuf,
}

impl SqliteRawStore {
    /// Create a raw store importing from `source_dir` when the table is absent.
    pub fn new<P: Into<PathBuf>>(store: Rc<SqliteCache>, source_dir: P) -> Self {
        Self {
            store,
            source_dir: source_dir.into(),
        }
    }

    /// CSV files to import, sorted by name.
    fn source_files(&self) -> Result<Vec<PathBuf>> {
        if !self.source_dir.is_dir() {
            return Err(DataError::MissingData {
                what: "raw establishment dataset".to_string(),
                reason: format!("{} does not exist", self.source_dir.display()),
            });
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.source_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(DataError::MissingData {
                what: "raw establishment dataset".to_string(),
                reason: format!("no CSV files in {}", self.source_dir.display()),
            });
        }
        Ok(files)
    }

    /// Create and populate the raw table from the source CSV files.
    pub fn build(&self) -> Result<usize> {
        let files = self.source_files()?;
        let tx = self.store.conn().unchecked_transaction()?;
        tx.execute(
            "CREATE TABLE IF NOT EXISTS qcewtable (
                year INTEGER NOT NULL,
                qtr INTEGER NOT NULL,
                phys_addr_5_zip TEXT,
                ui_addr_5_zip TEXT,
                mail_addr_5_zip TEXT,
                ein TEXT,
                first_month_employment INTEGER,
                second_month_employment INTEGER,
                third_month_employment INTEGER,
                total_wages REAL,
                naics_code TEXT
            )",
            [],
        )?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO qcewtable VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for file in &files {
                log::info!("Importing raw records from {}", file.display());
                for record in read_csv(file)? {
                    stmt.execute(params![
                        record.year,
                        record.qtr,
                        record.phys_addr_5_zip,
                        record.ui_addr_5_zip,
                        record.mail_addr_5_zip,
                        record.ein,
                        record.first_month_employment,
                        record.second_month_employment,
                        record.third_month_employment,
                        record.total_wages,
                        record.naics_code,
                    ])?;
                    inserted += 1;
                }
            }
        }

        SqliteCache::record_build(&tx, RAW_TABLE, inserted)?;
        tx.commit()?;

        log::info!("Built {} with {} rows", RAW_TABLE, inserted);
        Ok(inserted)
    }

    /// Read every raw row.
    pub fn read(&self) -> Result<Vec<RawRecord>> {
        let mut stmt = self.store.conn().prepare(
            "SELECT year, qtr, phys_addr_5_zip, ui_addr_5_zip, mail_addr_5_zip, ein,
                    first_month_employment, second_month_employment, third_month_employment,
                    total_wages, naics_code
             FROM qcewtable
             ORDER BY rowid",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RawRecord {
                year: row.get(0)?,
                qtr: row.get(1)?,
                phys_addr_5_zip: row.get(2)?,
                ui_addr_5_zip: row.get(3)?,
                mail_addr_5_zip: row.get(4)?,
                ein: row.get(5)?,
                first_month_employment: row.get(6)?,
                second_month_employment: row.get(7)?,
                third_month_employment: row.get(8)?,
                total_wages: row.get(9)?,
                naics_code: row.get(10)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

impl RawDataProvider for SqliteRawStore {
    fn ensure_raw_dataset(&self) -> Result<()> {
        if self.store.table_exists(RAW_TABLE)? {
            return Ok(());
        }
        log::info!("{} is missing, building it", RAW_TABLE);
        self.build()?;
        Ok(())
    }

    fn raw_records(&self) -> Result<DataFrame> {
        self.ensure_raw_dataset()?;
        let records = self.read()?;
        log::debug!("Loaded {} raw records", records.len());
        records_to_frame(&records)
    }
}

/// Deserialize one raw CSV file. Empty cells become `None`.
pub fn read_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}
