//! Daily price data handling
//!
//! [`PriceSeries`] holds OHLCV records keyed by timestamp and exposes any
//! column as a [`NumericSeries`] for the models. [`DataLoader`] reads the
//! common `Date,Open,High,Low,Close,Adj Close,Volume` CSV layout.

use crate::error::{ForecastError, Result};
use crate::series::NumericSeries;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use trade_math::returns::{calculate_returns, ReturnMetrics};

/// Represents OHLCV (Open, High, Low, Close, Volume) data for a specific time period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvRecord {
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Close adjusted for splits and dividends
    pub adj_close: f64,
    /// Volume
    pub volume: f64,
}

impl OhlcvRecord {
    /// Value of a single column
    pub fn field(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::AdjClose => self.adj_close,
            PriceField::Volume => self.volume,
        }
    }
}

/// Column of a price record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

/// Price records of one ticker, ordered by timestamp
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    records: BTreeMap<DateTime<Utc>, OhlcvRecord>,
}

impl PriceSeries {
    /// Create an empty series for a ticker
    pub fn new(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            records: BTreeMap::new(),
        }
    }

    /// Create a series from records in any order; a repeated timestamp keeps the last record
    pub fn from_records<I>(ticker: &str, records: I) -> Self
    where
        I: IntoIterator<Item = (DateTime<Utc>, OhlcvRecord)>,
    {
        Self {
            ticker: ticker.to_string(),
            records: records.into_iter().collect(),
        }
    }

    /// Insert or replace the record at a timestamp
    pub fn insert(&mut self, timestamp: DateTime<Utc>, record: OhlcvRecord) {
        self.records.insert(timestamp, record);
    }

    /// Ticker symbol
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in time order
    pub fn iter(&self) -> impl Iterator<Item = (&DateTime<Utc>, &OhlcvRecord)> {
        self.records.iter()
    }

    /// Timestamps in time order
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.records.keys().copied().collect()
    }

    /// One column as a vector
    pub fn column(&self, field: PriceField) -> Vec<f64> {
        self.records.values().map(|r| r.field(field)).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.column(PriceField::Open)
    }

    pub fn highs(&self) -> Vec<f64> {
        self.column(PriceField::High)
    }

    pub fn lows(&self) -> Vec<f64> {
        self.column(PriceField::Low)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.column(PriceField::Close)
    }

    pub fn adj_closes(&self) -> Vec<f64> {
        self.column(PriceField::AdjClose)
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.column(PriceField::Volume)
    }

    /// One column as a numeric series for model training
    pub fn series(&self, field: PriceField) -> Result<NumericSeries> {
        NumericSeries::new(
            self.records
                .iter()
                .map(|(ts, r)| (*ts, r.field(field)))
                .collect(),
        )
    }

    /// Standard deviation of the close prices
    pub fn std_dev(&self) -> Result<f64> {
        Ok(trade_math::statistics::std_dev(&self.closes())?)
    }

    /// Daily, cumulative, annualized and log returns of the close prices
    pub fn returns(&self) -> Result<Vec<(DateTime<Utc>, ReturnMetrics)>> {
        let returns = calculate_returns(&self.closes())?;
        Ok(self.records.keys().copied().zip(returns).collect())
    }

    /// Records with `start <= timestamp < end`
    pub fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> PriceSeries {
        Self {
            ticker: self.ticker.clone(),
            records: self
                .records
                .range(start..end)
                .map(|(ts, r)| (*ts, *r))
                .collect(),
        }
    }
}

/// Data loader for price data
#[derive(Debug)]
pub struct DataLoader;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date", alias = "date")]
    date: String,
    #[serde(rename = "Open", alias = "open")]
    open: f64,
    #[serde(rename = "High", alias = "high")]
    high: f64,
    #[serde(rename = "Low", alias = "low")]
    low: f64,
    #[serde(rename = "Close", alias = "close")]
    close: f64,
    #[serde(rename = "Adj Close", alias = "adj_close", default)]
    adj_close: Option<f64>,
    #[serde(rename = "Volume", alias = "volume", default)]
    volume: Option<f64>,
}

impl DataLoader {
    /// Load price data from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<PriceSeries> {
        let path = path.as_ref();
        let ticker = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let file = File::open(path)?;
        Self::from_reader(&ticker, file)
    }

    /// Load price data from any CSV reader
    pub fn from_reader<R: Read>(ticker: &str, reader: R) -> Result<PriceSeries> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut series = PriceSeries::new(ticker);
        for row in csv_reader.deserialize() {
            let row: CsvRow = row?;
            let timestamp = parse_date(&row.date)?;
            series.insert(
                timestamp,
                OhlcvRecord {
                    open: row.open,
                    high: row.high,
                    low: row.low,
                    close: row.close,
                    adj_close: row.adj_close.unwrap_or(row.close),
                    volume: row.volume.unwrap_or(0.0),
                },
            );
        }

        if series.is_empty() {
            return Err(ForecastError::DataError(format!(
                "No price rows found for {}",
                ticker
            )));
        }

        tracing::debug!(ticker, rows = series.len(), "loaded price data");
        Ok(series)
    }
}

/// Parse a `YYYY-MM-DD` date as midnight UTC
pub fn parse_date(date: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| ForecastError::DataError(format!("Invalid date '{}': {}", date, e)))?
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ForecastError::DataError(format!("Invalid date '{}'", date)))?;
    Ok(Utc.from_utc_datetime(&naive))
}
