//! Daily CSV Loader
//!
//! Reads the flat daily OHLCV table, validates its header, resolves duplicate
//! (ticker, date) rows and splits the result into per-ticker series sorted
//! oldest first.

use crate::constants::REQUIRED_INPUT_COLUMNS;
use crate::error::{AppError, Result};
use crate::models::{DailyData, DailyRecord, DuplicatePolicy, ExpectedTickers, MissingTickerPolicy};
use crate::utils::deduplication::DailyDeduplicator;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Output of the loader
#[derive(Debug, Default)]
pub struct LoadedData {
    /// Per-ticker daily series, ascending by date with unique dates
    pub by_ticker: DailyData,

    /// Data rows read from the input (before deduplication)
    pub rows_read: usize,

    /// Rows dropped because their (ticker, date) pair repeated
    pub duplicates_removed: usize,
}

impl LoadedData {
    /// Distinct tickers discovered, in sorted order
    pub fn tickers(&self) -> Vec<String> {
        self.by_ticker.keys().cloned().collect()
    }

    /// Daily records kept after deduplication
    pub fn record_count(&self) -> usize {
        self.by_ticker.values().map(Vec::len).sum()
    }
}

/// Result of comparing discovered tickers with the expected set
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TickerCheck {
    /// Expected but absent from the input
    pub missing: Vec<String>,

    /// Present in the input but not expected
    pub unexpected: Vec<String>,
}

impl TickerCheck {
    pub fn is_match(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

/// Column positions of the required fields in the input header
struct ColumnIndex {
    date: usize,
    ticker: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    adjclose: usize,
    volume: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = REQUIRED_INPUT_COLUMNS
            .iter()
            .filter(|name| position(**name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::SchemaMismatch { missing });
        }

        // All present, checked above
        let index = |name: &str| position(name).unwrap_or_default();
        Ok(Self {
            date: index("date"),
            ticker: index("ticker"),
            open: index("open"),
            high: index("high"),
            low: index("low"),
            close: index("close"),
            adjclose: index("adjclose"),
            volume: index("volume"),
        })
    }
}

/// Load the daily table from a CSV file
pub fn load_daily_csv(path: &Path, policy: DuplicatePolicy) -> Result<LoadedData> {
    if !path.exists() {
        return Err(AppError::InputUnreadable(format!(
            "Input file not found: {}",
            path.display()
        )));
    }

    let file = std::fs::File::open(path).map_err(|e| {
        AppError::InputUnreadable(format!("Failed to open {}: {}", path.display(), e))
    })?;

    info!(path = %path.display(), "Loading daily records");
    load_daily_reader(file, policy).map_err(|e| match e {
        AppError::InputUnreadable(msg) => {
            AppError::InputUnreadable(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Load the daily table from any CSV source
pub fn load_daily_reader<R: Read>(source: R, policy: DuplicatePolicy) -> Result<LoadedData> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(source);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        records.push(parse_record(&record, &columns)?);
    }

    let rows_read = records.len();
    let (records, duplicates_removed) = DailyDeduplicator::dedup_owned(records, policy);
    if duplicates_removed > 0 {
        warn!(
            duplicates = duplicates_removed,
            keep_last = policy.keep_last(),
            "Resolved duplicate (ticker, date) rows"
        );
    }

    let by_ticker = group_by_ticker(records);

    info!(
        rows = rows_read,
        tickers = by_ticker.len(),
        "Loaded daily records"
    );

    Ok(LoadedData {
        by_ticker,
        rows_read,
        duplicates_removed,
    })
}

/// Split records into per-ticker series sorted ascending by date
///
/// Input must already be free of duplicate (ticker, date) pairs.
pub fn group_by_ticker(records: Vec<DailyRecord>) -> DailyData {
    let mut data = DailyData::new();

    for record in records {
        data.entry(record.ticker.clone()).or_default().push(record);
    }

    for series in data.values_mut() {
        // Stable sort; dates are unique after deduplication
        series.sort_by_key(|r| r.date);
    }

    data
}

/// Compare discovered tickers against the expected set
///
/// With [`MissingTickerPolicy::Fail`] a missing expected ticker is an error;
/// otherwise it is logged and processing continues with what was found.
/// Unexpected extra tickers are reported but never fatal.
pub fn check_expected_tickers<'a, I>(
    discovered: I,
    expected: &ExpectedTickers,
    policy: MissingTickerPolicy,
) -> Result<TickerCheck>
where
    I: IntoIterator<Item = &'a String>,
{
    let discovered: BTreeSet<&str> = discovered.into_iter().map(String::as_str).collect();

    if expected.is_empty() {
        debug!(tickers = discovered.len(), "No expected ticker set, skipping check");
        return Ok(TickerCheck::default());
    }

    let missing: Vec<String> = expected
        .iter()
        .filter(|t| !discovered.contains(t.as_str()))
        .cloned()
        .collect();
    let unexpected: Vec<String> = discovered
        .iter()
        .filter(|t| !expected.contains(t))
        .map(|t| t.to_string())
        .collect();

    if !unexpected.is_empty() {
        warn!(unexpected = ?unexpected, "Input contains tickers outside the expected set");
    }

    if !missing.is_empty() {
        match policy {
            MissingTickerPolicy::Fail => return Err(AppError::TickerMismatch { missing }),
            MissingTickerPolicy::Warn => {
                warn!(missing = ?missing, "Expected tickers not found in input");
            }
        }
    }

    Ok(TickerCheck { missing, unexpected })
}

fn parse_record(record: &StringRecord, columns: &ColumnIndex) -> Result<DailyRecord> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);

    let date_str = get_field(record, columns.date, "date", line)?;
    let date = parse_date(date_str).ok_or_else(|| {
        AppError::InputUnreadable(format!("line {}: invalid date '{}'", line, date_str))
    })?;

    let ticker = get_field(record, columns.ticker, "ticker", line)?;
    if ticker.is_empty() {
        return Err(AppError::InputUnreadable(format!("line {}: empty ticker", line)));
    }

    let volume_str = get_field(record, columns.volume, "volume", line)?;
    let volume = parse_volume(volume_str).ok_or_else(|| {
        AppError::InputUnreadable(format!("line {}: invalid volume '{}'", line, volume_str))
    })?;

    Ok(DailyRecord::new(
        date,
        ticker.to_string(),
        parse_price(record, columns.open, "open", line)?,
        parse_price(record, columns.high, "high", line)?,
        parse_price(record, columns.low, "low", line)?,
        parse_price(record, columns.close, "close", line)?,
        parse_price(record, columns.adjclose, "adjclose", line)?,
        volume,
    ))
}

fn get_field<'a>(record: &'a StringRecord, idx: usize, name: &str, line: u64) -> Result<&'a str> {
    record
        .get(idx)
        .ok_or_else(|| AppError::InputUnreadable(format!("line {}: missing {}", line, name)))
}

fn parse_price(record: &StringRecord, idx: usize, name: &str, line: u64) -> Result<f64> {
    let raw = get_field(record, idx, name, line)?;
    raw.parse::<f64>().map_err(|e| {
        AppError::InputUnreadable(format!("line {}: invalid {} '{}': {}", line, name, raw, e))
    })
}

/// Parse a calendar date, discarding any time-of-day component
///
/// Handles "YYYY-MM-DD" and "YYYY/MM/DD", naive timestamps with a `T` or space
/// separator (optional fractional seconds), and timestamps carrying a UTC
/// offset such as RFC 3339. Offset timestamps keep their local calendar date.
fn parse_date(s: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }

    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .map(|dt| dt.date_naive())
        .ok()
}

/// Parse a non-negative volume; "1200", "1200.0" and "1200.5" are all accepted
fn parse_volume(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 {
        Some(v)
    } else {
        None
    }
}
