use chrono::NaiveDate;

/// One trading day of OHLCV data for a single ticker
///
/// Uniquely identified by `(ticker, date)` once the loader has resolved
/// duplicates. Prices are taken as supplied; the loader does not check
/// relationships such as `high >= low`.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    /// Trading day
    pub date: NaiveDate,

    /// Ticker symbol
    pub ticker: String,

    /// Opening price
    pub open: f64,

    /// Highest price
    pub high: f64,

    /// Lowest price
    pub low: f64,

    /// Closing price
    pub close: f64,

    /// Close adjusted for corporate actions, as supplied by the source
    pub adjclose: f64,

    /// Trading volume; fractional values are kept as supplied
    pub volume: f64,
}

impl DailyRecord {
    /// Create a new daily record
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        ticker: String,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adjclose: f64,
        volume: f64,
    ) -> Self {
        Self {
            date,
            ticker,
            open,
            high,
            low,
            close,
            adjclose,
            volume,
        }
    }
}
