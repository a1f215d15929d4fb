use chrono::NaiveDate;

/// Calendar-month OHLCV bar for one ticker with trailing indicators
///
/// Built by the aggregator from one monthly run of daily records. The
/// indicator fields start as `None` and are attached by the indicator engine,
/// which fills every row of a ticker's series.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRecord {
    /// Last trading day observed in the month (not the calendar month end)
    pub month_end: NaiveDate,

    /// Ticker symbol
    pub ticker: String,

    /// Open of the first trading day in the month
    pub open: f64,

    /// Highest high in the month
    pub high: f64,

    /// Lowest low in the month
    pub low: f64,

    /// Close of the last trading day in the month
    pub close: f64,

    /// Adjusted close of the last trading day in the month
    pub adjclose: f64,

    /// Sum of daily volumes
    pub volume: f64,

    // Moving Averages
    /// 10-month simple moving average (partial window for the first 9 months)
    pub sma_10: Option<f64>,

    /// 20-month simple moving average (partial window for the first 19 months)
    pub sma_20: Option<f64>,

    /// 10-month exponential moving average, seeded by the first close
    pub ema_10: Option<f64>,

    /// 20-month exponential moving average, seeded by the first close
    pub ema_20: Option<f64>,
}

impl MonthlyRecord {
    /// Create a monthly bar with only OHLCV; indicators are attached later
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        month_end: NaiveDate,
        ticker: String,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adjclose: f64,
        volume: f64,
    ) -> Self {
        Self {
            month_end,
            ticker,
            open,
            high,
            low,
            close,
            adjclose,
            volume,
            sma_10: None,
            sma_20: None,
            ema_10: None,
            ema_20: None,
        }
    }

    /// True once the indicator engine has populated all four indicators
    pub fn has_indicators(&self) -> bool {
        self.sma_10.is_some()
            && self.sma_20.is_some()
            && self.ema_10.is_some()
            && self.ema_20.is_some()
    }
}
