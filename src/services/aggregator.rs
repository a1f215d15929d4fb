use crate::models::{DailyRecord, MonthlyRecord};
use chrono::Datelike;
use tracing::debug;

/// Calendar-month bucket key
pub type MonthKey = (i32, u32);

/// Service for aggregating daily stock data into calendar months
pub struct Aggregator;

impl Aggregator {
    /// Aggregate one ticker's daily data (1D → 1M)
    ///
    /// # Arguments
    /// * `data` - Daily records for a single ticker, sorted ascending by date
    ///   with unique dates
    ///
    /// # Returns
    /// One monthly record per calendar month that has at least one daily
    /// record, sorted ascending. Months without trading days are absent.
    pub fn aggregate_monthly(data: &[DailyRecord]) -> Vec<MonthlyRecord> {
        if data.is_empty() {
            return vec![];
        }

        debug!(
            ticker = %data[0].ticker,
            records = data.len(),
            "Aggregating daily records into months"
        );

        let mut result = Vec::new();
        let mut run_start = 0;

        for i in 1..=data.len() {
            let boundary = i == data.len()
                || Self::bucket_month(&data[i]) != Self::bucket_month(&data[run_start]);
            if boundary {
                result.push(Self::aggregate_ohlcv(&data[run_start..i]));
                run_start = i;
            }
        }

        debug!(months = result.len(), "Aggregated into monthly records");
        result
    }

    /// Calendar month of a record: (year, month)
    pub fn bucket_month(record: &DailyRecord) -> MonthKey {
        (record.date.year(), record.date.month())
    }

    /// Aggregate OHLCV data for one monthly run
    ///
    /// # Arguments
    /// * `records` - Non-empty, chronologically ordered records of one month
    ///
    /// # Returns
    /// Aggregated monthly record with:
    /// - open = first record's open
    /// - high = maximum high
    /// - low = minimum low
    /// - close, adjclose = last record's values
    /// - volume = sum of volumes
    /// - month_end = last record's date
    fn aggregate_ohlcv(records: &[DailyRecord]) -> MonthlyRecord {
        let first = &records[0];
        let last = &records[records.len() - 1];

        let high = records.iter().map(|r| r.high).fold(f64::NEG_INFINITY, f64::max);
        let low = records.iter().map(|r| r.low).fold(f64::INFINITY, f64::min);
        let volume: f64 = records.iter().map(|r| r.volume).sum();

        MonthlyRecord::new(
            last.date,
            first.ticker.clone(),
            first.open,
            high,
            low,
            last.close,
            last.adjclose,
            volume,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_data(ticker: &str, dates: Vec<NaiveDate>, closes: Vec<f64>) -> Vec<DailyRecord> {
        dates
            .into_iter()
            .zip(closes.iter())
            .enumerate()
            .map(|(i, (date, &close))| DailyRecord {
                date,
                ticker: ticker.to_string(),
                open: close - 1.0,
                high: close + 1.0,
                low: close - 2.0,
                close,
                adjclose: close - 0.5,
                volume: (i + 1) as f64 * 1000.0,
            })
            .collect()
    }

    #[test]
    fn test_bucket_month() {
        let data = create_test_data("AAPL", vec![ymd(2022, 11, 15)], vec![10.0]);
        assert_eq!(Aggregator::bucket_month(&data[0]), (2022, 11));
    }

    #[test]
    fn test_aggregate_single_month_ohlcv() {
        let dates = vec![ymd(2022, 1, 3), ymd(2022, 1, 4), ymd(2022, 1, 5), ymd(2022, 1, 28)];
        let closes = vec![100.0, 110.0, 90.0, 105.0];
        let data = create_test_data("AAPL", dates, closes);

        let monthly = Aggregator::aggregate_monthly(&data);

        assert_eq!(monthly.len(), 1);
        let month = &monthly[0];
        assert_eq!(month.open, 99.0); // First record's open
        assert_eq!(month.close, 105.0); // Last record's close
        assert_eq!(month.adjclose, 104.5); // Last record's adjclose
        assert_eq!(month.high, 111.0); // Max high
        assert_eq!(month.low, 88.0); // Min low
        assert_eq!(month.volume, 10000.0); // 1000+2000+3000+4000
        assert_eq!(month.month_end, ymd(2022, 1, 28)); // Last trading day, not Jan 31
        assert!(!month.has_indicators());
    }

    #[test]
    fn test_month_boundary_uses_calendar_month() {
        // Jan 31 and Feb 1 are adjacent days but different months
        let dates = vec![ymd(2022, 1, 30), ymd(2022, 1, 31), ymd(2022, 2, 1), ymd(2022, 2, 28)];
        let data = create_test_data("AAPL", dates, vec![1.0, 2.0, 3.0, 4.0]);

        let monthly = Aggregator::aggregate_monthly(&data);

        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].month_end, ymd(2022, 1, 31));
        assert_eq!(monthly[0].close, 2.0);
        assert_eq!(monthly[1].month_end, ymd(2022, 2, 28));
        assert_eq!(monthly[1].open, 2.0);
    }

    #[test]
    fn test_missing_months_are_not_synthesized() {
        let dates = vec![ymd(2022, 1, 10), ymd(2022, 4, 12), ymd(2022, 4, 13)];
        let data = create_test_data("AAPL", dates, vec![1.0, 2.0, 3.0]);

        let monthly = Aggregator::aggregate_monthly(&data);

        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].month_end, ymd(2022, 1, 10));
        assert_eq!(monthly[1].month_end, ymd(2022, 4, 13));
    }

    #[test]
    fn test_same_month_different_years_are_separate() {
        let dates = vec![ymd(2021, 3, 1), ymd(2022, 3, 1)];
        let data = create_test_data("AAPL", dates, vec![1.0, 2.0]);

        let monthly = Aggregator::aggregate_monthly(&data);
        assert_eq!(monthly.len(), 2);
    }

    #[test]
    fn test_month_ends_strictly_increasing() {
        let mut dates = Vec::new();
        let mut date = ymd(2021, 12, 20);
        while date < ymd(2023, 2, 10) {
            dates.push(date);
            date = date.succ_opt().unwrap();
        }
        let closes = (0..dates.len()).map(|i| i as f64).collect();
        let data = create_test_data("AAPL", dates, closes);

        let monthly = Aggregator::aggregate_monthly(&data);

        assert_eq!(monthly.len(), 15); // Dec 2021 .. Feb 2023
        assert!(monthly.windows(2).all(|w| w[0].month_end < w[1].month_end));
        let total_volume: f64 = data.iter().map(|r| r.volume).sum();
        assert_eq!(monthly.iter().map(|m| m.volume).sum::<f64>(), total_volume);
    }

    #[test]
    fn test_volume_sum_beyond_integer_range() {
        let dates = vec![ymd(2022, 1, 3), ymd(2022, 1, 4)];
        let mut data = create_test_data("AAPL", dates, vec![1.0, 2.0]);
        data[0].volume = u64::MAX as f64;
        data[1].volume = 0.5;

        let monthly = Aggregator::aggregate_monthly(&data);

        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].volume, u64::MAX as f64 + 0.5);
        assert!(monthly[0].volume.is_finite());
    }

    #[test]
    fn test_fractional_volumes_are_summed() {
        let dates = vec![ymd(2022, 1, 3), ymd(2022, 1, 4)];
        let mut data = create_test_data("AAPL", dates, vec![1.0, 2.0]);
        data[0].volume = 1200.5;
        data[1].volume = 0.25;

        let monthly = Aggregator::aggregate_monthly(&data);
        assert_eq!(monthly[0].volume, 1200.75);
    }

    #[test]
    fn test_empty_input() {
        assert!(Aggregator::aggregate_monthly(&[]).is_empty());
    }
}
