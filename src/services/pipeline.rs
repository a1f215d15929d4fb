//! Monthly processing pipeline
//!
//! Loader → Aggregator → Indicator Engine → Partition Writer, single pass.
//! Aggregation and indicators fan out across tickers; each ticker owns its
//! own series and accumulator, so no state is shared between them.

use crate::error::Result;
use crate::models::{DailyData, DailyRecord, MonthlyRecord, ProcessConfig};
use crate::services::aggregator::Aggregator;
use crate::services::indicator_engine::enhance_monthly_series;
use crate::services::loader::{check_expected_tickers, load_daily_csv, TickerCheck};
use crate::services::partition_writer::{
    group_summary, partition_by_ticker, write_partitions, WriteReport,
};
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::{info, instrument};

/// Statistics for one processing run
#[derive(Debug)]
pub struct ProcessReport {
    /// Data rows read from the input
    pub rows_read: usize,
    pub duplicates_removed: usize,
    /// Distinct tickers discovered in the input, sorted
    pub tickers: Vec<String>,
    /// Discovered vs expected tickers
    pub ticker_check: TickerCheck,
    /// (ticker, monthly rows) for every produced group
    pub groups: Vec<(String, usize)>,
    pub write: WriteReport,
    pub duration: Duration,
}

impl ProcessReport {
    pub fn monthly_records(&self) -> usize {
        self.groups.iter().map(|(_, rows)| rows).sum()
    }
}

/// Aggregate one ticker and attach its indicators
pub fn process_ticker(daily: &[DailyRecord]) -> Vec<MonthlyRecord> {
    let mut monthly = Aggregator::aggregate_monthly(daily);
    enhance_monthly_series(&mut monthly);
    monthly
}

/// Aggregate and enhance every ticker, merging the results
///
/// With `parallel` each ticker runs as its own rayon task; the merged output
/// is identical either way.
pub fn compute_monthly(daily: &DailyData, parallel: bool) -> Vec<MonthlyRecord> {
    if parallel {
        daily
            .par_iter()
            .map(|(_, series)| process_ticker(series))
            .flatten()
            .collect()
    } else {
        daily
            .iter()
            .flat_map(|(_, series)| process_ticker(series))
            .collect()
    }
}

/// Run the full pipeline for `config`
///
/// Input, schema and (under the `Fail` policy) ticker errors abort before any
/// output is written. Per-ticker write failures are collected in the report.
#[instrument(skip(config), fields(input = %config.input_path.display()))]
pub fn run(config: &ProcessConfig) -> Result<ProcessReport> {
    let start_time = Instant::now();

    // Step 1: Load and validate
    let loaded = load_daily_csv(&config.input_path, config.duplicate_policy)?;
    let tickers = loaded.tickers();
    let ticker_check = check_expected_tickers(
        &tickers,
        &config.expected_tickers,
        config.missing_ticker_policy,
    )?;

    // Step 2 + 3: Aggregate to months and attach indicators, per ticker
    let monthly = compute_monthly(&loaded.by_ticker, config.parallel);
    info!(
        tickers = loaded.by_ticker.len(),
        monthly_records = monthly.len(),
        "Computed monthly indicators"
    );

    // Step 4: Partition by ticker and write
    let partitions = partition_by_ticker(monthly);
    let groups = group_summary(&partitions);
    let write = write_partitions(
        &partitions,
        &config.output_dir,
        &config.file_prefix,
        config.show_progress,
    )?;

    Ok(ProcessReport {
        rows_read: loaded.rows_read,
        duplicates_removed: loaded.duplicates_removed,
        tickers,
        ticker_check,
        groups,
        write,
        duration: start_time.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{output_file_path, ExpectedTickers, MissingTickerPolicy};
    use crate::services::loader::{group_by_ticker, load_daily_reader};
    use chrono::NaiveDate;
    use std::fmt::Write as _;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const HEADER: &str = "date,ticker,open,high,low,close,adjclose,volume\n";

    /// One trading day per month for 24 months; close of month i is base + i
    fn synthetic_csv(tickers: &[(&str, f64)]) -> String {
        let mut csv = String::from(HEADER);
        for i in 0..24u32 {
            let year = 2020 + (i / 12) as i32;
            let month = i % 12 + 1;
            // Write tickers interleaved row by row
            for (ticker, base) in tickers {
                let close = base + i as f64;
                writeln!(
                    csv,
                    "{}-{:02}-15,{},{},{},{},{},{},{}",
                    year, month, ticker, close, close + 0.5, close - 0.5, close, close, 1000
                )
                .unwrap();
            }
        }
        csv
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    fn write_input(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("stock_data.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_three_ticker_24_month_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let csv = synthetic_csv(&[("X", 1.0), ("Y", 50.0), ("Z", 100.0)]);
        let input = write_input(temp_dir.path(), &csv);
        let config = ProcessConfig::new(input).with_output_dir(temp_dir.path().join("out"));

        let report = run(&config).unwrap();

        assert_eq!(report.rows_read, 72);
        assert_eq!(report.tickers, vec!["X", "Y", "Z"]);
        assert_eq!(report.groups.len(), 3);
        assert!(report.groups.iter().all(|(_, rows)| *rows == 24));
        assert!(report.write.is_complete());

        let rows = read_rows(&temp_dir.path().join("out").join("result_X.csv"));
        assert_eq!(rows.len(), 24);
        let col = |row: usize, idx: usize| rows[row][idx].parse::<f64>().unwrap();

        assert_eq!(rows[0][0], "2020-01-15");
        assert_eq!(col(0, 7), 1.0); // SMA_10 month 1
        assert_eq!(col(9, 7), 5.5); // SMA_10 month 10
        assert_eq!(col(0, 9), 1.0); // EMA_10 month 1
        assert!((col(1, 9) - 1.181_818_181_8).abs() < 1e-9); // EMA_10 month 2
        assert_eq!(col(19, 8), 10.5); // SMA_20 month 20
    }

    #[test]
    fn test_ema_column_matches_recursion() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(temp_dir.path(), &synthetic_csv(&[("X", 1.0)]));
        let config = ProcessConfig::new(input).with_output_dir(temp_dir.path().join("out"));
        run(&config).unwrap();

        let rows = read_rows(&temp_dir.path().join("out").join("result_X.csv"));
        for (idx, period) in [(9usize, 10usize), (10, 20)] {
            let m = 2.0 / (period as f64 + 1.0);
            for i in 1..rows.len() {
                let close: f64 = rows[i][4].parse().unwrap();
                let prev: f64 = rows[i - 1][idx].parse().unwrap();
                let ema: f64 = rows[i][idx].parse().unwrap();
                let expected = (close - prev) * m + prev;
                assert!((ema - expected).abs() <= 1e-9 * expected.abs());
            }
        }
    }

    #[test]
    fn test_three_month_ticker_partial_windows() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(
            temp_dir.path(),
            &format!(
                "{}2022-01-03,S,1,1,1,10,10,5\n2022-01-20,S,1,1,1,12,12,5\n\
                 2022-02-01,S,1,1,1,20,20,5\n2022-03-31,S,1,1,1,30,30,5\n",
                HEADER
            ),
        );
        let config = ProcessConfig::new(input).with_output_dir(temp_dir.path().join("out"));
        run(&config).unwrap();

        let rows = read_rows(&temp_dir.path().join("out").join("result_S.csv"));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], "2022-01-20");
        assert_eq!(rows[0][6], "10"); // volume summed
        let sma20: Vec<f64> = rows.iter().map(|r| r[8].parse().unwrap()).collect();
        assert_eq!(sma20, vec![12.0, 16.0, 62.0 / 3.0]);
        assert!(rows.iter().all(|r| !r[10].is_empty())); // EMA_20 never empty
    }

    #[test]
    fn test_run_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(temp_dir.path(), &synthetic_csv(&[("A", 3.3), ("B", 7.7)]));

        let first = ProcessConfig::new(&input).with_output_dir(temp_dir.path().join("first"));
        let second = ProcessConfig::new(&input).with_output_dir(temp_dir.path().join("second"));
        run(&first).unwrap();
        run(&second).unwrap();

        for ticker in ["A", "B"] {
            let a = fs::read(output_file_path(&first.output_dir, "result_", ticker)).unwrap();
            let b = fs::read(output_file_path(&second.output_dir, "result_", ticker)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let csv = synthetic_csv(&[("A", 1.0), ("B", 2.0), ("C", 3.0)]);
        let loaded = load_daily_reader(csv.as_bytes(), Default::default()).unwrap();

        let parallel = compute_monthly(&loaded.by_ticker, true);
        let sequential = compute_monthly(&loaded.by_ticker, false);

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_interleaved_tickers_partition_into_two_groups() {
        let d = |day: u32| NaiveDate::from_ymd_opt(2022, 1 + day % 3, 1 + day).unwrap();
        let mut records = Vec::new();
        for day in 0..9 {
            let ticker = if day % 2 == 0 { "EVEN" } else { "ODD" };
            records.push(DailyRecord::new(
                d(day), ticker.to_string(), 1.0, 2.0, 0.5, day as f64, day as f64, 10.0,
            ));
        }
        let daily = group_by_ticker(records);

        let partitions = partition_by_ticker(compute_monthly(&daily, true));

        assert_eq!(partitions.len(), 2);
        for (ticker, series) in &partitions {
            assert!(series.iter().all(|m| &m.ticker == ticker));
            assert!(series.windows(2).all(|w| w[0].month_end < w[1].month_end));
        }
    }

    #[test]
    fn test_strict_missing_ticker_aborts_before_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(temp_dir.path(), &synthetic_csv(&[("X", 1.0)]));
        let out = temp_dir.path().join("out");
        let mut config = ProcessConfig::new(input).with_output_dir(&out);
        config.expected_tickers = ExpectedTickers::parse_list("X,MISSING");
        config.missing_ticker_policy = MissingTickerPolicy::Fail;

        let err = run(&config).unwrap_err();

        assert!(matches!(err, AppError::TickerMismatch { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_lenient_missing_ticker_processes_found_tickers() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(temp_dir.path(), &synthetic_csv(&[("X", 1.0)]));
        let mut config = ProcessConfig::new(input).with_output_dir(temp_dir.path().join("out"));
        config.expected_tickers = ExpectedTickers::parse_list("X,MISSING");

        let report = run(&config).unwrap();

        assert_eq!(report.ticker_check.missing, vec!["MISSING"]);
        assert_eq!(report.groups, vec![("X".to_string(), 24)]);
    }

    #[test]
    fn test_unreadable_input_produces_no_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(temp_dir.path(), "date,ticker,open\n2022-01-03,X,1\n");
        let out = temp_dir.path().join("out");
        let config = ProcessConfig::new(input).with_output_dir(&out);

        assert!(matches!(run(&config), Err(AppError::SchemaMismatch { .. })));
        assert!(!out.exists());
    }
}
