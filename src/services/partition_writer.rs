//! Partition Writer
//!
//! Groups enriched monthly records by ticker and writes one CSV per ticker:
//! `date,open,high,low,close,adjclose,volume,SMA_10,SMA_20,EMA_10,EMA_20`.

use crate::constants::{DATE_FORMAT, OUTPUT_COLUMNS};
use crate::error::{AppError, Result};
use crate::models::{output_file_path, MonthlyData, MonthlyRecord};
use csv::Writer;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One output file successfully written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub ticker: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// Outcome of writing every ticker partition
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<WrittenFile>,
    /// One `AppError::OutputWrite` per ticker that failed
    pub failures: Vec<AppError>,
}

impl WriteReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.written.iter().map(|w| w.rows).sum()
    }
}

/// Group monthly records by ticker, each group sorted ascending by month
///
/// Records may arrive in any order and interleaved across tickers.
pub fn partition_by_ticker<I>(records: I) -> MonthlyData
where
    I: IntoIterator<Item = MonthlyRecord>,
{
    let mut data = MonthlyData::new();

    for record in records {
        data.entry(record.ticker.clone()).or_default().push(record);
    }

    for series in data.values_mut() {
        series.sort_by_key(|m| m.month_end);
    }

    data
}

/// Produced groups as (ticker, row count), in ticker order
pub fn group_summary(data: &MonthlyData) -> Vec<(String, usize)> {
    data.iter()
        .map(|(ticker, series)| (ticker.clone(), series.len()))
        .collect()
}

/// Format a float for output (shortest representation that round-trips)
///
/// Integral values print without a fractional part: `1200.0` becomes `1200`.
fn format_float(value: f64) -> String {
    value.to_string()
}

fn format_indicator(value: Option<f64>) -> String {
    value.map_or(String::new(), format_float)
}

/// Write one ticker's monthly series to `path`
///
/// # Returns
/// Number of data rows written
pub fn write_ticker_csv(
    path: &Path,
    series: &[MonthlyRecord],
) -> std::result::Result<usize, csv::Error> {
    let mut writer = Writer::from_path(path)?;

    writer.write_record(OUTPUT_COLUMNS)?;

    for month in series {
        writer.write_record(&[
            month.month_end.format(DATE_FORMAT).to_string(),
            format_float(month.open),
            format_float(month.high),
            format_float(month.low),
            format_float(month.close),
            format_float(month.adjclose),
            format_float(month.volume),
            format_indicator(month.sma_10),
            format_indicator(month.sma_20),
            format_indicator(month.ema_10),
            format_indicator(month.ema_20),
        ])?;
    }

    writer.flush()?;
    Ok(series.len())
}

/// Write every ticker partition to `{output_dir}/{prefix}{ticker}.csv`
///
/// A failed ticker is recorded in the report and the remaining tickers are
/// still written. Only failure to create `output_dir` aborts the batch.
///
/// Sanitizing can map two tickers to one file name (`BRK/B` and `BRK_B`).
/// The first ticker in order keeps the file; later ones are reported as
/// write failures instead of overwriting it.
pub fn write_partitions(
    data: &MonthlyData,
    output_dir: &Path,
    file_prefix: &str,
    show_progress: bool,
) -> Result<WriteReport> {
    fs::create_dir_all(output_dir).map_err(|e| {
        AppError::OutputDir(format!("Failed to create {}: {}", output_dir.display(), e))
    })?;

    let pb = if show_progress {
        let pb = ProgressBar::new(data.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut report = WriteReport::default();
    let mut claimed: HashMap<PathBuf, &str> = HashMap::new();

    for (ticker, series) in data {
        let path = output_file_path(output_dir, file_prefix, ticker);

        if let Some(ref pb) = pb {
            pb.set_message(ticker.clone());
        }

        if let Some(owner) = claimed.get(&path) {
            warn!(
                ticker = %ticker,
                owner = %owner,
                path = %path.display(),
                "Output file name collision"
            );
            report.failures.push(AppError::OutputWrite {
                ticker: ticker.clone(),
                path: path.display().to_string(),
                reason: format!("file name already used by ticker {}", owner),
            });
            if let Some(ref pb) = pb {
                pb.inc(1);
            }
            continue;
        }
        claimed.insert(path.clone(), ticker.as_str());

        match write_ticker_csv(&path, series) {
            Ok(rows) => {
                info!(ticker = %ticker, rows = rows, path = %path.display(), "Wrote monthly file");
                report.written.push(WrittenFile {
                    ticker: ticker.clone(),
                    path,
                    rows,
                });
            }
            Err(e) => {
                warn!(
                    ticker = %ticker,
                    path = %path.display(),
                    error = %e,
                    "Failed to write monthly file"
                );
                report.failures.push(AppError::OutputWrite {
                    ticker: ticker.clone(),
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        }

        if let Some(ref pb) = pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    Ok(report)
}
