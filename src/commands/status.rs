use crate::error::Error;
use crate::models::DuplicatePolicy;
use crate::services::{load_daily_csv, Aggregator, LoadedData};
use crate::utils::{format_number, resolve_input};
use chrono::NaiveDate;
use std::path::PathBuf;

/// Summary of one ticker's daily input
#[derive(Debug, PartialEq, Eq)]
pub struct TickerStatus {
    pub ticker: String,
    pub daily_records: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// Monthly rows the aggregator would produce
    pub months: usize,
}

pub fn run(input: Option<PathBuf>, keep_first: bool) -> Result<(), Error> {
    println!("📊 Daily Input Status\n");

    let input = resolve_input(input)?;
    let policy = if keep_first {
        DuplicatePolicy::KeepFirst
    } else {
        DuplicatePolicy::KeepLast
    };
    let loaded = load_daily_csv(&input, policy)?;

    if loaded.by_ticker.is_empty() {
        println!("⚠️  No daily records found in {}", input.display());
        return Ok(());
    }

    println!("📁 {}", input.display());
    println!("📈 Total Tickers: {}", loaded.by_ticker.len());
    println!("   Rows read: {}", format_number(loaded.rows_read));
    if loaded.duplicates_removed > 0 {
        println!("   Duplicates resolved: {}", format_number(loaded.duplicates_removed));
    }

    println!("\n═══════════════════════════════════════════════════════════\n");

    for status in ticker_statuses(&loaded) {
        println!(
            "🔹 {:<8} {:>8} daily  {:>4} months  ({} → {})",
            status.ticker,
            format_number(status.daily_records),
            status.months,
            status.first_date,
            status.last_date
        );
    }

    Ok(())
}

/// Per-ticker summaries in ticker order
pub fn ticker_statuses(loaded: &LoadedData) -> Vec<TickerStatus> {
    loaded
        .by_ticker
        .iter()
        .filter_map(|(ticker, series)| {
            let first = series.first()?;
            let last = series.last()?;
            Some(TickerStatus {
                ticker: ticker.clone(),
                daily_records: series.len(),
                first_date: first.date,
                last_date: last.date,
                months: Aggregator::aggregate_monthly(series).len(),
            })
        })
        .collect()
}
