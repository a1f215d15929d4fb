//! Process Command
//!
//! Turns a daily OHLCV file into one monthly indicator CSV per ticker.

use crate::constants::DEFAULT_EXPECTED_TICKERS;
use crate::error::{AppError, Error};
use crate::models::{DuplicatePolicy, ExpectedTickers, MissingTickerPolicy, ProcessConfig};
use crate::services::pipeline::{self, ProcessReport};
use crate::utils::{format_number, get_output_dir, resolve_input};
use std::path::PathBuf;
use tracing::{info, warn};

/// Arguments of the process command
#[derive(Debug, Clone, Default)]
pub struct ProcessArgs {
    /// Input file; discovered in the working directory when `None`
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub expect: Option<String>,
    pub tickers_file: Option<PathBuf>,
    pub default_tickers: bool,
    pub strict_tickers: bool,
    pub keep_first: bool,
    pub prefix: String,
    pub sequential: bool,
    pub progress: bool,
}

impl ProcessArgs {
    /// Resolve CLI arguments and environment into a run configuration
    pub fn into_config(self) -> Result<ProcessConfig, Error> {
        let mut expected = self
            .expect
            .as_deref()
            .map(ExpectedTickers::parse_list)
            .unwrap_or_default();
        if let Some(ref path) = self.tickers_file {
            expected = expected.merge(ExpectedTickers::from_file(path)?);
        }
        if self.default_tickers {
            expected = expected.merge(DEFAULT_EXPECTED_TICKERS.iter().collect());
        }

        let mut config = ProcessConfig::new(resolve_input(self.input)?)
            .with_output_dir(self.output_dir.unwrap_or_else(get_output_dir));
        config.file_prefix = self.prefix;
        config.expected_tickers = expected;
        config.missing_ticker_policy = if self.strict_tickers {
            MissingTickerPolicy::Fail
        } else {
            MissingTickerPolicy::Warn
        };
        config.duplicate_policy = if self.keep_first {
            DuplicatePolicy::KeepFirst
        } else {
            DuplicatePolicy::KeepLast
        };
        config.parallel = !self.sequential;
        config.show_progress = self.progress;

        Ok(config)
    }
}

/// Run the process command
pub fn run(args: ProcessArgs) -> Result<(), Error> {
    let config = args.into_config()?;

    println!("📁 Input: {}", config.input_path.display());
    println!("📂 Output: {}", config.output_dir.display());
    if !config.expected_tickers.is_empty() {
        println!("🎯 Expecting {} tickers", config.expected_tickers.len());
    }

    let report = pipeline::run(&config)?;
    print_summary(&report);

    let failed = report.write.failures.len();
    if failed > 0 {
        warn!(failed = failed, "Processing finished with write failures");
        return Err(AppError::IncompleteOutput {
            failed,
            total: report.groups.len(),
        });
    }

    info!(
        tickers = report.write.written.len(),
        rows = report.write.total_rows(),
        "Processing complete"
    );
    Ok(())
}

fn print_summary(report: &ProcessReport) {
    println!("\n📊 Processing Summary:");
    println!("  ✅ Daily rows read: {}", format_number(report.rows_read));
    println!("  ✅ Tickers found: {} ({})", report.tickers.len(), report.tickers.join(", "));
    if report.duplicates_removed > 0 {
        println!("  🔁 Duplicate rows resolved: {}", format_number(report.duplicates_removed));
    }
    println!("  ✅ Monthly rows: {}", format_number(report.monthly_records()));

    if !report.ticker_check.missing.is_empty() {
        println!("  ⚠️  Missing expected tickers: {}", report.ticker_check.missing.join(", "));
    }
    if !report.ticker_check.unexpected.is_empty() {
        println!("  ⚠️  Unexpected tickers: {}", report.ticker_check.unexpected.join(", "));
    }

    for file in &report.write.written {
        println!("  📄 {}: {} rows", file.path.display(), file.rows);
    }

    if !report.write.failures.is_empty() {
        println!("  ⚠️  Write failures: {}", report.write.failures.len());
        for error in &report.write.failures {
            println!("    ❌ {}", error);
        }
    }

    println!("  ⏱️  Total time: {:.2}s", report.duration.as_secs_f64());
}
