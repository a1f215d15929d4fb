use crate::constants::{DEFAULT_FILE_PREFIX, DEFAULT_OUTPUT_DIR};
use crate::models::ExpectedTickers;
use std::path::{Path, PathBuf};

/// Which record wins when the input repeats a (ticker, date) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the first row read for the pair
    KeepFirst,
    /// Keep the last row read for the pair (default)
    #[default]
    KeepLast,
}

impl DuplicatePolicy {
    pub fn keep_last(&self) -> bool {
        matches!(self, DuplicatePolicy::KeepLast)
    }
}

/// What to do when expected tickers are absent from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingTickerPolicy {
    /// Log a warning and process whatever tickers were found (default)
    #[default]
    Warn,
    /// Abort the run before any output is written
    Fail,
}

/// Configuration for one processing run
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// Daily OHLCV input file
    pub input_path: PathBuf,

    /// Directory receiving one CSV per ticker (created if absent)
    pub output_dir: PathBuf,

    /// Output file name prefix; the file for AAPL is `{prefix}AAPL.csv`
    pub file_prefix: String,

    /// Tickers the caller expects to find; empty means no check
    pub expected_tickers: ExpectedTickers,

    pub missing_ticker_policy: MissingTickerPolicy,

    pub duplicate_policy: DuplicatePolicy,

    /// Fan out aggregation and indicators across tickers
    pub parallel: bool,

    /// Show a progress bar while writing output files
    pub show_progress: bool,
}

impl ProcessConfig {
    /// Create a config for `input_path` with default settings
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            expected_tickers: ExpectedTickers::default(),
            missing_ticker_policy: MissingTickerPolicy::default(),
            duplicate_policy: DuplicatePolicy::default(),
            parallel: true,
            show_progress: false,
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

/// Build `{dir}/{prefix}{ticker}.csv`, replacing characters unsafe in file names
pub fn output_file_path(dir: &Path, prefix: &str, ticker: &str) -> PathBuf {
    let safe_ticker: String = ticker
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    dir.join(format!("{}{}.csv", prefix, safe_ticker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProcessConfig::new("stock_data.csv");

        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.file_prefix, "result_");
        assert_eq!(config.duplicate_policy, DuplicatePolicy::KeepLast);
        assert_eq!(config.missing_ticker_policy, MissingTickerPolicy::Warn);
        assert!(config.expected_tickers.is_empty());
        assert!(config.parallel);
    }

    #[test]
    fn test_output_path() {
        let config = ProcessConfig::new("in.csv").with_output_dir("out");
        let path = output_file_path(&config.output_dir, &config.file_prefix, "AAPL");
        assert_eq!(path, PathBuf::from("out/result_AAPL.csv"));
    }

    #[test]
    fn test_output_path_sanitizes_ticker() {
        let path = output_file_path(Path::new("out"), "", "BRK/B");
        assert_eq!(path, PathBuf::from("out/BRK_B.csv"));

        let path = output_file_path(Path::new("out"), "", "BF.B");
        assert_eq!(path, PathBuf::from("out/BF.B.csv"));
    }
}
