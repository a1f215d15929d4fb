//! CSV Format Constants
//!
//! Column layouts for the daily input table and the per-ticker monthly output.

/// Columns the daily input file must carry (any order, extra columns ignored)
pub const REQUIRED_INPUT_COLUMNS: [&str; 8] = [
    "date", "ticker", "open", "high", "low", "close", "adjclose", "volume",
];

/// Header of every per-ticker output file, in write order
pub const OUTPUT_COLUMNS: [&str; 11] = [
    "date", "open", "high", "low", "close", "adjclose", "volume",
    "SMA_10", "SMA_20", "EMA_10", "EMA_20",
];

/// Short moving average period (months)
pub const SHORT_PERIOD: usize = 10;

/// Long moving average period (months)
pub const LONG_PERIOD: usize = 20;

/// Input files tried in order when no input path is given
pub const DEFAULT_INPUT_CANDIDATES: [&str; 4] =
    ["data/stock_data.csv", "stock_data.csv", "dataset.csv", "data.csv"];

/// Built-in ticker universe, enabled with `--default-tickers`
pub const DEFAULT_EXPECTED_TICKERS: [&str; 10] = [
    "AAPL", "AMD", "AMZN", "AVGO", "CSCO", "MSFT", "NFLX", "PEP", "TMUS", "TSLA",
];

/// Default output directory when neither CLI nor environment supplies one
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Environment variable overriding the output directory
pub const OUTPUT_DIR_ENV: &str = "STOCK_MONTHLY_OUTPUT_DIR";

/// Default output file prefix: result_AAPL.csv
pub const DEFAULT_FILE_PREFIX: &str = "result_";

/// ISO calendar date format used for output
pub const DATE_FORMAT: &str = "%Y-%m-%d";
