mod daily_record;
mod monthly_record;
mod process_config;
mod ticker_group;
pub mod indicators;

pub use daily_record::DailyRecord;
pub use monthly_record::MonthlyRecord;
pub use process_config::{output_file_path, DuplicatePolicy, MissingTickerPolicy, ProcessConfig};
pub use ticker_group::ExpectedTickers;

use std::collections::BTreeMap;

/// Daily series for a single ticker, oldest first
pub type DailySeries = Vec<DailyRecord>;

/// Monthly series for a single ticker, oldest first
pub type MonthlySeries = Vec<MonthlyRecord>;

/// Per-ticker daily data (ticker -> series), iterated in ticker order
pub type DailyData = BTreeMap<String, DailySeries>;

/// Per-ticker monthly data (ticker -> series), iterated in ticker order
pub type MonthlyData = BTreeMap<String, MonthlySeries>;
