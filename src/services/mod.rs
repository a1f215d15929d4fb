pub mod aggregator;
pub mod indicator_engine;
pub mod loader;
pub mod partition_writer;
pub mod pipeline;

pub use aggregator::Aggregator;
pub use indicator_engine::enhance_monthly_series;
pub use loader::{check_expected_tickers, load_daily_csv, LoadedData, TickerCheck};
pub use partition_writer::{partition_by_ticker, write_partitions, WriteReport, WrittenFile};
pub use pipeline::{compute_monthly, ProcessReport};
