use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::constants::DEFAULT_FILE_PREFIX;

#[derive(Parser)]
#[command(name = "stock-monthly")]
#[command(about = "Monthly OHLCV aggregation with SMA/EMA indicators", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate daily data to months and write one CSV per ticker
    Process {
        /// Daily OHLCV CSV (date, ticker, open, high, low, close, adjclose, volume).
        /// Defaults to the first of data/stock_data.csv, stock_data.csv,
        /// dataset.csv, data.csv that exists
        input: Option<PathBuf>,

        /// Output directory (default: $STOCK_MONTHLY_OUTPUT_DIR or ./output)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Comma-separated tickers expected in the input (e.g. AAPL,MSFT)
        #[arg(long)]
        expect: Option<String>,

        /// JSON file of expected tickers (array or group -> array map)
        #[arg(long)]
        tickers_file: Option<PathBuf>,

        /// Also expect the built-in ten-ticker universe (AAPL, AMD, ... TSLA)
        #[arg(long)]
        default_tickers: bool,

        /// Fail when an expected ticker is missing instead of warning
        #[arg(long)]
        strict_tickers: bool,

        /// Keep the first row of a duplicated (ticker, date) instead of the last
        #[arg(long)]
        keep_first: bool,

        /// Output file name prefix
        #[arg(long, default_value = DEFAULT_FILE_PREFIX)]
        prefix: String,

        /// Process tickers one at a time
        #[arg(long)]
        sequential: bool,

        /// Show a progress bar while writing files
        #[arg(long)]
        progress: bool,
    },
    /// Show tickers, date ranges and month counts of a daily input file
    Status {
        /// Daily OHLCV CSV (same default discovery as `process`)
        input: Option<PathBuf>,

        /// Keep the first row of a duplicated (ticker, date) instead of the last
        #[arg(long)]
        keep_first: bool,
    },
}

pub fn run() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Process {
            input,
            output_dir,
            expect,
            tickers_file,
            default_tickers,
            strict_tickers,
            keep_first,
            prefix,
            sequential,
            progress,
        } => commands::process::run(commands::process::ProcessArgs {
            input,
            output_dir,
            expect,
            tickers_file,
            default_tickers,
            strict_tickers,
            keep_first,
            prefix,
            sequential,
            progress,
        }),
        Commands::Status { input, keep_first } => commands::status::run(input, keep_first),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}
