use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input unreadable: {0}")]
    InputUnreadable(String),

    #[error("Schema mismatch: missing required columns {missing:?}")]
    SchemaMismatch { missing: Vec<String> },

    #[error("Ticker mismatch: expected tickers not found {missing:?}")]
    TickerMismatch { missing: Vec<String> },

    #[error("Output directory error: {0}")]
    OutputDir(String),

    #[error("Failed to write {ticker} to {path}: {reason}")]
    OutputWrite {
        ticker: String,
        path: String,
        reason: String,
    },

    #[error("Output incomplete: {failed} of {total} tickers failed to write")]
    IncompleteOutput { failed: usize, total: usize },
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InputUnreadable(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::InputUnreadable(format!("CSV error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

// Alias for convenience
pub type Error = AppError;
