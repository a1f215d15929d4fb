use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use crate::error::{AppError, Result};

/// Accepted layouts of a tickers JSON file
#[derive(Deserialize)]
#[serde(untagged)]
enum TickerFile {
    /// `["AAPL", "MSFT"]`
    List(Vec<String>),
    /// `{"TECH": ["AAPL", "MSFT"], "CONSUMER": ["PEP"]}`
    Groups(HashMap<String, Vec<String>>),
}

/// Set of tickers the caller expects the input to contain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedTickers {
    tickers: BTreeSet<String>,
}

impl ExpectedTickers {
    /// Parse a comma-separated list such as `"AAPL, MSFT,TSLA"`
    pub fn parse_list(s: &str) -> Self {
        Self::from_iter(s.split(','))
    }

    /// Load from a JSON file holding either an array or a group map
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let parsed: TickerFile = serde_json::from_str(&content)
            .map_err(|e| {
                AppError::Config(format!("Invalid tickers file {}: {}", path.display(), e))
            })?;

        Ok(match parsed {
            TickerFile::List(list) => Self::from_iter(list),
            TickerFile::Groups(groups) => Self::from_iter(groups.into_values().flatten()),
        })
    }

    /// Union of two expected sets
    pub fn merge(mut self, other: ExpectedTickers) -> Self {
        self.tickers.extend(other.tickers);
        self
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.tickers.contains(ticker)
    }

    /// Tickers in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.tickers.iter()
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExpectedTickers {
    /// Blanks are dropped and whitespace trimmed
    fn from_iter<I: IntoIterator<Item = S>>(tickers: I) -> Self {
        let tickers = tickers
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Self { tickers }
    }
}
