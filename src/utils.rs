pub mod deduplication;

use crate::constants::{DEFAULT_INPUT_CANDIDATES, DEFAULT_OUTPUT_DIR, OUTPUT_DIR_ENV};
use crate::error::{AppError, Result};
use std::path::{Path, PathBuf};

/// Get output directory from environment variable or use default
pub fn get_output_dir() -> PathBuf {
    std::env::var(OUTPUT_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR))
}

/// First existing default input file under `base`, in candidate order
pub fn find_default_input(base: &Path) -> Option<PathBuf> {
    DEFAULT_INPUT_CANDIDATES
        .iter()
        .map(|candidate| base.join(candidate))
        .find(|path| path.is_file())
}

/// Use the given input path, or discover one in the working directory
pub fn resolve_input(input: Option<PathBuf>) -> Result<PathBuf> {
    match input {
        Some(path) => Ok(path),
        None => find_default_input(Path::new("")).ok_or_else(|| {
            AppError::Config(format!(
                "No input file given and none of {} found",
                DEFAULT_INPUT_CANDIDATES.join(", ")
            ))
        }),
    }
}

/// Format an integer with thousands separators (1234567 -> "1,234,567")
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}
