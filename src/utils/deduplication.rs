//! Duplicate (ticker, date) resolution for daily records
//!
//! The input table may repeat a trading day for a ticker. Exactly one row per
//! pair survives; which one is chosen by [`DuplicatePolicy`].

use crate::models::{DailyRecord, DuplicatePolicy};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Deduplication keyed on (ticker, date)
pub struct DailyDeduplicator;

impl DailyDeduplicator {
    /// Deduplication key for a record
    pub fn get_key(record: &DailyRecord) -> (&str, NaiveDate) {
        (record.ticker.as_str(), record.date)
    }

    /// Filter duplicates from vector according to `policy`
    ///
    /// Returns references to the surviving records in their original relative
    /// order. The original vector is not modified.
    pub fn filter_duplicates(
        records: &[DailyRecord],
        policy: DuplicatePolicy,
    ) -> Vec<&DailyRecord> {
        let mut seen_keys = HashSet::new();
        let mut filtered = Vec::with_capacity(records.len());

        // Process in reverse if we want to keep last occurrence
        let iter: Box<dyn Iterator<Item = &DailyRecord>> = if policy.keep_last() {
            Box::new(records.iter().rev())
        } else {
            Box::new(records.iter())
        };

        for record in iter {
            if seen_keys.insert(Self::get_key(record)) {
                filtered.push(record);
            }
        }

        // Restore original order if we processed in reverse
        if policy.keep_last() {
            filtered.reverse();
        }

        filtered
    }

    /// Filter duplicates and return owned records plus the number removed
    pub fn dedup_owned(
        records: Vec<DailyRecord>,
        policy: DuplicatePolicy,
    ) -> (Vec<DailyRecord>, usize) {
        let total = records.len();
        let kept: Vec<DailyRecord> = Self::filter_duplicates(&records, policy)
            .into_iter()
            .cloned()
            .collect();
        let removed = total - kept.len();
        (kept, removed)
    }
}
