//! Indicator Engine
//!
//! Attaches SMA-10, SMA-20, EMA-10 and EMA-20 to a ticker's monthly series.
//! Each ticker is computed independently from its own close sequence.

use crate::constants::{LONG_PERIOD, SHORT_PERIOD};
use crate::models::indicators::{calculate_ema, calculate_sma};
use crate::models::MonthlyRecord;
use tracing::debug;

/// Enhance one ticker's monthly series with technical indicators
///
/// `series` must be sorted ascending by month and hold a single ticker.
/// Every row receives all four indicators; early rows use partial windows.
pub fn enhance_monthly_series(series: &mut [MonthlyRecord]) {
    if series.is_empty() {
        return;
    }

    let closes: Vec<f64> = series.iter().map(|m| m.close).collect();
    let sma_short = calculate_sma(&closes, SHORT_PERIOD);
    let sma_long = calculate_sma(&closes, LONG_PERIOD);
    let ema_short = calculate_ema(&closes, SHORT_PERIOD);
    let ema_long = calculate_ema(&closes, LONG_PERIOD);

    for (i, month) in series.iter_mut().enumerate() {
        month.sma_10 = Some(sma_short[i]);
        month.sma_20 = Some(sma_long[i]);
        month.ema_10 = Some(ema_short[i]);
        month.ema_20 = Some(ema_long[i]);
    }

    debug!(ticker = %series[0].ticker, months = series.len(), "Attached indicators");
}
