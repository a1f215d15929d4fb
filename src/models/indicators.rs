//! Technical indicators over a ticker's monthly close series
//!
//! # Window Policy
//! Both averages produce a value from the very first period onward:
//! - SMA uses a partial window until `period` closes are available.
//! - EMA is seeded with the first close and then smoothed recursively.
//!
//! Inputs must be sorted oldest first and belong to a single ticker.

/// Calculate Simple Moving Average for a given period
///
/// Index `i` averages `closes[max(0, i + 1 - period)..=i]`, so the first
/// `period - 1` values average every close seen so far instead of waiting
/// for a full window. A `period` of 0 is treated as 1.
///
/// # Arguments
/// * `closes` - Slice of closing prices, oldest first
/// * `period` - Period for the moving average (e.g., 10, 20)
///
/// # Returns
/// * Vector of SMA values, same length as `closes`
pub fn calculate_sma(closes: &[f64], period: usize) -> Vec<f64> {
    let period = period.max(1);
    let mut ma_values = Vec::with_capacity(closes.len());

    for i in 0..closes.len() {
        let start_idx = (i + 1).saturating_sub(period);
        let window = &closes[start_idx..=i];
        let sum: f64 = window.iter().sum();
        ma_values.push(sum / window.len() as f64);
    }

    ma_values
}

/// EMA smoothing multiplier: 2 / (period + 1)
pub fn ema_multiplier(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Calculate Exponential Moving Average for a given period
///
/// `ema[0] = closes[0]`, then
/// `ema[i] = (closes[i] - ema[i - 1]) * multiplier + ema[i - 1]`.
///
/// The recursion carries one accumulator and must run in index order.
///
/// # Example
/// ```
/// use stock_monthly::models::indicators::calculate_ema;
///
/// let ema = calculate_ema(&[1.0, 2.0], 10);
/// assert_eq!(ema[0], 1.0);
/// assert!((ema[1] - (1.0 + 2.0 / 11.0)).abs() < 1e-12);
/// ```
pub fn calculate_ema(closes: &[f64], period: usize) -> Vec<f64> {
    let multiplier = ema_multiplier(period);

    closes
        .iter()
        .scan(None, |prev: &mut Option<f64>, &close| {
            let ema = match *prev {
                None => close,
                Some(prev_ema) => (close - prev_ema) * multiplier + prev_ema,
            };
            *prev = Some(ema);
            Some(ema)
        })
        .collect()
}
