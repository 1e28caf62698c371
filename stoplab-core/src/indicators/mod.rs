//! Indicators over a plain close series.
//!
//! Indicators are pure functions: a value series in, a series of the same
//! length out. The first `lookback()` outputs are `f64::NAN` (warmup), and a
//! NaN input taints every output whose window contains it.
//!
//! No indicator value at bar t may depend on data from bar t+1 or later.

pub mod ema;
pub mod macd;
pub mod sma;

pub use ema::{ema_of_series, Ema};
pub use macd::{Macd, MacdSeries};
pub use sma::{sma_of_series, Sma};

/// Trait for single-series indicators.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "ema_12").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the entire series.
    fn compute(&self, values: &[f64]) -> Vec<f64>;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
