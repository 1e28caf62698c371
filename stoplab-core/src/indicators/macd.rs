//! Moving Average Convergence Divergence (MACD).
//!
//! line      = EMA(fast) - EMA(slow)
//! signal    = EMA(line, signal_period), seeded on the first valid line values
//! histogram = line - signal
//!
//! Lookback: (slow - 1) for the line, (slow - 1) + (signal - 1) for signal
//! and histogram.

use serde::{Deserialize, Serialize};

use super::ema::ema_of_series;
use super::Indicator;

#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    name: String,
}

/// All three MACD series, each the same length as the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl Macd {
    /// Periods are validated by the caller (`fast >= 1`, `slow > fast`, `signal >= 1`).
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
            name: format!("macd_{fast_period}_{slow_period}_{signal_period}"),
        }
    }

    pub fn compute_all(&self, values: &[f64]) -> MacdSeries {
        let n = values.len();
        let fast = ema_of_series(values, self.fast_period);
        let slow = ema_of_series(values, self.slow_period);
        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();

        // The signal EMA runs over the valid tail of the line only; seeding on
        // the warmup NaNs would blank the whole series.
        let mut signal = vec![f64::NAN; n];
        if let Some(start) = line.iter().position(|v| !v.is_nan()) {
            let tail = ema_of_series(&line[start..], self.signal_period);
            signal[start..].copy_from_slice(&tail);
        }

        let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

        MacdSeries {
            line,
            signal,
            histogram,
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.slow_period.saturating_sub(1)
    }

    /// The MACD line. Use [`Macd::compute_all`] for signal and histogram.
    fn compute(&self, values: &[f64]) -> Vec<f64> {
        let fast = ema_of_series(values, self.fast_period);
        let slow = ema_of_series(values, self.slow_period);
        fast.iter().zip(&slow).map(|(f, s)| f - s).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn line_is_fast_minus_slow() {
        let values: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let macd = Macd::new(3, 6, 4);
        let all = macd.compute_all(&values);
        let fast = ema_of_series(&values, 3);
        let slow = ema_of_series(&values, 6);
        for i in 5..40 {
            assert_approx(all.line[i], fast[i] - slow[i], DEFAULT_EPSILON);
        }
        let computed = macd.compute(&values);
        for (a, b) in all.line.iter().zip(&computed) {
            if a.is_nan() {
                assert!(b.is_nan());
            } else {
                assert_approx(*a, *b, DEFAULT_EPSILON);
            }
        }
        assert!(computed[..5].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn warmup_lengths() {
        let values: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let all = Macd::new(3, 6, 4).compute_all(&values);
        // line valid from slow-1 = 5, signal from 5 + 3 = 8
        assert!(all.line[4].is_nan());
        assert!(!all.line[5].is_nan());
        assert!(all.signal[7].is_nan());
        assert!(!all.signal[8].is_nan());
        assert!(all.histogram[7].is_nan());
        assert!(!all.histogram[8].is_nan());
    }

    #[test]
    fn constant_series_is_flat_zero() {
        let values = vec![50.0; 30];
        let all = Macd::new(3, 6, 4).compute_all(&values);
        for i in 8..30 {
            assert_approx(all.line[i], 0.0, DEFAULT_EPSILON);
            assert_approx(all.signal[i], 0.0, DEFAULT_EPSILON);
            assert_approx(all.histogram[i], 0.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn short_series_is_all_nan() {
        let all = Macd::new(3, 6, 4).compute_all(&[1.0, 2.0, 3.0]);
        assert!(all.line.iter().all(|v| v.is_nan()));
        assert!(all.signal.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn name_and_lookback() {
        let macd = Macd::new(12, 26, 9);
        assert_eq!(macd.name(), "macd_12_26_9");
        assert_eq!(macd.lookback(), 25);
    }
}
