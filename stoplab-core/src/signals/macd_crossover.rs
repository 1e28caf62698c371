//! MACD crossover signal — MACD line crossing its signal line.

use crate::error::ConfigError;
use crate::indicators::Macd;

use super::{detect_crosses, Crosses, EntrySignalGenerator};

#[derive(Debug, Clone)]
pub struct MacdCrossover {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
    macd: Macd,
}

impl MacdCrossover {
    pub fn new(
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    ) -> Result<Self, ConfigError> {
        if fast_period == 0 {
            return Err(ConfigError::ZeroPeriod {
                name: "fast_period",
            });
        }
        if signal_period == 0 {
            return Err(ConfigError::ZeroPeriod {
                name: "signal_period",
            });
        }
        if slow_period <= fast_period {
            return Err(ConfigError::PeriodOrder {
                fast: fast_period,
                slow: slow_period,
            });
        }
        Ok(Self {
            fast_period,
            slow_period,
            signal_period,
            macd: Macd::new(fast_period, slow_period, signal_period),
        })
    }

    pub fn default_params() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
            macd: Macd::new(12, 26, 9),
        }
    }
}

impl EntrySignalGenerator for MacdCrossover {
    fn name(&self) -> &str {
        "macd_crossover"
    }

    fn warmup_bars(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    fn crosses(&self, closes: &[f64]) -> Crosses {
        let series = self.macd.compute_all(closes);
        detect_crosses(&series.line, &series.signal)
    }
}
