//! Moving average crossover signal — golden cross and death cross detection.
//!
//! Golden cross (fast MA crosses above the slow MA) marks long entries.
//! Death cross (fast MA crosses below the slow MA) marks short entries.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::indicators::{Ema, Indicator, Sma};

use super::{detect_crosses, Crosses, EntrySignalGenerator};

/// Moving average type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaType {
    #[default]
    Sma,
    Ema,
}

impl MaType {
    fn line(self, period: usize) -> Box<dyn Indicator> {
        match self {
            MaType::Sma => Box::new(Sma::new(period)),
            MaType::Ema => Box::new(Ema::new(period)),
        }
    }
}

/// Moving average crossover signal generator.
#[derive(Debug, Clone)]
pub struct MaCrossover {
    pub fast_period: usize,
    pub slow_period: usize,
    pub ma_type: MaType,
}

impl MaCrossover {
    pub fn new(fast_period: usize, slow_period: usize, ma_type: MaType) -> Result<Self, ConfigError> {
        if fast_period == 0 {
            return Err(ConfigError::ZeroPeriod {
                name: "fast_period",
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
            ma_type,
        })
    }
}

impl EntrySignalGenerator for MaCrossover {
    fn name(&self) -> &str {
        match self.ma_type {
            MaType::Sma => "ma_crossover",
            MaType::Ema => "ema_crossover",
        }
    }

    fn warmup_bars(&self) -> usize {
        self.slow_period
    }

    fn crosses(&self, closes: &[f64]) -> Crosses {
        let fast = self.ma_type.line(self.fast_period).compute(closes);
        let slow = self.ma_type.line(self.slow_period).compute(closes);
        detect_crosses(&fast, &slow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;

    /// Falls for 10 bars, rises for 10, falls for 10.
    fn v_shape() -> Vec<f64> {
        let mut closes = Vec::new();
        for i in 0..10 {
            closes.push(100.0 - i as f64);
        }
        for i in 0..10 {
            closes.push(91.0 + i as f64 * 2.0);
        }
        for i in 0..10 {
            closes.push(109.0 - i as f64 * 2.0);
        }
        closes
    }

    #[test]
    fn rejects_bad_periods() {
        assert!(matches!(
            MaCrossover::new(0, 5, MaType::Sma),
            Err(ConfigError::ZeroPeriod { .. })
        ));
        assert!(matches!(
            MaCrossover::new(5, 5, MaType::Sma),
            Err(ConfigError::PeriodOrder { fast: 5, slow: 5 })
        ));
    }

    #[test]
    fn sma_golden_then_death() {
        let sig = MaCrossover::new(2, 4, MaType::Sma).unwrap();
        let crosses = sig.crosses(&v_shape());
        let golden: Vec<usize> = (0..30).filter(|&i| crosses.golden[i]).collect();
        let death: Vec<usize> = (0..30).filter(|&i| crosses.death[i]).collect();
        assert_eq!(golden.len(), 1, "one golden cross on the way up: {golden:?}");
        assert_eq!(death.len(), 1, "one death cross on the way down: {death:?}");
        assert!(golden[0] > 9 && golden[0] < 20);
        assert!(death[0] > 19);
    }

    #[test]
    fn no_cross_before_warmup() {
        let sig = MaCrossover::new(2, 4, MaType::Ema).unwrap();
        let entries = sig.entries(&v_shape(), Direction::Long);
        assert!(entries.iter().take(sig.warmup_bars()).all(|&e| !e));
    }

    #[test]
    fn ema_and_sma_both_find_the_turn() {
        let closes = v_shape();
        for ma_type in [MaType::Sma, MaType::Ema] {
            let sig = MaCrossover::new(3, 6, ma_type).unwrap();
            let longs = sig.entries(&closes, Direction::Long);
            assert_eq!(longs.len(), closes.len());
            assert!(longs.iter().any(|&e| e), "{} found no golden cross", sig.name());
        }
    }

    #[test]
    fn monotonic_series_never_crosses() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let sig = MaCrossover::new(5, 20, MaType::Sma).unwrap();
        let crosses = sig.crosses(&closes);
        assert!(crosses.golden.iter().all(|&g| !g));
        assert!(crosses.death.iter().all(|&d| !d));
    }
}
