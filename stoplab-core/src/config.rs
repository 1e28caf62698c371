//! Serializable configuration for exit and entry generation.
//!
//! A config file has a required `[psl]` table and an optional `[entries]`
//! table describing how to derive entry flags from closes:
//!
//! ```toml
//! [psl]
//! holding_period = 5
//! direction = "long"
//! stop_loss = 0.03
//! exit_reset = "flat"
//!
//! [entries]
//! type = "ma_crossover"
//! fast_period = 10
//! slow_period = 50
//! ma_type = "ema"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::Direction;
use crate::error::ConfigError;
use crate::signals::{EntrySignalGenerator, MaCrossover, MaType, MacdCrossover};

/// What happens to the tracked entry after an exit fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReset {
    /// The position goes flat; later bars are not evaluated until a new entry.
    #[default]
    Flat,
    /// The entry stays tracked, so every later bar that still breaches fires again.
    KeepEntry,
}

/// Protective stop-loss configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PslConfig {
    /// Minimum bars held before the negative-PnL exit is evaluated.
    pub holding_period: usize,
    #[serde(default)]
    pub direction: Direction,
    /// Fractional stop distance from entry (0.03 = 3%). `None` disables the stop.
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub exit_reset: ExitReset,
}

impl PslConfig {
    pub fn new(holding_period: usize, direction: Direction) -> Self {
        Self {
            holding_period,
            direction,
            stop_loss: None,
            exit_reset: ExitReset::default(),
        }
    }

    /// Build from the `(holding_period, short, stop_loss)` triple.
    pub fn from_parts(holding_period: usize, short: bool, stop_loss: Option<f64>) -> Self {
        Self {
            stop_loss,
            ..Self::new(holding_period, Direction::from_short(short))
        }
    }

    pub fn with_stop_loss(mut self, stop_loss: f64) -> Self {
        self.stop_loss = Some(stop_loss);
        self
    }

    pub fn with_exit_reset(mut self, exit_reset: ExitReset) -> Self {
        self.exit_reset = exit_reset;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(sl) = self.stop_loss {
            if !(sl > 0.0 && sl < 1.0) {
                return Err(ConfigError::InvalidStopLoss(sl));
            }
        }
        Ok(())
    }

    /// Deterministic content hash of this config.
    ///
    /// Two runs with identical configs share a fingerprint, so output files
    /// can be labelled and compared.
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_string(self)?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

impl Default for PslConfig {
    fn default() -> Self {
        Self::new(0, Direction::Long)
    }
}

/// Entry signal generator configuration (serializable enum).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CrossoverConfig {
    /// Fast MA crossing the slow MA.
    MaCrossover {
        fast_period: usize,
        slow_period: usize,
        #[serde(default)]
        ma_type: MaType,
    },
    /// MACD line crossing its signal line.
    MacdCrossover {
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    },
}

impl CrossoverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build().map(|_| ())
    }

    /// Create the configured generator.
    pub fn build(&self) -> Result<Box<dyn EntrySignalGenerator>, ConfigError> {
        match *self {
            CrossoverConfig::MaCrossover {
                fast_period,
                slow_period,
                ma_type,
            } => Ok(Box::new(MaCrossover::new(fast_period, slow_period, ma_type)?)),
            CrossoverConfig::MacdCrossover {
                fast_period,
                slow_period,
                signal_period,
            } => Ok(Box::new(MacdCrossover::new(
                fast_period,
                slow_period,
                signal_period,
            )?)),
        }
    }
}

/// Top-level config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StopLabConfig {
    pub psl: PslConfig,
    #[serde(default)]
    pub entries: Option<CrossoverConfig>,
}

impl StopLabConfig {
    /// Parse and validate a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: StopLabConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.psl.validate()?;
        if let Some(entries) = &self.entries {
            entries.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r#"
[psl]
holding_period = 5
direction = "short"
stop_loss = 0.03
exit_reset = "keep_entry"

[entries]
type = "ma_crossover"
fast_period = 10
slow_period = 50
ma_type = "ema"
"#;

    #[test]
    fn parse_full_config() {
        let config = StopLabConfig::from_toml(FULL).unwrap();
        assert_eq!(config.psl.holding_period, 5);
        assert_eq!(config.psl.direction, Direction::Short);
        assert_eq!(config.psl.stop_loss, Some(0.03));
        assert_eq!(config.psl.exit_reset, ExitReset::KeepEntry);
        assert_eq!(
            config.entries,
            Some(CrossoverConfig::MaCrossover {
                fast_period: 10,
                slow_period: 50,
                ma_type: MaType::Ema,
            })
        );
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = StopLabConfig::from_toml("[psl]\nholding_period = 3\n").unwrap();
        assert_eq!(config.psl.direction, Direction::Long);
        assert_eq!(config.psl.stop_loss, None);
        assert_eq!(config.psl.exit_reset, ExitReset::Flat);
        assert!(config.entries.is_none());
    }

    #[test]
    fn parse_macd_entries() {
        let toml_str = r#"
[psl]
holding_period = 2

[entries]
type = "macd_crossover"
fast_period = 12
slow_period = 26
signal_period = 9
"#;
        let config = StopLabConfig::from_toml(toml_str).unwrap();
        let generator = config.entries.unwrap().build().unwrap();
        assert_eq!(generator.name(), "macd_crossover");
    }

    #[test]
    fn rejects_out_of_range_stop_loss() {
        for bad in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let config = PslConfig::default().with_stop_loss(bad);
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidStopLoss(_))),
                "stop_loss {bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_bad_crossover_periods() {
        let toml_str = r#"
[psl]
holding_period = 2

[entries]
type = "ma_crossover"
fast_period = 50
slow_period = 10
"#;
        let err = StopLabConfig::from_toml(toml_str).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::PeriodOrder { fast: 50, slow: 10 }
        ));
    }

    #[test]
    fn rejects_unknown_field() {
        let err = StopLabConfig::from_toml("[psl]\nholding_period = 1\nstoploss = 0.1\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn from_parts_maps_short_flag() {
        let config = PslConfig::from_parts(4, true, Some(0.05));
        assert_eq!(config.direction, Direction::Short);
        assert_eq!(config.holding_period, 4);
        assert_eq!(config.stop_loss, Some(0.05));
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let a = PslConfig::new(5, Direction::Long).with_stop_loss(0.03);
        let b = a.clone();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert!(!a.fingerprint().unwrap().is_empty());
    }

    #[test]
    fn fingerprint_changes_with_params() {
        let a = PslConfig::new(5, Direction::Long);
        let b = PslConfig::new(6, Direction::Long);
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();
        let config = StopLabConfig::from_file(file.path()).unwrap();
        assert_eq!(config.psl.holding_period, 5);
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let err = StopLabConfig::from_file(Path::new("/nonexistent/stoplab.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
