//! Error types for configuration and exit-signal generation.

use std::path::PathBuf;

/// Errors from building or loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("stop_loss must be in (0, 1), got {0}")]
    InvalidStopLoss(f64),
    #[error("{name} must be >= 1")]
    ZeroPeriod { name: &'static str },
    #[error("slow_period ({slow}) must be greater than fast_period ({fast})")]
    PeriodOrder { fast: usize, slow: usize },
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors from a single PSL scan. All are fatal to that call.
#[derive(Debug, thiserror::Error)]
pub enum PslError {
    #[error("length mismatch: {prices} prices but {entries} entry flags")]
    LengthMismatch { prices: usize, entries: usize },
    #[error("invalid entry price {price} at bar {bar}: must be finite and positive")]
    InvalidEntryPrice { bar: usize, price: f64 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_mismatch_message() {
        let err = PslError::LengthMismatch {
            prices: 5,
            entries: 4,
        };
        assert_eq!(
            err.to_string(),
            "length mismatch: 5 prices but 4 entry flags"
        );
    }

    #[test]
    fn config_error_is_transparent() {
        let err: PslError = ConfigError::InvalidStopLoss(1.5).into();
        assert_eq!(err.to_string(), "stop_loss must be in (0, 1), got 1.5");
    }
}
