//! StopLab Core — protective stop-loss exit signals and the entries that feed them.
//!
//! This crate contains:
//! - Indicators over plain close series (SMA, EMA, MACD)
//! - Crossover entry signals (MA golden/death cross, MACD line/signal cross)
//! - The protective stop-loss (PSL) exit generator: entry tracking, fixed
//!   stop-loss, holding-period loss cut, and the composer that scans a series
//! - Serializable configuration loaded from TOML
//!
//! Everything here is a pure function of its inputs. There is no I/O besides
//! reading a config file, and no global state: every call receives its config.

pub mod config;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod psl;
pub mod signals;

pub use config::{CrossoverConfig, ExitReset, PslConfig, StopLabConfig};
pub use domain::Direction;
pub use error::{ConfigError, PslError};
pub use psl::{generate_exits, ExitReason, ExitSignal, PositionState, PslComposer};
pub use signals::{Crosses, EntrySignalGenerator, MaCrossover, MaType, MacdCrossover};
