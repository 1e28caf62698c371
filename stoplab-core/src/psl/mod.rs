//! Protective stop-loss (PSL) exit signals.
//!
//! A PSL exit combines a hard percentage stop-loss with a time-based loss cut:
//! once a position has been held for at least `holding_period` bars, any bar
//! on which it is underwater closes it.
//!
//! The composer makes one forward pass over the price series. Each bar it
//! first registers a new entry (last entry wins, even over an open position),
//! then asks the exit rules in priority order whether the position closes:
//!
//! 1. [`StopLoss`] — price breached `entry * (1 - sl)` (long) or `entry * (1 + sl)` (short)
//! 2. [`HoldingPeriodLoss`] — `days_held >= holding_period` and signed PnL < 0
//!
//! The first rule that fires sets the exit reason for the bar.

pub mod composer;
pub mod entry_tracker;
pub mod holding_period;
pub mod stop_loss;

pub use composer::{generate_exits, ExitSignal, PslComposer};
pub use entry_tracker::EntryTracker;
pub use holding_period::HoldingPeriodLoss;
pub use stop_loss::StopLoss;

use serde::{Deserialize, Serialize};

use crate::domain::Direction;

/// Why a bar was marked as an exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    HoldingPeriodLoss,
}

impl ExitReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ExitReason::StopLoss => "stop_loss",
            ExitReason::HoldingPeriodLoss => "holding_period_loss",
        }
    }
}

/// Position state on a bar, observed after entry registration and before exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionState {
    Flat,
    /// Open, holding period not yet reached: only the stop-loss can fire.
    OpenBeforeEligible,
    /// Open and eligible for the negative-PnL exit on this and every later bar.
    OpenEligible,
}

/// Everything an exit rule may look at on one bar.
#[derive(Debug, Clone, Copy)]
pub struct BarContext {
    pub bar_index: usize,
    pub price: f64,
    pub entry_index: usize,
    pub entry_price: f64,
    pub direction: Direction,
}

impl BarContext {
    /// Bars elapsed since the tracked entry.
    pub fn days_held(&self) -> usize {
        self.bar_index - self.entry_index
    }

    /// Signed fractional PnL from entry to this bar.
    pub fn pnl(&self) -> f64 {
        self.direction.signed_return(self.entry_price, self.price)
    }
}

/// A single exit condition evaluated against an open position.
pub trait ExitRule: Send + Sync {
    /// Human-readable name (e.g., "stop_loss").
    fn name(&self) -> &str;

    /// Reason recorded when this rule closes a position.
    fn reason(&self) -> ExitReason;

    fn should_exit(&self, ctx: &BarContext) -> bool;
}
