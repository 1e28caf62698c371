//! Fixed stop-loss — breach at a fixed percentage against entry.
//!
//! For longs: stop = entry * (1 - stop_pct), breached when price <= stop.
//! For shorts: stop = entry * (1 + stop_pct), breached when price >= stop.

use crate::domain::Direction;
use crate::error::ConfigError;

use super::{BarContext, ExitReason, ExitRule};

#[derive(Debug, Clone)]
pub struct StopLoss {
    /// Stop distance as a fraction (e.g., 0.03 for 3%).
    pub stop_pct: f64,
}

impl StopLoss {
    pub fn new(stop_pct: f64) -> Result<Self, ConfigError> {
        if !(stop_pct > 0.0 && stop_pct < 1.0) {
            return Err(ConfigError::InvalidStopLoss(stop_pct));
        }
        Ok(Self { stop_pct })
    }

    /// Stop price for a position entered at `entry_price`.
    pub fn stop_level(&self, direction: Direction, entry_price: f64) -> f64 {
        match direction {
            Direction::Long => entry_price * (1.0 - self.stop_pct),
            Direction::Short => entry_price * (1.0 + self.stop_pct),
        }
    }

    pub fn is_breached(&self, direction: Direction, entry_price: f64, price: f64) -> bool {
        let stop = self.stop_level(direction, entry_price);
        match direction {
            Direction::Long => price <= stop,
            Direction::Short => price >= stop,
        }
    }
}

impl ExitRule for StopLoss {
    fn name(&self) -> &str {
        "stop_loss"
    }

    fn reason(&self) -> ExitReason {
        ExitReason::StopLoss
    }

    fn should_exit(&self, ctx: &BarContext) -> bool {
        self.is_breached(ctx.direction, ctx.entry_price, ctx.price)
    }
}
