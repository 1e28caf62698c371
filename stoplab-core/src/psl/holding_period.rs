//! Holding-period loss cut — close an underwater position once it has been
//! held for at least `holding_period` bars.
//!
//! The check is not a one-shot at the threshold bar: an eligible position is
//! re-checked on every later bar, so a late drawdown still closes it.

use super::{BarContext, ExitReason, ExitRule};

#[derive(Debug, Clone)]
pub struct HoldingPeriodLoss {
    /// Minimum bars held before the PnL check activates. Zero checks from the entry bar.
    pub holding_period: usize,
}

impl HoldingPeriodLoss {
    pub fn new(holding_period: usize) -> Self {
        Self { holding_period }
    }

    pub fn is_eligible(&self, days_held: usize) -> bool {
        days_held >= self.holding_period
    }
}

impl ExitRule for HoldingPeriodLoss {
    fn name(&self) -> &str {
        "holding_period_loss"
    }

    fn reason(&self) -> ExitReason {
        ExitReason::HoldingPeriodLoss
    }

    fn should_exit(&self, ctx: &BarContext) -> bool {
        self.is_eligible(ctx.days_held()) && ctx.pnl() < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;

    fn ctx(direction: Direction, bar_index: usize, price: f64) -> BarContext {
        BarContext {
            bar_index,
            price,
            entry_index: 10,
            entry_price: 100.0,
            direction,
        }
    }

    #[test]
    fn holds_before_period() {
        let rule = HoldingPeriodLoss::new(5);
        assert!(!rule.should_exit(&ctx(Direction::Long, 14, 80.0)));
    }

    #[test]
    fn exits_at_period_when_underwater() {
        let rule = HoldingPeriodLoss::new(5);
        assert!(rule.should_exit(&ctx(Direction::Long, 15, 99.0)));
    }

    #[test]
    fn keeps_checking_after_period() {
        let rule = HoldingPeriodLoss::new(5);
        assert!(!rule.should_exit(&ctx(Direction::Long, 15, 101.0)));
        assert!(rule.should_exit(&ctx(Direction::Long, 40, 99.9)));
    }

    #[test]
    fn flat_pnl_is_not_a_loss() {
        let rule = HoldingPeriodLoss::new(0);
        assert!(!rule.should_exit(&ctx(Direction::Long, 10, 100.0)));
    }

    #[test]
    fn short_loses_when_price_rises() {
        let rule = HoldingPeriodLoss::new(2);
        assert!(rule.should_exit(&ctx(Direction::Short, 12, 101.0)));
        assert!(!rule.should_exit(&ctx(Direction::Short, 12, 99.0)));
    }
}
