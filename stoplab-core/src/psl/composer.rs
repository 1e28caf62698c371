//! PSL exit composer — the forward scan that turns prices and entries into exits.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ExitReset, PslConfig};
use crate::domain::Direction;
use crate::error::PslError;

use super::{
    BarContext, EntryTracker, ExitReason, ExitRule, HoldingPeriodLoss, PositionState, StopLoss,
};

/// Output of one PSL scan. Every vector has one element per input bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitSignal {
    /// True where the PSL logic forces a close.
    pub exits: Vec<bool>,
    /// Rule that fired on each exit bar.
    pub reasons: Vec<Option<ExitReason>>,
    /// Entry in effect on each bar when exits were evaluated.
    pub entry_index_at: Vec<Option<usize>>,
    pub states: Vec<PositionState>,
}

impl ExitSignal {
    fn with_capacity(n: usize) -> Self {
        Self {
            exits: Vec::with_capacity(n),
            reasons: Vec::with_capacity(n),
            entry_index_at: Vec::with_capacity(n),
            states: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.exits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exits.is_empty()
    }

    pub fn exit_count(&self) -> usize {
        self.exits.iter().filter(|&&e| e).count()
    }

    /// Bar indices where an exit fired.
    pub fn exit_bars(&self) -> Vec<usize> {
        self.exits
            .iter()
            .enumerate()
            .filter_map(|(i, &e)| e.then_some(i))
            .collect()
    }

    /// Number of exits attributed to `reason`.
    pub fn count_by_reason(&self, reason: ExitReason) -> usize {
        self.reasons.iter().filter(|r| **r == Some(reason)).count()
    }

    /// The exit column as `{0, 1}`.
    pub fn as_flags(&self) -> Vec<u8> {
        self.exits.iter().map(|&e| u8::from(e)).collect()
    }
}

/// Protective stop-loss exit generator.
///
/// Rules are held in priority order; the stop-loss, when configured, is
/// always evaluated before the holding-period loss cut.
pub struct PslComposer {
    direction: Direction,
    exit_reset: ExitReset,
    holding: HoldingPeriodLoss,
    rules: Vec<Box<dyn ExitRule>>,
}

impl PslComposer {
    pub fn new(config: &PslConfig) -> Result<Self, PslError> {
        config.validate()?;

        let mut rules: Vec<Box<dyn ExitRule>> = Vec::with_capacity(2);
        if let Some(sl) = config.stop_loss {
            rules.push(Box::new(StopLoss::new(sl)?));
        }
        let holding = HoldingPeriodLoss::new(config.holding_period);
        rules.push(Box::new(holding.clone()));

        Ok(Self {
            direction: config.direction,
            exit_reset: config.exit_reset,
            holding,
            rules,
        })
    }

    /// Names of the exit rules in evaluation order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Scan `prices` and `entries` bar by bar and emit the exit column.
    ///
    /// Fails on mismatched lengths, or on an entry bar whose price is zero,
    /// negative or non-finite. No entries at all is valid and yields no exits.
    pub fn run(&self, prices: &[f64], entries: &[bool]) -> Result<ExitSignal, PslError> {
        if prices.len() != entries.len() {
            return Err(PslError::LengthMismatch {
                prices: prices.len(),
                entries: entries.len(),
            });
        }

        let mut out = ExitSignal::with_capacity(prices.len());
        let mut tracker = EntryTracker::new();

        for (i, (&price, &is_entry)) in prices.iter().zip(entries).enumerate() {
            if is_entry && !(price.is_finite() && price > 0.0) {
                return Err(PslError::InvalidEntryPrice { bar: i, price });
            }

            let entry = tracker.on_bar(i, is_entry);
            out.entry_index_at.push(entry);

            let Some(entry_index) = entry else {
                out.states.push(PositionState::Flat);
                out.exits.push(false);
                out.reasons.push(None);
                continue;
            };

            let ctx = BarContext {
                bar_index: i,
                price,
                entry_index,
                entry_price: prices[entry_index],
                direction: self.direction,
            };
            out.states.push(self.state_of(&ctx));

            let reason = self
                .rules
                .iter()
                .find(|rule| rule.should_exit(&ctx))
                .map(|rule| rule.reason());

            if let Some(reason) = reason {
                debug!(
                    bar = i,
                    entry = entry_index,
                    price,
                    reason = reason.as_str(),
                    "psl exit"
                );
                if self.exit_reset == ExitReset::Flat {
                    tracker.clear();
                }
            }
            out.exits.push(reason.is_some());
            out.reasons.push(reason);
        }

        debug!(
            bars = out.len(),
            exits = out.exit_count(),
            direction = %self.direction,
            "psl scan complete"
        );

        Ok(out)
    }

    fn state_of(&self, ctx: &BarContext) -> PositionState {
        if self.holding.is_eligible(ctx.days_held()) {
            PositionState::OpenEligible
        } else {
            PositionState::OpenBeforeEligible
        }
    }
}

/// Build a composer from `config` and run it once.
pub fn generate_exits(
    prices: &[f64],
    entries: &[bool],
    config: &PslConfig,
) -> Result<ExitSignal, PslError> {
    PslComposer::new(config)?.run(prices, entries)
}
