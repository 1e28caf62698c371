//! Crossover entry signals.
//!
//! A generator looks at a close series and marks the bars where a fast line
//! crosses a slow line. Golden crosses (fast moves above slow) open longs,
//! death crosses (fast moves below slow) open shorts. The resulting boolean
//! column is the entry input of the PSL exit generator.
//!
//! ## Concrete implementations
//!
//! - [`MaCrossover`] — fast/slow SMA or EMA
//! - [`MacdCrossover`] — MACD line against its signal line

pub mod ma_crossover;
pub mod macd_crossover;

pub use ma_crossover::{MaCrossover, MaType};
pub use macd_crossover::MacdCrossover;

use serde::{Deserialize, Serialize};

use crate::domain::Direction;

/// Per-bar crossover flags, each the same length as the close series.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Crosses {
    /// Fast crossed above slow on this bar.
    pub golden: Vec<bool>,
    /// Fast crossed below slow on this bar.
    pub death: Vec<bool>,
}

impl Crosses {
    pub fn len(&self) -> usize {
        self.golden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.golden.is_empty()
    }

    /// Entry flags for the given direction.
    pub fn into_entries(self, direction: Direction) -> Vec<bool> {
        match direction {
            Direction::Long => self.golden,
            Direction::Short => self.death,
        }
    }
}

/// Trait for entry signal generators.
///
/// Generators never see positions or exits: entries are a function of the
/// close series alone.
pub trait EntrySignalGenerator: Send + Sync {
    /// Human-readable name (e.g., "ma_crossover").
    fn name(&self) -> &str;

    /// Bars of history required before the first possible cross.
    fn warmup_bars(&self) -> usize;

    /// Detect golden and death crosses over the whole series.
    fn crosses(&self, closes: &[f64]) -> Crosses;

    /// Entry flags for one direction.
    fn entries(&self, closes: &[f64], direction: Direction) -> Vec<bool> {
        self.crosses(closes).into_entries(direction)
    }
}

/// Compare two aligned lines bar by bar.
///
/// Golden at i: `fast[i] > slow[i] && fast[i-1] <= slow[i-1]`.
/// Death at i: `fast[i] < slow[i] && fast[i-1] >= slow[i-1]`.
/// Bar 0 and any bar where one of the four values is NaN never cross.
pub fn detect_crosses(fast: &[f64], slow: &[f64]) -> Crosses {
    let n = fast.len().min(slow.len());
    let mut golden = vec![false; n];
    let mut death = vec![false; n];

    for i in 1..n {
        let (fc, sc, fp, sp) = (fast[i], slow[i], fast[i - 1], slow[i - 1]);
        if fc.is_nan() || sc.is_nan() || fp.is_nan() || sp.is_nan() {
            continue;
        }
        golden[i] = fc > sc && fp <= sp;
        death[i] = fc < sc && fp >= sp;
    }

    Crosses { golden, death }
}
