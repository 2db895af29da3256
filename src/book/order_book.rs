//! Single-period order book.
//!
//! Composes one [`OrderSet`] per side with a [`FeatureState`] and
//! exposes the two entry points the replay driver uses: `apply` for
//! action dispatch and `recompute` for feature recomputation with
//! crossed-book resolution.
//!
//! One book is created per (product, delivery-period) pair, mutated
//! only by that pair's events in sequence order, and retired once the
//! log is exhausted.

use crate::book::features::{FeatureSnapshot, FeatureState};
use crate::book::order_set::OrderSet;
use crate::error::{ReplayError, Result};
use crate::types::{Action, OrderEvent, Side, FIXED_POINT_SCALE};

/// Upper bound on crossed-book widening steps.
///
/// The widening search is a best-effort heuristic against transient
/// intra-batch crossings; on a degenerate active set it could otherwise
/// walk an entire side. Exceeding the bound fails the recomputation
/// with [`ReplayError::CrossedBookUnresolved`].
pub const MAX_WIDEN_STEPS: usize = 128;

/// Configuration for order book behavior.
#[derive(Debug, Clone)]
pub struct BookConfig {
    /// Maximum widening steps before the crossed-book resolver gives up
    pub max_widen_steps: usize,

    /// Whether to log crossed-book corrections
    pub log_warnings: bool,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            max_widen_steps: MAX_WIDEN_STEPS,
            log_warnings: true,
        }
    }
}

impl BookConfig {
    /// Set the widening step bound.
    pub fn with_max_widen_steps(mut self, steps: usize) -> Self {
        self.max_widen_steps = steps;
        self
    }

    /// Enable/disable warning logs.
    pub fn with_logging(mut self, log: bool) -> Self {
        self.log_warnings = log;
        self
    }
}

/// What a call to [`OrderBook::recompute`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeOutcome {
    /// One or both active sides were empty; scalars and series untouched
    SkippedEmptySide,

    /// A snapshot was recorded
    Recorded {
        /// True if the candidate pair was crossed and widening resolved it
        resolved_crossed: bool,
    },
}

/// Order book for one (product, delivery-period) pair.
#[derive(Debug, Clone)]
pub struct OrderBook {
    config: BookConfig,

    buys: OrderSet,
    sells: OrderSet,

    features: FeatureState,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create an empty book with default configuration.
    pub fn new() -> Self {
        Self::with_config(BookConfig::default())
    }

    /// Create an empty book with custom configuration.
    pub fn with_config(config: BookConfig) -> Self {
        Self {
            config,
            buys: OrderSet::new(Side::Buy),
            sells: OrderSet::new(Side::Sell),
            features: FeatureState::new(),
        }
    }

    /// Apply one lifecycle event to the targeted side.
    ///
    /// Dispatch is a static `match` on the action enum; each arm is one
    /// of the four pure [`OrderSet`] operations. A failed dispatch
    /// leaves the book unchanged.
    pub fn apply(&mut self, event: &OrderEvent) -> Result<()> {
        event.validate()?;

        let side = self.side_mut(event.side);
        match event.action {
            Action::Add => side.insert(event.order()),
            Action::Amend => side.amend(event.order()),
            Action::Remove => side.remove(event.order_id).map(|_| ()),
            Action::Hibernate => side.hibernate(event.order()),
        }
    }

    /// Recompute the feature scalars from the active sets.
    ///
    /// Skipped entirely while either active side is empty. A crossed
    /// candidate pair (best_bid >= best_ask) is treated as a transient
    /// artifact of intra-batch ordering and resolved by widening before
    /// anything is recorded, so a stored spread is never negative.
    pub fn recompute(&mut self, timestamp: i64) -> Result<RecomputeOutcome> {
        let (bid, ask) = match (self.buys.best_active_price(), self.sells.best_active_price()) {
            (Some(bid), Some(ask)) => (bid, ask),
            _ => return Ok(RecomputeOutcome::SkippedEmptySide),
        };

        let resolved_crossed = bid >= ask;
        let (bid, ask) = if resolved_crossed {
            let widened = self.resolve_crossed(bid, ask)?;
            if self.config.log_warnings {
                log::warn!(
                    "crossed book at ts={}: bid={:.4} >= ask={:.4}, widened to bid={:.4} ask={:.4}",
                    timestamp,
                    bid as f64 / FIXED_POINT_SCALE as f64,
                    ask as f64 / FIXED_POINT_SCALE as f64,
                    widened.0 as f64 / FIXED_POINT_SCALE as f64,
                    widened.1 as f64 / FIXED_POINT_SCALE as f64,
                );
            }
            widened
        } else {
            (bid, ask)
        };

        self.features
            .record(timestamp, FeatureSnapshot::from_best_prices(bid, ask));

        Ok(RecomputeOutcome::Recorded { resolved_crossed })
    }

    /// Resolve a crossed candidate pair by widening one side.
    ///
    /// If the candidate best bid differs from the previously stored
    /// one, the bid moved: keep it and walk successively worse asks
    /// until the pair uncrosses. Otherwise the ask moved: keep it and
    /// walk successively worse bids. A best-effort heuristic, not a
    /// provable resolution; bounded by `max_widen_steps`.
    fn resolve_crossed(&self, bid: i64, ask: i64) -> Result<(i64, i64)> {
        let prev_bid = self.features.current().map(|c| c.best_bid);
        let bid_changed = prev_bid != Some(bid);

        let mut steps = 0;
        if bid_changed {
            // Keep the new bid, search 2nd-best, 3rd-best, ... asks.
            for &candidate in &self.sells.active_prices_best_first() {
                if candidate > bid {
                    return Ok((bid, candidate));
                }
                steps += 1;
                if steps >= self.config.max_widen_steps {
                    break;
                }
            }
        } else {
            // Keep the new ask, search successively worse bids.
            for &candidate in &self.buys.active_prices_best_first() {
                if candidate < ask {
                    return Ok((candidate, ask));
                }
                steps += 1;
                if steps >= self.config.max_widen_steps {
                    break;
                }
            }
        }

        Err(ReplayError::CrossedBookUnresolved {
            best_bid: bid,
            best_ask: ask,
            steps,
        })
    }

    /// The order set for one side.
    pub fn side(&self, side: Side) -> &OrderSet {
        match side {
            Side::Buy => &self.buys,
            Side::Sell => &self.sells,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut OrderSet {
        match side {
            Side::Buy => &mut self.buys,
            Side::Sell => &mut self.sells,
        }
    }

    /// Current best bid, if the buy side has active orders.
    #[inline]
    pub fn best_bid(&self) -> Option<i64> {
        self.buys.best_active_price()
    }

    /// Current best ask, if the sell side has active orders.
    #[inline]
    pub fn best_ask(&self) -> Option<i64> {
        self.sells.best_active_price()
    }

    /// The feature scalars and series accumulated so far.
    pub fn features(&self) -> &FeatureState {
        &self.features
    }

    /// Consume the book, handing the finished features to the caller.
    pub fn into_features(self) -> FeatureState {
        self.features
    }

    /// Total number of orders held (active + hibernated, both sides).
    pub fn order_count(&self) -> usize {
        self.buys.active_len()
            + self.buys.hibernated_len()
            + self.sells.active_len()
            + self.sells.hibernated_len()
    }
}
