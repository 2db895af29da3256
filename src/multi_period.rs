//! Parallel replay across independent delivery periods.
//!
//! Distinct periods share no state and are embarrassingly parallel:
//! each gets its own [`ReplayDriver`] on its own scoped worker thread,
//! no locking anywhere. One period's failure is captured in its
//! outcome; sibling periods run to completion regardless.

use std::thread;

use crate::book::FeatureState;
use crate::error::Result;
use crate::replay::{ReplayDriver, ReplayStats};
use crate::source::SourceMetadata;
use crate::types::OrderEvent;
use crate::warnings::WarningSummary;

/// One period's pre-partitioned, pre-ordered event sequence.
#[derive(Debug, Clone)]
pub struct PeriodEvents {
    /// Which (product, delivery-period) pair this sequence belongs to
    pub metadata: SourceMetadata,

    /// Events in timestamp order, arrival order within a timestamp
    pub events: Vec<OrderEvent>,
}

impl PeriodEvents {
    /// Create a period's event sequence.
    pub fn new(metadata: SourceMetadata, events: Vec<OrderEvent>) -> Self {
        Self { metadata, events }
    }
}

/// What one period's replay produced.
#[derive(Debug)]
pub struct PeriodOutcome {
    /// The period this outcome belongs to
    pub metadata: SourceMetadata,

    /// Finished feature state, or the error that aborted the replay
    pub result: Result<FeatureState>,

    /// Replay counters (partial if the replay aborted)
    pub stats: ReplayStats,

    /// Warning summary for this period
    pub warnings: WarningSummary,
}

impl PeriodOutcome {
    /// True if this period replayed to completion.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Replay one period's events to completion.
fn replay_one(period: PeriodEvents) -> PeriodOutcome {
    let PeriodEvents { metadata, events } = period;

    let mut driver = ReplayDriver::new();
    let run = driver.run(events);

    let stats = driver.stats().clone();
    let warnings = driver.warnings().summary();

    let result = match run {
        Ok(()) => {
            log::info!(
                "period {:?}: {} events, {} recomputes, {} dirty skips",
                metadata.delivery_start,
                stats.events_processed,
                stats.recomputes,
                stats.dirty_skips,
            );
            Ok(driver.into_book().into_features())
        }
        Err(err) => {
            log::error!("period {:?} aborted: {err}", metadata.delivery_start);
            Err(err)
        }
    };

    PeriodOutcome {
        metadata,
        result,
        stats,
        warnings,
    }
}

/// Replay many periods in parallel, one worker thread per period.
///
/// Outcomes are returned in input order, joined before returning. The
/// caller decides whether a failed period is fatal for the run.
pub fn replay_periods(periods: Vec<PeriodEvents>) -> Vec<PeriodOutcome> {
    thread::scope(|scope| {
        let handles: Vec<_> = periods
            .into_iter()
            .map(|period| scope.spawn(move || replay_one(period)))
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("period replay worker panicked"))
            .collect()
    })
}
