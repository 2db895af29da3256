//! Change-only book feature state and time series.
//!
//! Five scalars summarize the book after each recomputation: best bid,
//! best ask, spread, mid-price and relative spread. Each scalar has a
//! parallel append-only series of `(timestamp, value)` points that is
//! recorded change-only: a recomputation that leaves a scalar at its
//! previous value appends nothing to that scalar's series. Downstream
//! trade-cost analytics rely on this compactness for long logs.

use serde::{Deserialize, Serialize};

use crate::types::FIXED_POINT_SCALE;

/// Append-only, change-only series of `(timestamp, value)` points.
///
/// Timestamps are strictly increasing: the replay driver recomputes at
/// most once per timestamp group. No two adjacent points carry equal
/// values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries<T> {
    points: Vec<(i64, T)>,
}

impl<T: Copy + PartialEq> TimeSeries<T> {
    /// Create an empty series.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Append `(timestamp, value)` unless `value` equals the last
    /// recorded value. Returns true if the point was recorded.
    pub fn push_if_changed(&mut self, timestamp: i64, value: T) -> bool {
        if let Some(&(_, last)) = self.points.last() {
            if last == value {
                return false;
            }
        }
        self.points.push((timestamp, value));
        true
    }

    /// The most recent recorded value.
    pub fn last(&self) -> Option<T> {
        self.points.last().map(|&(_, v)| v)
    }

    /// The value in effect at `timestamp`: the last point recorded at
    /// or before it. `None` before the first point.
    ///
    /// This is the lookup the trade-cost collaborator performs against
    /// the mid-price series for each execution time.
    pub fn at_or_before(&self, timestamp: i64) -> Option<T> {
        let idx = self.points.partition_point(|&(ts, _)| ts <= timestamp);
        if idx == 0 {
            None
        } else {
            Some(self.points[idx - 1].1)
        }
    }

    /// All recorded points in timestamp order.
    pub fn points(&self) -> &[(i64, T)] {
        &self.points
    }

    /// Number of recorded points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The five book-summary scalars at one instant.
///
/// Only constructed from a resolved (non-crossed) best bid/ask pair,
/// so `spread` is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    /// Highest active buy price (fixed-point)
    pub best_bid: i64,

    /// Lowest active sell price (fixed-point)
    pub best_ask: i64,

    /// `best_ask - best_bid` (fixed-point)
    pub spread: i64,

    /// `best_bid + spread / 2` (fixed-point)
    pub mid: i64,

    /// `100 * spread / mid` in percent; 0.0 when mid is zero
    pub relative_spread: f64,
}

impl FeatureSnapshot {
    /// Derive the five scalars from a resolved best bid/ask pair.
    pub fn from_best_prices(best_bid: i64, best_ask: i64) -> Self {
        let spread = best_ask - best_bid;
        let mid = best_bid + spread / 2;
        let relative_spread = if mid == 0 {
            0.0
        } else {
            100.0 * spread as f64 / mid as f64
        };

        Self {
            best_bid,
            best_ask,
            spread,
            mid,
            relative_spread,
        }
    }

    /// Mid-price as floating point currency units.
    #[inline]
    pub fn mid_as_f64(&self) -> f64 {
        self.mid as f64 / FIXED_POINT_SCALE as f64
    }

    /// Spread as floating point currency units.
    #[inline]
    pub fn spread_as_f64(&self) -> f64 {
        self.spread as f64 / FIXED_POINT_SCALE as f64
    }
}

/// Current scalars plus their five change-only series.
///
/// `current()` is `None` until the first recomputation over a book
/// with both sides populated; there are no sentinel defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureState {
    current: Option<FeatureSnapshot>,

    best_bid: TimeSeries<i64>,
    best_ask: TimeSeries<i64>,
    spread: TimeSeries<i64>,
    mid: TimeSeries<i64>,
    relative_spread: TimeSeries<f64>,
}

impl FeatureState {
    /// Create an empty feature state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The scalars as of the last recomputation, if any.
    #[inline]
    pub fn current(&self) -> Option<&FeatureSnapshot> {
        self.current.as_ref()
    }

    /// Record a freshly computed snapshot at `timestamp`.
    ///
    /// Each of the five scalars is compared with its stored value
    /// independently; only changed scalars gain a series point.
    pub(crate) fn record(&mut self, timestamp: i64, snapshot: FeatureSnapshot) {
        self.best_bid.push_if_changed(timestamp, snapshot.best_bid);
        self.best_ask.push_if_changed(timestamp, snapshot.best_ask);
        self.spread.push_if_changed(timestamp, snapshot.spread);
        self.mid.push_if_changed(timestamp, snapshot.mid);
        self.relative_spread
            .push_if_changed(timestamp, snapshot.relative_spread);

        self.current = Some(snapshot);
    }

    /// Best-bid series.
    pub fn best_bid_series(&self) -> &TimeSeries<i64> {
        &self.best_bid
    }

    /// Best-ask series.
    pub fn best_ask_series(&self) -> &TimeSeries<i64> {
        &self.best_ask
    }

    /// Spread series.
    pub fn spread_series(&self) -> &TimeSeries<i64> {
        &self.spread
    }

    /// Mid-price series.
    pub fn mid_series(&self) -> &TimeSeries<i64> {
        &self.mid
    }

    /// Relative-spread series (percent).
    pub fn relative_spread_series(&self) -> &TimeSeries<f64> {
        &self.relative_spread
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FIXED_POINT_SCALE;

    const EUR: i64 = FIXED_POINT_SCALE;

    #[test]
    fn test_series_change_only() {
        let mut series = TimeSeries::new();

        assert!(series.push_if_changed(1, 10));
        assert!(!series.push_if_changed(2, 10));
        assert!(series.push_if_changed(3, 12));
        assert!(!series.push_if_changed(4, 12));
        assert!(series.push_if_changed(5, 10));

        assert_eq!(series.points(), &[(1, 10), (3, 12), (5, 10)]);
        assert_eq!(series.last(), Some(10));
    }

    #[test]
    fn test_series_no_adjacent_duplicates() {
        let mut series = TimeSeries::new();
        for (ts, v) in [(1, 5), (2, 5), (3, 7), (4, 7), (5, 5), (6, 5)] {
            series.push_if_changed(ts, v);
        }
        for pair in series.points().windows(2) {
            assert_ne!(pair[0].1, pair[1].1);
        }
    }

    #[test]
    fn test_series_at_or_before() {
        let mut series = TimeSeries::new();
        series.push_if_changed(10, 1);
        series.push_if_changed(20, 2);
        series.push_if_changed(30, 3);

        assert_eq!(series.at_or_before(5), None);
        assert_eq!(series.at_or_before(10), Some(1));
        assert_eq!(series.at_or_before(19), Some(1));
        assert_eq!(series.at_or_before(20), Some(2));
        assert_eq!(series.at_or_before(1_000), Some(3));
    }

    #[test]
    fn test_snapshot_derivation() {
        // bid 10, ask 12: spread 2, mid 11, relative 100*2/11.
        let snap = FeatureSnapshot::from_best_prices(10 * EUR, 12 * EUR);

        assert_eq!(snap.spread, 2 * EUR);
        assert_eq!(snap.mid, 11 * EUR);
        assert!((snap.relative_spread - 18.1818).abs() < 1e-3);
        assert_eq!(snap.mid_as_f64(), 11.0);
        assert_eq!(snap.spread_as_f64(), 2.0);
    }

    #[test]
    fn test_snapshot_zero_mid() {
        // bid -2, ask 2: mid 0, relative spread defined as 0.
        let snap = FeatureSnapshot::from_best_prices(-2 * EUR, 2 * EUR);

        assert_eq!(snap.mid, 0);
        assert_eq!(snap.spread, 4 * EUR);
        assert_eq!(snap.relative_spread, 0.0);
    }

    #[test]
    fn test_snapshot_negative_prices() {
        // Both sides negative: spread still positive.
        let snap = FeatureSnapshot::from_best_prices(-12 * EUR, -10 * EUR);

        assert_eq!(snap.spread, 2 * EUR);
        assert_eq!(snap.mid, -11 * EUR);
    }

    #[test]
    fn test_feature_state_records_independently() {
        let mut state = FeatureState::new();

        state.record(1, FeatureSnapshot::from_best_prices(10 * EUR, 12 * EUR));
        // Bid improves, ask unchanged: ask series must not grow.
        state.record(2, FeatureSnapshot::from_best_prices(11 * EUR, 12 * EUR));

        assert_eq!(state.best_bid_series().len(), 2);
        assert_eq!(state.best_ask_series().len(), 1);
        assert_eq!(state.spread_series().len(), 2);
        assert_eq!(state.mid_series().len(), 2);
        assert_eq!(state.relative_spread_series().len(), 2);

        let current = state.current().unwrap();
        assert_eq!(current.best_bid, 11 * EUR);
        assert_eq!(current.best_ask, 12 * EUR);
    }

    #[test]
    fn test_feature_state_identical_snapshot_appends_nothing() {
        let mut state = FeatureState::new();
        let snap = FeatureSnapshot::from_best_prices(10 * EUR, 12 * EUR);

        state.record(1, snap);
        state.record(2, snap);

        assert_eq!(state.best_bid_series().len(), 1);
        assert_eq!(state.best_ask_series().len(), 1);
        assert_eq!(state.spread_series().len(), 1);
        assert_eq!(state.mid_series().len(), 1);
        assert_eq!(state.relative_spread_series().len(), 1);
    }
}
