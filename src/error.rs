//! Error types for order-book replay.
//!
//! Clean error handling using `thiserror` for ergonomic error definitions.

use crate::types::{Action, Side};
use thiserror::Error;

/// Result type alias for replay operations.
pub type Result<T> = std::result::Result<T, ReplayError>;

/// Main error type for order-book replay.
///
/// All variants are scoped to a single (product, delivery-period)
/// replay. None of them are retryable: each indicates a data-integrity
/// problem in the source log or a caller bug.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplayError {
    /// Add for an order id that is already active on that side.
    #[error("duplicate order: id {order_id} already active on {side} side")]
    DuplicateOrder { order_id: u64, side: Side },

    /// Amend/Remove/Hibernate for an order id absent from the side.
    #[error("order not found: id {order_id} on {side} side")]
    OrderNotFound { order_id: u64, side: Side },

    /// Unknown action code or invalid field in a source record.
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    /// Negative available volume on an order snapshot.
    #[error("invalid volume: {0}")]
    InvalidVolume(i64),

    /// The crossed-book widening search exhausted one side of the book
    /// (or hit its step bound) without finding a non-crossed pair.
    #[error(
        "crossed book unresolved: best_bid={best_bid} >= best_ask={best_ask} \
         after {steps} widening steps"
    )]
    CrossedBookUnresolved {
        best_bid: i64,
        best_ask: i64,
        steps: usize,
    },

    /// A dispatch or recomputation error, wrapped by the replay driver
    /// with the event that triggered it.
    #[error("replay aborted at ts={timestamp}: {action} order {order_id} ({side}): {source}")]
    Replay {
        order_id: u64,
        side: Side,
        action: Action,
        timestamp: i64,
        #[source]
        source: Box<ReplayError>,
    },
}

impl ReplayError {
    /// Wrap this error with the event context the replay driver had in
    /// hand when dispatch failed.
    pub fn in_event(self, order_id: u64, side: Side, action: Action, timestamp: i64) -> Self {
        ReplayError::Replay {
            order_id,
            side,
            action,
            timestamp,
            source: Box::new(self),
        }
    }

    /// The underlying error, unwrapping replay context if present.
    pub fn root_cause(&self) -> &ReplayError {
        match self {
            ReplayError::Replay { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
