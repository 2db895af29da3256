//! Order-book state machine.
//!
//! This module provides the per-side order partition, the change-only
//! feature state and the book that composes them.

pub mod features;
pub mod order_book;
mod order_set;

pub use features::{FeatureSnapshot, FeatureState, TimeSeries};
pub use order_book::{BookConfig, OrderBook, RecomputeOutcome, MAX_WIDEN_STEPS};
pub use order_set::OrderSet;
