//! # lob-replay
//!
//! Order-book replay for continuous intraday markets: reconstructs the
//! evolving best bid/ask state of a limit order book from a
//! time-ordered log of order lifecycle events and emits compact,
//! change-only feature time series for downstream implicit-trade-cost
//! analytics.
//!
//! ## Features
//!
//! - **Order lifecycle replay**: add / amend / remove / hibernate
//!   dispatch, O(1) per event
//! - **Hibernated orders**: set-aside orders are retained but never
//!   influence best prices
//! - **Change-only feature series**: best bid, best ask, spread,
//!   mid-price and relative spread, recorded only when they change
//! - **Crossed-book resolution**: transient bid >= ask artifacts are
//!   widened away before anything is recorded, with a bounded fallback
//! - **Dirty-check recomputation**: timestamp groups that cannot move
//!   a best price skip feature recomputation entirely
//! - **Parallel periods**: independent delivery periods replay on
//!   their own worker threads, failures isolated per period
//!
//! ## Quick Start
//!
//! ```rust
//! use lob_replay::{replay, Action, OrderEvent, Side, FIXED_POINT_SCALE};
//!
//! const EUR: i64 = FIXED_POINT_SCALE;
//!
//! // A pre-ordered event log for one (product, period) pair.
//! let events = vec![
//!     OrderEvent::new(1, Side::Buy, Action::Add, 10 * EUR, EUR, 1_000),
//!     OrderEvent::new(2, Side::Sell, Action::Add, 12 * EUR, 3 * EUR, 1_000),
//!     OrderEvent::new(1, Side::Buy, Action::Amend, 11 * EUR, EUR, 2_000),
//! ];
//!
//! let book = replay(events)?;
//!
//! let features = book.features();
//! let current = features.current().expect("both sides populated");
//! assert_eq!(current.best_bid, 11 * EUR);
//! assert_eq!(current.spread, 1 * EUR);
//!
//! // Series are change-only: two snapshots, two bid points, but the
//! // ask never moved so its series has a single point.
//! assert_eq!(features.best_bid_series().len(), 2);
//! assert_eq!(features.best_ask_series().len(), 1);
//! # Ok::<(), lob_replay::ReplayError>(())
//! ```
//!
//! ### Parallel Multi-Period Replay
//!
//! ```rust
//! use lob_replay::{replay_periods, PeriodEvents, SourceMetadata};
//! use lob_replay::{Action, OrderEvent, Side, FIXED_POINT_SCALE};
//!
//! const EUR: i64 = FIXED_POINT_SCALE;
//!
//! let periods = vec![PeriodEvents::new(
//!     SourceMetadata::new()
//!         .with_product("GB_Half_Hour_Power")
//!         .with_delivery_start("2024-01-26T08:30:00Z"),
//!     vec![
//!         OrderEvent::new(1, Side::Buy, Action::Add, 40 * EUR, EUR, 1_000),
//!         OrderEvent::new(2, Side::Sell, Action::Add, 44 * EUR, EUR, 1_000),
//!     ],
//! )];
//!
//! for outcome in replay_periods(periods) {
//!     let features = outcome.result.expect("period replayed");
//!     assert_eq!(features.current().unwrap().mid, 42 * EUR);
//! }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Core types: `OrderEvent`, `Order`, `Action`, `Side` |
//! | [`book`] | Book state machine: `OrderBook`, `OrderSet`, `FeatureState` |
//! | [`replay`] | Replay driver: `ReplayDriver`, `ReplayStats` |
//! | [`multi_period`] | Parallel per-period replay |
//! | [`source`] | Event source seam: `EventSource`, `VecSource` |
//! | [`warnings`] | Warning tracking: `WarningTracker`, `Warning` |
//!
//! ## What this crate does not do
//!
//! Raw log parsing, product filtering, period grouping, action-code
//! vocabulary mapping and timestamp conversion belong to the ingestion
//! collaborator; trade-cost computation, visualization and CLI
//! orchestration consume the produced series. The book tracks no
//! price-level depth and performs no queue-priority matching.

pub mod book;
pub mod error;
pub mod multi_period;
pub mod replay;
pub mod source;
pub mod types;
pub mod warnings;

// Re-exports - Core types
pub use error::{ReplayError, Result};
pub use types::{Action, Order, OrderEvent, Side, FIXED_POINT_SCALE};

// Re-exports - Book state machine
pub use book::{
    BookConfig, FeatureSnapshot, FeatureState, OrderBook, OrderSet, RecomputeOutcome, TimeSeries,
    MAX_WIDEN_STEPS,
};

// Re-exports - Replay
pub use replay::{replay, replay_source, ReplayDriver, ReplayStats};

// Re-exports - Multi-period
pub use multi_period::{replay_periods, PeriodEvents, PeriodOutcome};

// Re-exports - Source abstraction
pub use source::{EventSource, SourceMetadata, VecSource};

// Re-exports - Warnings
pub use warnings::{Warning, WarningCategory, WarningSummary, WarningTracker};
