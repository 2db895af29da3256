//! Core data types for order lifecycle events and book-held orders.
//!
//! These types are designed to be:
//! - Memory efficient (fixed-size fields, `Copy` records)
//! - Free of floating point on the replay hot path (fixed-point i64)
//! - Independent of any particular exchange feed format

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-point scale for prices and volumes.
///
/// A price of 10.5 EUR/MWh is stored as `10_500_000_000`. Divide by
/// this scale for display. Prices may be negative (continuous intraday
/// power markets trade through zero); volumes may not.
pub const FIXED_POINT_SCALE: i64 = 1_000_000_000;

/// Canonical order lifecycle action.
///
/// The raw source vocabulary carries several codes per canonical
/// action; [`Action::from_code`] folds them down. Dispatch on this enum
/// is a static `match`, resolved at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    /// Insert a new order into the active set
    Add = b'A',
    /// Replace an existing order snapshot wholesale
    Amend = b'C',
    /// Delete an order from the book
    Remove = b'D',
    /// Set an active order aside without deleting it
    Hibernate = b'H',
}

impl Action {
    /// Fold a raw action code onto the canonical action.
    ///
    /// The source log vocabulary: `A` adds; `C`, `P` and `I` amend;
    /// `D`, `M` and `X` remove; `H` hibernates. Unknown codes map to
    /// `None` and should surface as a malformed-event error upstream.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            b'A' => Some(Action::Add),
            b'C' | b'P' | b'I' => Some(Action::Amend),
            b'D' | b'M' | b'X' => Some(Action::Remove),
            b'H' => Some(Action::Hibernate),
            _ => None,
        }
    }

    /// Like [`Action::from_code`], but an unknown code is a
    /// [`ReplayError::MalformedEvent`](crate::error::ReplayError).
    pub fn try_from_code(code: u8) -> crate::error::Result<Self> {
        Self::from_code(code).ok_or_else(|| {
            crate::error::ReplayError::MalformedEvent(format!(
                "unknown action code {:?}",
                code as char
            ))
        })
    }

    /// Canonical single-byte representation.
    pub fn to_code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Add => "ADD",
            Action::Amend => "AMEND",
            Action::Remove => "REMOVE",
            Action::Hibernate => "HIBERNATE",
        };
        f.write_str(name)
    }
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Buy order (bid)
    Buy = b'B',
    /// Sell order (ask)
    Sell = b'S',
}

impl Side {
    /// Parse side from a byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'B' => Some(Side::Buy),
            b'S' => Some(Side::Sell),
            _ => None,
        }
    }

    /// Convert to byte representation.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Check if this is the buy side.
    #[inline(always)]
    pub fn is_buy(self) -> bool {
        matches!(self, Side::Buy)
    }

    /// The opposing side.
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        })
    }
}

/// One order lifecycle event, pre-parsed by the ingestion collaborator.
///
/// Events for one (product, delivery-period) pair arrive strictly in
/// timestamp order, original arrival order within a timestamp. The
/// replay core relies on that guarantee absolutely and never reorders
/// across timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Stable surrogate order identifier, reused across amendments
    pub order_id: u64,

    /// Order side
    pub side: Side,

    /// Canonical lifecycle action
    pub action: Action,

    /// Price in fixed-point units (may be negative)
    pub price: i64,

    /// Available volume in fixed-point units (non-negative)
    pub volume: i64,

    /// Transaction timestamp (nanoseconds since epoch); the opaque
    /// comparable token produced by ingestion
    pub timestamp: i64,
}

impl OrderEvent {
    /// Create a new order event.
    pub fn new(
        order_id: u64,
        side: Side,
        action: Action,
        price: i64,
        volume: i64,
        timestamp: i64,
    ) -> Self {
        Self {
            order_id,
            side,
            action,
            price,
            volume,
            timestamp,
        }
    }

    /// Get price as floating point currency units.
    #[inline]
    pub fn price_as_f64(&self) -> f64 {
        self.price as f64 / FIXED_POINT_SCALE as f64
    }

    /// Validate the event fields.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ReplayError;

        if self.volume < 0 {
            return Err(ReplayError::InvalidVolume(self.volume));
        }

        Ok(())
    }

    /// The order snapshot this event carries.
    #[inline]
    pub fn order(&self) -> Order {
        Order {
            id: self.order_id,
            price: self.price,
            volume: self.volume,
        }
    }
}

/// Immutable snapshot of one order as held by the book.
///
/// Replaced wholesale on amendment, never mutated field-by-field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Stable surrogate order id
    pub id: u64,

    /// Price in fixed-point units
    pub price: i64,

    /// Available volume in fixed-point units
    pub volume: i64,
}

impl Order {
    /// Create a new order snapshot.
    pub fn new(id: u64, price: i64, volume: i64) -> Self {
        Self { id, price, volume }
    }

    /// Get price as floating point currency units.
    #[inline]
    pub fn price_as_f64(&self) -> f64 {
        self.price as f64 / FIXED_POINT_SCALE as f64
    }
}
