//! Event source abstraction for replay input.
//!
//! The replay core never reads files: raw log parsing, product
//! filtering, period grouping, action-code mapping and timestamp
//! conversion all belong to the ingestion collaborator. This trait is
//! the seam between the two: any ingestion backend that can yield a
//! time-ordered `OrderEvent` sequence plugs into
//! [`crate::replay::replay_source`] without the core changing.

use crate::error::Result;
use crate::types::OrderEvent;

/// Metadata about an event source.
///
/// Useful for logging, labeling per-period outputs and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct SourceMetadata {
    /// Traded product name (e.g. "GB_Half_Hour_Power")
    pub product: Option<String>,

    /// Delivery/settlement period start (e.g. "2024-01-26T08:30:00Z")
    pub delivery_start: Option<String>,

    /// Data provider name
    pub provider: Option<String>,

    /// Estimated event count (for progress tracking)
    pub estimated_events: Option<u64>,
}

impl SourceMetadata {
    /// Create new empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the product name.
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    /// Set the delivery period start.
    pub fn with_delivery_start(mut self, delivery_start: impl Into<String>) -> Self {
        self.delivery_start = Some(delivery_start.into());
        self
    }

    /// Set the provider.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Set the estimated event count.
    pub fn with_estimated_events(mut self, count: u64) -> Self {
        self.estimated_events = Some(count);
        self
    }
}

/// A source of order lifecycle events for one (product, period) pair.
///
/// Implementations must yield events in timestamp order, original
/// arrival order within a timestamp; the replay core relies on that
/// guarantee and never reorders.
pub trait EventSource {
    /// Iterator over the source's events.
    type EventIter: Iterator<Item = OrderEvent>;

    /// Consume the source, yielding its events.
    fn events(self) -> Result<Self::EventIter>;

    /// Metadata about this source.
    fn metadata(&self) -> &SourceMetadata;
}

/// In-memory event source, mainly for tests and pre-loaded sequences.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    events: Vec<OrderEvent>,
    metadata: SourceMetadata,
}

impl VecSource {
    /// Create a source over a pre-ordered event vector.
    pub fn new(events: Vec<OrderEvent>) -> Self {
        let metadata = SourceMetadata::new().with_estimated_events(events.len() as u64);
        Self { events, metadata }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: SourceMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Number of events held.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the source holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSource for VecSource {
    type EventIter = std::vec::IntoIter<OrderEvent>;

    fn events(self) -> Result<Self::EventIter> {
        Ok(self.events.into_iter())
    }

    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }
}
