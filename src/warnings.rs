//! Warning tracking for order-book replay.
//!
//! The crossed-book corrector is a documented best-effort heuristic,
//! not a provable resolution. Rather than failing loudly on every
//! anomaly or losing them in a log stream, the replay driver records
//! each correction here with enough context for later root-cause
//! analysis of a source log.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Category of warning for classification and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningCategory {
    /// A crossed candidate pair was widened before recording
    CrossedBook,

    /// The widening search gave up (side exhausted or step bound hit)
    CrossedBookUnresolved,

    /// Suspicious field values in a source event
    DataQuality,

    /// Other/uncategorized warning
    Other,
}

impl WarningCategory {
    /// Get a human-readable name for the category.
    pub fn name(&self) -> &'static str {
        match self {
            WarningCategory::CrossedBook => "CROSSED_BOOK",
            WarningCategory::CrossedBookUnresolved => "CROSSED_BOOK_UNRESOLVED",
            WarningCategory::DataQuality => "DATA_QUALITY",
            WarningCategory::Other => "OTHER",
        }
    }

    /// Get severity level (1=low, 2=medium, 3=high).
    pub fn severity(&self) -> u8 {
        match self {
            WarningCategory::CrossedBook => 1,
            WarningCategory::CrossedBookUnresolved => 3,
            WarningCategory::DataQuality => 2,
            WarningCategory::Other => 1,
        }
    }
}

/// A single warning record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    /// Warning category
    pub category: WarningCategory,

    /// Human-readable message
    pub message: String,

    /// Event timestamp the warning refers to (data time, not wall time)
    pub data_timestamp: Option<i64>,

    /// Related order id, if applicable
    pub order_id: Option<u64>,

    /// Related fixed-point price, if applicable
    pub price: Option<i64>,
}

impl Warning {
    /// Create a new warning with minimal information.
    pub fn new(category: WarningCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            data_timestamp: None,
            order_id: None,
            price: None,
        }
    }

    /// Set the data timestamp.
    pub fn with_data_timestamp(mut self, ts: i64) -> Self {
        self.data_timestamp = Some(ts);
        self
    }

    /// Set the order id.
    pub fn with_order_id(mut self, order_id: u64) -> Self {
        self.order_id = Some(order_id);
        self
    }

    /// Set the price.
    pub fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }
}

/// Summary statistics for warnings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarningSummary {
    /// Total number of warnings recorded
    pub total: u64,

    /// Count by category name
    pub by_category: HashMap<String, u64>,

    /// Earliest data timestamp seen in a warning
    pub first_timestamp: Option<i64>,

    /// Latest data timestamp seen in a warning
    pub last_timestamp: Option<i64>,
}

/// Warning tracker for one period's replay.
///
/// Stores up to `max_warnings` full records; counts keep accumulating
/// past the cap so the summary stays truthful on pathological logs.
#[derive(Debug, Clone)]
pub struct WarningTracker {
    max_warnings: usize,
    warnings: Vec<Warning>,
    category_counts: HashMap<WarningCategory, u64>,
    first_timestamp: Option<i64>,
    last_timestamp: Option<i64>,
}

impl Default for WarningTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl WarningTracker {
    /// Default cap on retained warning records.
    pub const DEFAULT_MAX_WARNINGS: usize = 100_000;

    /// Create a tracker with the default retention cap.
    pub fn new() -> Self {
        Self::with_max_warnings(Self::DEFAULT_MAX_WARNINGS)
    }

    /// Create a tracker retaining at most `max_warnings` records.
    pub fn with_max_warnings(max_warnings: usize) -> Self {
        Self {
            max_warnings,
            warnings: Vec::new(),
            category_counts: HashMap::new(),
            first_timestamp: None,
            last_timestamp: None,
        }
    }

    /// Record a warning.
    pub fn record(&mut self, warning: Warning) {
        *self.category_counts.entry(warning.category).or_insert(0) += 1;

        if let Some(ts) = warning.data_timestamp {
            if self.first_timestamp.is_none() {
                self.first_timestamp = Some(ts);
            }
            self.last_timestamp = Some(ts);
        }

        if self.warnings.len() < self.max_warnings {
            self.warnings.push(warning);
        }
    }

    /// Number of retained warning records.
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    /// Total recorded count, including records past the retention cap.
    pub fn total_count(&self) -> u64 {
        self.category_counts.values().sum()
    }

    /// Count for a specific category.
    pub fn count_by_category(&self, category: WarningCategory) -> u64 {
        *self.category_counts.get(&category).unwrap_or(&0)
    }

    /// All retained warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Build a summary of everything recorded.
    pub fn summary(&self) -> WarningSummary {
        WarningSummary {
            total: self.total_count(),
            by_category: self
                .category_counts
                .iter()
                .map(|(cat, count)| (cat.name().to_string(), *count))
                .collect(),
            first_timestamp: self.first_timestamp,
            last_timestamp: self.last_timestamp,
        }
    }

    /// Export retained warnings as JSON lines, summary first.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let summary = serde_json::to_string(&self.summary())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        writeln!(writer, "{summary}")?;

        for warning in &self.warnings {
            let line = serde_json::to_string(warning)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(writer, "{line}")?;
        }

        writer.flush()
    }
}
