use std::time::Duration;

use crate::viewport::{ColumnLayout, RowMetrics};

pub const DEFAULT_FETCH_LIMIT: usize = 10;
pub const DEFAULT_OVERSCAN: usize = 6;

/// Policy for the transaction detail cache.
///
/// With neither bound set, entries live until explicitly invalidated or the
/// cache is cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub fetch_limit: usize,
    pub max_capacity: Option<u64>,
    pub time_to_live: Option<Duration>
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            fetch_limit: DEFAULT_FETCH_LIMIT,
            max_capacity: None,
            time_to_live: None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    pub cache: CacheSettings,
    pub metrics: RowMetrics,
    pub columns: ColumnLayout,
    /// Rows rendered beyond each edge of the viewport.
    pub overscan: usize
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            cache: CacheSettings::default(),
            metrics: RowMetrics::default(),
            columns: ColumnLayout::default(),
            overscan: DEFAULT_OVERSCAN
        }
    }
}

impl LedgerConfig {
    pub fn with_fetch_limit(mut self, fetch_limit: usize) -> Self {
        self.cache.fetch_limit = fetch_limit.max(1);
        self
    }

    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache.max_capacity = Some(capacity);
        self
    }

    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache.time_to_live = Some(timeout);
        self
    }

    pub fn with_overscan(mut self, rows: usize) -> Self {
        self.overscan = rows;
        self
    }

    pub fn with_metrics(mut self, metrics: RowMetrics) -> Self {
        self.metrics = metrics;
        self
    }
}
