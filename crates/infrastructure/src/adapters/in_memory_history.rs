//! In-memory analysis history adapter
//!
//! Bounded ring buffer of recent analyses, shared across requests.
//! Contents are lost on restart.

use std::collections::VecDeque;

use application::ports::AnalysisHistoryPort;
use async_trait::async_trait;
use domain::AnalysisRecord;
use parking_lot::RwLock;
use tracing::debug;

/// Default number of analyses kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Ring buffer implementation of `AnalysisHistoryPort`
///
/// Oldest entries are evicted first once `capacity` is reached.
#[derive(Debug)]
pub struct InMemoryAnalysisHistory {
    records: RwLock<VecDeque<AnalysisRecord>>,
    capacity: usize,
}

impl Default for InMemoryAnalysisHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl InMemoryAnalysisHistory {
    /// Capacity 0 is clamped to 1
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }
}

#[async_trait]
impl AnalysisHistoryPort for InMemoryAnalysisHistory {
    async fn record(&self, record: AnalysisRecord) {
        let mut records = self.records.write();
        while records.len() >= self.capacity {
            records.pop_front();
        }
        debug!(reservation_id = %record.reservation_id, "Recording analysis");
        records.push_back(record);
    }

    async fn recent(&self, limit: usize) -> Vec<AnalysisRecord> {
        self.records.read().iter().rev().take(limit).cloned().collect()
    }

    async fn len(&self) -> usize {
        self.records.read().len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
