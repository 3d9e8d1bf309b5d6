//! Analysis history port
//!
//! Bounded store of recent analyses. When full, the oldest entry is evicted.

use async_trait::async_trait;
use domain::AnalysisRecord;
#[cfg(test)]
use mockall::automock;

/// Port for the recent-analysis history
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AnalysisHistoryPort: Send + Sync {
    /// Append a record, evicting the oldest one when at capacity
    async fn record(&self, record: AnalysisRecord);

    /// Up to `limit` records, newest first
    async fn recent(&self, limit: usize) -> Vec<AnalysisRecord>;

    /// Number of stored records
    async fn len(&self) -> usize;

    /// Maximum number of stored records
    fn capacity(&self) -> usize;
}
