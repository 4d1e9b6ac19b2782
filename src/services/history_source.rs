use async_trait::async_trait;

use crate::domain::revision::{EntryLimit, RevisionEntry};
use crate::error::AppResult;

/// Supplies revision history, most recent entry first.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn fetch_log(&self, limit: EntryLimit) -> AppResult<Vec<RevisionEntry>>;
}
