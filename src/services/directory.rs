use async_trait::async_trait;

use crate::error::AppResult;

/// Fetches a remote people directory page as raw text.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    async fn fetch_page(&self, url: &str) -> AppResult<String>;
}
