// Document index collaborator
//
// The core never depends on retrieval. The /doc-chat endpoint goes through
// this trait so a real index can be plugged in behind the same boundary.

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait DocumentIndex: Send + Sync {
    async fn query(&self, text: &str) -> Result<String>;
}

/// Placeholder index used when no document store is configured.
pub struct UnavailableIndex;

#[async_trait]
impl DocumentIndex for UnavailableIndex {
    async fn query(&self, _text: &str) -> Result<String> {
        Ok("Document search functionality is currently unavailable.".to_string())
    }
}
