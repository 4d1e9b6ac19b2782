use async_trait::async_trait;

/// Turns an author handle into a display identity. Never fails: a handle
/// nobody knows about is returned unchanged.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn resolve(&self, handle: &str) -> String;
}
