use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::IdentityCache;
use crate::config::DirectoryUrls;
use crate::identity::sources::{IdentitySource, MaintainerListSource, ProfileSource};
use crate::services::{DirectoryService, IdentityService};

/// Resolves handles by asking each source in turn; the first answer wins.
pub struct IdentityResolver {
    sources: Vec<Box<dyn IdentitySource>>,
    cache: Arc<IdentityCache>,
}

impl IdentityResolver {
    pub fn new(sources: Vec<Box<dyn IdentitySource>>, cache: Arc<IdentityCache>) -> Self {
        Self { sources, cache }
    }

    /// Trusted users, developers, package maintainers, fellows; in that order.
    pub fn for_directories(
        urls: &DirectoryUrls,
        directory: Arc<dyn DirectoryService>,
        cache: Arc<IdentityCache>,
    ) -> Self {
        let sources: Vec<Box<dyn IdentitySource>> = vec![
            Box::new(ProfileSource::new(
                "trusted users",
                urls.trusted_users.clone(),
                directory.clone(),
            )),
            Box::new(ProfileSource::new(
                "developers",
                urls.developers.clone(),
                directory.clone(),
            )),
            Box::new(MaintainerListSource::new(
                urls.packages.clone(),
                vec![urls.trusted_users.clone(), urls.developers.clone()],
                directory.clone(),
            )),
            Box::new(ProfileSource::new("fellows", urls.fellows.clone(), directory)),
        ];
        Self::new(sources, cache)
    }

    async fn lookup(&self, handle: &str) -> Option<String> {
        if handle.trim().is_empty() {
            return None;
        }
        for source in &self.sources {
            debug!(handle, source = source.label(), "looking up handle");
            if let Some(identity) = source.attempt(handle).await {
                debug!(handle, source = source.label(), %identity, "handle resolved");
                return Some(identity);
            }
        }
        None
    }
}

#[async_trait]
impl IdentityService for IdentityResolver {
    async fn resolve(&self, handle: &str) -> String {
        if let Some(identity) = self.cache.get(handle) {
            return identity;
        }

        let identity = match self.lookup(handle).await {
            Some(identity) => identity,
            None => {
                debug!(handle, "no directory knows this handle, keeping it as is");
                handle.to_string()
            }
        };
        self.cache.insert(handle, &identity);
        identity
    }
}
