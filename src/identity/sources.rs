use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::identity::format_identity;
use crate::identity::scan::{ProfileScan, scan_labeled_email, scan_maintainer_list};
use crate::services::DirectoryService;

/// One remote directory the resolver can ask about a handle.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    fn label(&self) -> &str;
    async fn attempt(&self, handle: &str) -> Option<String>;
}

/// Page of profile cards (trusted users, developers, fellows).
pub struct ProfileSource {
    label: &'static str,
    url: String,
    directory: Arc<dyn DirectoryService>,
}

impl ProfileSource {
    pub fn new(
        label: &'static str,
        url: impl Into<String>,
        directory: Arc<dyn DirectoryService>,
    ) -> Self {
        Self {
            label,
            url: url.into(),
            directory,
        }
    }
}

#[async_trait]
impl IdentitySource for ProfileSource {
    fn label(&self) -> &str {
        self.label
    }

    async fn attempt(&self, handle: &str) -> Option<String> {
        let page = fetch(self.directory.as_ref(), &self.url).await?;
        ProfileScan::new(handle).run(&page)
    }
}

/// Package search page whose maintainer drop-down maps handles to names.
///
/// The drop-down has no addresses, so a hit is completed by looking the
/// name up on the labelled profile pages in `email_pages`, in order.
pub struct MaintainerListSource {
    url: String,
    email_pages: Vec<String>,
    directory: Arc<dyn DirectoryService>,
}

impl MaintainerListSource {
    pub fn new(
        url: impl Into<String>,
        email_pages: Vec<String>,
        directory: Arc<dyn DirectoryService>,
    ) -> Self {
        Self {
            url: url.into(),
            email_pages,
            directory,
        }
    }

    async fn find_email(&self, name: &str) -> Option<String> {
        for url in &self.email_pages {
            let Some(page) = fetch(self.directory.as_ref(), url).await else {
                continue;
            };
            if let Some(email) = scan_labeled_email(&page, name) {
                return Some(email);
            }
            debug!(%url, name, "no email listed for maintainer");
        }
        None
    }
}

#[async_trait]
impl IdentitySource for MaintainerListSource {
    fn label(&self) -> &str {
        "package maintainers"
    }

    async fn attempt(&self, handle: &str) -> Option<String> {
        let page = fetch(self.directory.as_ref(), &self.url).await?;
        let name = scan_maintainer_list(&page, handle)?;

        match self.find_email(&name).await {
            Some(email) => Some(format_identity(&name, &email)),
            None => Some(name),
        }
    }
}

async fn fetch(directory: &dyn DirectoryService, url: &str) -> Option<String> {
    match directory.fetch_page(url).await {
        Ok(page) => Some(page),
        Err(error) => {
            debug!(%url, %error, "directory page unavailable");
            None
        }
    }
}
