use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::DirectoryService;

/// Plain GET of directory pages over HTTP(S).
pub struct HttpDirectory {
    http: Client,
}

impl HttpDirectory {
    pub fn new(timeout: Option<Duration>) -> AppResult<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl DirectoryService for HttpDirectory {
    async fn fetch_page(&self, url: &str) -> AppResult<String> {
        debug!(%url, "fetching directory page");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| AppError::Directory(format!("could not retrieve {url}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Directory(format!(
                "{url} responded with {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|err| AppError::Directory(format!("failed to read {url}: {err}")))
    }
}
