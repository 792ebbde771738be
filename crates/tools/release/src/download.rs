//! Release artifact download.

use async_trait::async_trait;
use kenbot_action_core::{Error, Result};
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use std::path::Path;
use tracing::debug;

/// Fetches a URL into a local file.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `url` to `dest`, sending `authorization` as the
    /// `Authorization` header when present.
    async fn download(&self, url: &str, authorization: Option<&str>, dest: &Path) -> Result<()>;
}

/// HTTP downloader backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Create a downloader with the action's user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("kenbot-action/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, authorization: Option<&str>, dest: &Path) -> Result<()> {
        debug!(%url, ?dest, authenticated = authorization.is_some(), "Downloading");

        let mut request = self.client.get(url);
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::download(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::download(
                url,
                format!("Unexpected HTTP response: {status}"),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::download(url, e.to_string()))?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io(e, "create download directory", Some(parent.to_path_buf())))?;
        }
        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|e| Error::io(e, "write download", Some(dest.to_path_buf())))?;

        debug!(%url, size = bytes.len(), "Downloaded");
        Ok(())
    }
}
