//! Downloading remote resources to the local data directory.

use crate::error::{DataError, Result};
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Capability to materialise a remote resource at a local path.
pub trait FileFetcher {
    /// Download `url` to `destination` unless the file is already present.
    fn fetch_file(&self, url: &str, destination: &Path) -> impl Future<Output = Result<()>>;
}

/// HTTP file fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given user agent.
    ///
    /// `timeout` bounds connecting and each read, not the whole transfer.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self { client })
    }
}

/// Sibling path used while a download is in flight.
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}

/// Stream a response body into `path`, returning the byte count.
async fn write_body(response: &mut reqwest::Response, path: &Path) -> Result<usize> {
    let mut file = std::fs::File::create(path)?;
    let mut written = 0usize;
    while let Some(chunk) = response.chunk().await.map_err(DataError::Network)? {
        file.write_all(&chunk)?;
        written += chunk.len();
    }
    file.sync_all()?;
    Ok(written)
}

impl FileFetcher for HttpFetcher {
    async fn fetch_file(&self, url: &str, destination: &Path) -> Result<()> {
        if destination.exists() {
            log::debug!("{} already present, skipping download", destination.display());
            return Ok(());
        }

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }

        log::info!("Downloading {} to {}", url, destination.display());
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(DataError::Network)?;

        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "Failed to fetch {}: HTTP {}",
                url,
                response.status()
            )));
        }

        let part = partial_path(destination);
        let written = match write_body(&mut response, &part).await {
            Ok(written) => written,
            Err(e) => {
                let _ = std::fs::remove_file(&part);
                return Err(e);
            }
        };

        std::fs::rename(&part, destination)?;
        log::info!("Downloaded {} bytes to {}", written, destination.display());
        Ok(())
    }
}
