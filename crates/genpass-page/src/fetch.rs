//! Update asset fetching.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::PageError;

/// Fetches page-relative resources.
///
/// Runs on the page's local task set, so implementations need not be `Send`.
#[async_trait(?Send)]
pub trait AssetFetcher {
    /// Fetch the textual body at `path`, relative to the page.
    async fn fetch(&self, path: &str) -> Result<String, PageError>;
}

/// Serves assets from the directory the page lives in.
///
/// Relative paths resolve the way a browser resolves them against the page
/// URL, so `../bookmarklet/bookmarklet.min.js` reads from a sibling of the
/// page directory.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    page_dir: PathBuf,
}

impl FsFetcher {
    /// Serve assets relative to `page_dir`.
    pub fn new(page_dir: impl Into<PathBuf>) -> Self {
        Self { page_dir: page_dir.into() }
    }
}

#[async_trait(?Send)]
impl AssetFetcher for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<String, PageError> {
        let resolved = self.page_dir.join(path);
        tracing::debug!(path = %resolved.display(), "fetching asset");
        Ok(tokio::fs::read_to_string(resolved).await?)
    }
}
