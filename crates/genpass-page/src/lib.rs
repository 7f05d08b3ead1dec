//! GenPass page runtime.
//!
//! Hosts the pure [`genpass_core::FormController`] on real I/O:
//! - Tokio current-thread runtime with a `LocalSet` for the event loop
//! - JSON file for remembered settings
//! - Filesystem for the update asset
//! - JSON lines on stdio for the bookmarklet channel
//!
//! ## Architecture
//!
//! ```text
//! genpass-page
//!   ├─ SystemEnv     (host-configured Environment impl)
//!   ├─ FileStore     (durable KeyValueStore)
//!   ├─ FsFetcher     (update asset source)
//!   ├─ PageDriver    (executes controller actions)
//!   └─ bridge        (stdio JSON lines, StdioSource)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bridge;
mod driver;
mod error;
mod fetch;
mod store;
mod system_env;

use std::path::PathBuf;

pub use bridge::{StdioSource, parse_line, serve};
pub use driver::{PageDriver, PageForm};
pub use error::PageError;
pub use fetch::{AssetFetcher, FsFetcher};
use genpass_core::{
    FormController, GenPass, HashAlgorithm, Language, PageEvent, PersistedConfig, StoreError,
};
pub use store::FileStore;
pub use system_env::{DEFAULT_CONTENT_HEIGHT, SystemEnv};

/// Page configuration for the production runtime.
#[derive(Debug, Clone)]
pub struct PageRuntimeConfig {
    /// Settings file (e.g., "genpass.json")
    pub store_path: PathBuf,
    /// Directory the page is served from; the update asset resolves
    /// relative to it
    pub page_dir: PathBuf,
    /// Label language, English when unset
    pub language: Option<Language>,
    /// Content height reported to the bookmarklet
    pub content_height: u32,
    /// Derivation hash
    pub algorithm: HashAlgorithm,
}

impl Default for PageRuntimeConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("genpass.json"),
            page_dir: PathBuf::from("."),
            language: None,
            content_height: DEFAULT_CONTENT_HEIGHT,
            algorithm: HashAlgorithm::default(),
        }
    }
}

/// Load a page: open its settings, seed the form and wire up the driver.
///
/// A corrupt settings file is logged and replaced on the next save, as a
/// browser page would treat unreadable storage.
///
/// # Errors
///
/// Returns [`PageError::Store`] if the settings file exists but can't be
/// read.
pub fn open(
    config: PageRuntimeConfig,
) -> Result<PageDriver<StdioSource, FileStore, FsFetcher>, PageError> {
    let store = match FileStore::open(&config.store_path) {
        Ok(store) => store,
        Err(StoreError::Corrupt { reason }) => {
            tracing::warn!(
                path = %config.store_path.display(),
                %reason,
                "settings file corrupt, starting empty"
            );
            FileStore::empty(&config.store_path)
        },
        Err(e) => return Err(e.into()),
    };

    let settings = PersistedConfig::load(&store);
    tracing::info!(length = settings.length, case = settings.case.as_str(), "settings loaded");

    let form = FormController::new(
        SystemEnv::new(config.content_height),
        GenPass::new(config.algorithm),
        PersistedConfig::default(),
    );

    let mut driver = PageDriver::new(form, store, FsFetcher::new(config.page_dir));
    driver.handle(PageEvent::Loaded { config: settings, language: config.language })?;
    Ok(driver)
}
