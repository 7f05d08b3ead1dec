//! Page runtime error types.

use genpass_core::{FormError, StoreError};
use thiserror::Error;

/// Errors that can occur in the page runtime.
#[derive(Debug, Error)]
pub enum PageError {
    /// Controller failed.
    #[error("form error: {0}")]
    Form(#[from] FormError),

    /// Settings storage failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Reading input, writing output or fetching an asset failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A bridge input line could not be understood.
    #[error("invalid bridge input: {0}")]
    Bridge(#[from] serde_json::Error),

    /// A runtime task panicked or was cancelled.
    #[error("task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl PageError {
    /// Returns true if the runtime can't continue after this error.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Form(e) => e.is_fatal(),
            Self::Store(e) => e.is_fatal(),
            Self::Bridge(_) => false,
            Self::Io(_) | Self::Task(_) => true,
        }
    }
}
