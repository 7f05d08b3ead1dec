//! Production Environment implementation for the headless page.
//!
//! Without a layout engine the page can't measure itself; the host tells it
//! how tall its content is.

use genpass_core::Environment;

/// Default content height of the mobile page, in CSS pixels.
pub const DEFAULT_CONTENT_HEIGHT: u32 = 420;

/// Environment reporting a host-configured content height.
#[derive(Debug, Clone, Copy)]
pub struct SystemEnv {
    content_height: u32,
}

impl SystemEnv {
    /// Create an environment reporting `content_height`.
    #[must_use]
    pub fn new(content_height: u32) -> Self {
        Self { content_height }
    }
}

impl Default for SystemEnv {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_HEIGHT)
    }
}

impl Environment for SystemEnv {
    fn content_height(&self) -> u32 {
        self.content_height
    }
}
