//! Environment abstraction for the page host.
//!
//! The `Environment` trait decouples the form state machine from whatever
//! renders it. The host (a browser page, the headless bridge, the simulation
//! harness) reports layout facts; the state machine never measures anything
//! itself.

/// Host facts the state machine needs to build envelopes.
pub trait Environment {
    /// Current rendered content height in CSS pixels.
    ///
    /// Reported to the bookmarklet so it can size the frame hosting the page.
    /// Read at the moment an envelope is built, so it must reflect the latest
    /// layout (e.g. after the update notice became visible).
    fn content_height(&self) -> u32;
}

impl<E: Environment + ?Sized> Environment for &E {
    fn content_height(&self) -> u32 {
        (**self).content_height()
    }
}
