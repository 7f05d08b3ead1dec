//! Simulated browsing contexts.
//!
//! A `SimSource` stands in for the bookmarklet's window. Like
//! `window.postMessage`, it only accepts a post whose target origin matches
//! its own; anything else is dropped and counted.

use std::{cell::RefCell, rc::Rc};

use genpass_core::{MessageSource, Origin};

/// A post accepted by a simulated context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Wire payload.
    pub data: String,
    /// Origin the sender restricted the post to.
    pub target_origin: String,
}

#[derive(Debug, Default)]
struct Mailbox {
    delivered: Vec<Delivery>,
    dropped: usize,
}

/// Handle to a simulated browsing context.
///
/// Clones share the mailbox. Equality is by context id.
#[derive(Debug, Clone)]
pub struct SimSource {
    id: u8,
    origin: String,
    mailbox: Rc<RefCell<Mailbox>>,
}

impl SimSource {
    /// Create a context living at `origin`.
    pub fn new(id: u8, origin: impl Into<String>) -> Self {
        Self { id, origin: origin.into(), mailbox: Rc::default() }
    }

    /// Context identifier.
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Origin string this context reports when it sends.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Posts accepted so far.
    pub fn delivered(&self) -> Vec<Delivery> {
        self.mailbox.borrow().delivered.clone()
    }

    /// Posts rejected because of an origin mismatch.
    pub fn dropped(&self) -> usize {
        self.mailbox.borrow().dropped
    }
}

impl PartialEq for SimSource {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SimSource {}

impl MessageSource for SimSource {
    fn post_message(&self, data: &str, target_origin: &Origin) {
        let mut mailbox = self.mailbox.borrow_mut();
        if target_origin.as_str() == self.origin {
            mailbox.delivered.push(Delivery {
                data: data.to_string(),
                target_origin: target_origin.to_string(),
            });
        } else {
            tracing::debug!(
                context = self.id,
                target = %target_origin,
                "origin mismatch, dropping post"
            );
            mailbox.dropped += 1;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn matching_origin_is_delivered() {
        let source = SimSource::new(1, "https://a.example");
        source.post_message(r#"{"height":1}"#, &Origin::parse("https://a.example").unwrap());

        assert_eq!(source.delivered().len(), 1);
        assert_eq!(source.dropped(), 0);
    }

    #[test]
    fn mismatched_origin_is_dropped() {
        let source = SimSource::new(1, "https://a.example");
        source.post_message(r#"{"height":1}"#, &Origin::parse("https://b.example").unwrap());

        assert!(source.delivered().is_empty());
        assert_eq!(source.dropped(), 1);
    }

    #[test]
    fn clones_share_mailbox() {
        let source = SimSource::new(1, "https://a.example");
        let handle = source.clone();
        handle.post_message("{}", &Origin::parse("https://a.example").unwrap());

        assert_eq!(source.delivered().len(), 1);
    }
}
