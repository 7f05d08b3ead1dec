//! GenPass page protocol
//!
//! Wire types exchanged between the GenPass page and the bookmarklet running
//! in another browsing context. Every message on the wire is a JSON string
//! holding a flat object.
//!
//! # Directions
//!
//! - Outbound (page → bookmarklet): exactly one key per message, either
//!   `{"height": n}` or `{"result": "..."}`. See [`Envelope`].
//! - Inbound (bookmarklet → page): a flat object that may carry several keys
//!   at once. Each key is dispatched on its own and unknown keys are ignored.
//!   See [`InboundMessage`].
//!
//! # Addressing
//!
//! Replies are always scoped to the [`Origin`] that last contacted the page.
//! An `Origin` can only hold a concrete `scheme://host[:port]`, so the
//! wildcard target cannot be expressed.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod envelope;
pub mod errors;
pub mod inbound;
pub mod origin;

pub use envelope::Envelope;
pub use errors::ProtoError;
pub use inbound::{InboundField, InboundMessage, LATEST_VERSION};
pub use origin::Origin;
