//! Cross-context messaging channel.
//!
//! The `MessageChannel` owns the messaging session with the bookmarklet. It
//! remembers who contacted the page last and turns outbound envelopes into
//! [`Outbound`] posts addressed to exactly that sender.
//!
//! # States
//!
//! ```text
//!            inbound              inbound
//! Unbound ───────────▶ Bound ───────────▶ Bound (endpoint overwritten)
//! ```
//!
//! There is no handshake and no pinning: the most recent sender wins. A
//! sender whose origin can't be addressed (`null`, `*`) still replaces the
//! previous endpoint, leaving the channel `Unbound` until the next usable
//! sender arrives.
//!
//! # Invariants
//!
//! - Origin scoping: every post carries the captured [`Origin`] and
//!   [`Endpoint::dispatch`] hands it to [`MessageSource::post_message`]. A
//!   post can't be addressed to "any origin".
//! - Unbound sends are dropped: `send` returns `None` and nothing is
//!   dispatched.

use genpass_proto::{Envelope, InboundMessage, Origin, ProtoError};

/// Handle to another browsing context that can receive posts.
///
/// Implementations deliver `data` only if the receiving context's origin
/// matches `target_origin`, as `window.postMessage` does. Delivery is
/// fire-and-forget; failures are the implementation's to log.
pub trait MessageSource: Clone {
    /// Post a serialized envelope to this context.
    fn post_message(&self, data: &str, target_origin: &Origin);
}

/// The other side of the messaging session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint<S> {
    source: S,
    origin: Origin,
}

impl<S: MessageSource> Endpoint<S> {
    /// Pair a source handle with the origin it reported.
    pub fn new(source: S, origin: Origin) -> Self {
        Self { source, origin }
    }

    /// Context handle replies go to.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Origin replies are scoped to.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Post `data` to the source, restricted to the captured origin.
    pub fn dispatch(&self, data: &str) {
        self.source.post_message(data, &self.origin);
    }
}

/// A message event as delivered by the host.
#[derive(Debug, Clone)]
pub struct InboundEvent<S> {
    /// Context that sent the message.
    pub source: S,
    /// Origin string reported by the host for the sender.
    pub origin: String,
    /// Raw wire payload.
    pub data: String,
}

/// An envelope ready to be posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound<S> {
    /// Where the envelope goes.
    pub endpoint: Endpoint<S>,
    /// The envelope itself.
    pub envelope: Envelope,
    /// Wire form of `envelope`.
    pub data: String,
}

impl<S: MessageSource> Outbound<S> {
    /// Post the wire form to the endpoint.
    pub fn dispatch(&self) {
        self.endpoint.dispatch(&self.data);
    }
}

/// Whether an endpoint has been captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No inbound message seen yet; outbound envelopes are dropped.
    Unbound,
    /// Replies go to the last sender.
    Bound,
}

/// Messaging session with the bookmarklet.
#[derive(Debug, Clone)]
pub struct MessageChannel<S> {
    endpoint: Option<Endpoint<S>>,
}

impl<S: MessageSource> Default for MessageChannel<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MessageSource> MessageChannel<S> {
    /// Create an unbound channel.
    pub fn new() -> Self {
        Self { endpoint: None }
    }

    /// Current state.
    pub fn state(&self) -> ChannelState {
        if self.endpoint.is_some() { ChannelState::Bound } else { ChannelState::Unbound }
    }

    /// Captured endpoint, if any.
    pub fn endpoint(&self) -> Option<&Endpoint<S>> {
        self.endpoint.as_ref()
    }

    /// Capture the sender of `event` and decode its payload.
    ///
    /// The sender becomes the endpoint before the payload is looked at, so a
    /// malformed payload still rebinds the channel. An origin that is not a
    /// concrete `scheme://host[:port]` can't be replied to, so it unbinds the
    /// channel instead: nothing ever reaches a sender that wasn't the last.
    ///
    /// # Errors
    ///
    /// - [`ProtoError::InvalidOrigin`] if the reported origin is unusable
    /// - [`ProtoError::Malformed`] or [`ProtoError::NotAnObject`] if the
    ///   payload can't be decoded
    pub fn on_message(&mut self, event: InboundEvent<S>) -> Result<InboundMessage, ProtoError> {
        let origin = match Origin::parse(&event.origin) {
            Ok(origin) => origin,
            Err(e) => {
                tracing::debug!(origin = %event.origin, "unaddressable sender, unbinding");
                self.endpoint = None;
                return Err(e);
            },
        };
        tracing::debug!(%origin, "captured message endpoint");

        self.endpoint = Some(Endpoint::new(event.source, origin));
        InboundMessage::decode(&event.data)
    }

    /// Build an outbound post for the current endpoint.
    ///
    /// Returns `Ok(None)` when unbound: the page may run without a
    /// bookmarklet and that is not an error.
    pub fn send(&self, envelope: Envelope) -> Result<Option<Outbound<S>>, ProtoError> {
        let Some(endpoint) = &self.endpoint else {
            tracing::debug!(key = envelope.key(), "channel unbound, dropping envelope");
            return Ok(None);
        };

        let data = envelope.encode()?;
        Ok(Some(Outbound { endpoint: endpoint.clone(), envelope, data }))
    }
}
