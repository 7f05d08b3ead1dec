//! Protocol error types.

use thiserror::Error;

/// Errors from decoding or encoding wire messages.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// Payload is not valid JSON.
    #[error("malformed payload: {reason}")]
    Malformed {
        /// Parser diagnostic.
        reason: String,
    },

    /// Payload parsed, but is not a flat key/value object.
    #[error("payload is not an object: found {found}")]
    NotAnObject {
        /// JSON kind that was found instead.
        found: &'static str,
    },

    /// Object parsed, but carries no recognizable envelope.
    #[error("unknown envelope: {reason}")]
    UnknownEnvelope {
        /// Description of the mismatch.
        reason: String,
    },

    /// Origin string is not a concrete `scheme://host[:port]`.
    #[error("invalid origin {origin:?}: {reason}")]
    InvalidOrigin {
        /// The rejected origin string.
        origin: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Envelope could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ProtoError {
    /// Returns true if the error should abort the page.
    ///
    /// Nothing on the wire is ever fatal: a bad inbound message is dropped
    /// and the page keeps serving. Only a failure to encode our own
    /// envelopes points at a bug.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Encode(_) => true,
            Self::Malformed { .. }
            | Self::NotAnObject { .. }
            | Self::UnknownEnvelope { .. }
            | Self::InvalidOrigin { .. } => false,
        }
    }
}
