//! Single-field envelopes.
//!
//! An [`Envelope`] carries exactly one semantic field. Its wire form is a flat
//! JSON object with one key, which is what serde's externally tagged enum
//! representation produces:
//!
//! ```text
//! Envelope::Height(412)           <->  {"height":412}
//! Envelope::Result("x7Gq".into()) <->  {"result":"x7Gq"}
//! Envelope::Version(20140531)     <->  {"version":20140531}
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::ProtoError;

/// One wire message carrying a single field.
///
/// The page only ever sends `Height` and `Result`. `Version` is what the
/// bookmarklet announces about itself; the page decodes it through
/// [`InboundMessage`](crate::InboundMessage), which tolerates extra keys.
///
/// # Security
///
/// - **Debug Redaction**: the `Debug` impl redacts the derived password in
///   `Result` so envelopes can be logged safely.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope {
    /// Bookmarklet build stamp (`YYYYMMDD`).
    Version(u64),
    /// Rendered content height of the page, in CSS pixels.
    Height(u32),
    /// Derived password for the bookmarklet to fill in.
    Result(String),
}

impl Envelope {
    /// Wire key of this envelope.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Version(_) => "version",
            Self::Height(_) => "height",
            Self::Result(_) => "result",
        }
    }

    /// Serialize to the wire string.
    pub fn encode(&self) -> Result<String, ProtoError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a wire string holding exactly one recognized key.
    pub fn decode(data: &str) -> Result<Self, ProtoError> {
        serde_json::from_str(data).map_err(|e| {
            if e.is_syntax() || e.is_eof() {
                ProtoError::Malformed { reason: e.to_string() }
            } else {
                ProtoError::UnknownEnvelope { reason: e.to_string() }
            }
        })
    }
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Version(version) => f.debug_tuple("Version").field(version).finish(),
            Self::Height(height) => f.debug_tuple("Height").field(height).finish(),
            Self::Result(result) => f
                .debug_tuple("Result")
                .field(&format_args!("<redacted {} chars>", result.chars().count()))
                .finish(),
        }
    }
}
