//! Form controller error types.

use genpass_proto::ProtoError;
use thiserror::Error;

/// Errors from form controller operations.
///
/// Bad input from the user or the bookmarklet never surfaces here; it is
/// absorbed by the state machine (clamped, marked missing, or dropped).
/// What remains are failures of the page itself.
#[derive(Debug, Error)]
pub enum FormError {
    /// Protocol operation failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtoError),
}

impl FormError {
    /// Returns true if this error is fatal (unrecoverable).
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Protocol(e) => e.is_fatal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_errors_are_transient() {
        let err = FormError::from(ProtoError::NotAnObject { found: "string" });
        assert!(!err.is_fatal());
    }

    #[test]
    fn error_display() {
        let err = FormError::from(ProtoError::Malformed { reason: "EOF".to_string() });
        assert_eq!(err.to_string(), "protocol error: malformed payload: EOF");
    }
}
