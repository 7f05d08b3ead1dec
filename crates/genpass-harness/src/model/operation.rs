//! Operations for model-based testing.
//!
//! Operations represent everything a user or a bookmarklet can do to the
//! page. They are generated randomly by proptest and applied to both the
//! model and the simulated page.

use arbitrary::Arbitrary;
use genpass_core::Field;

/// Simulated browsing context identifier (0-indexed).
pub type ContextId = u8;

/// Characters typed into text fields.
///
/// Digits, letters, separators and spaces: enough to hit numeric lengths,
/// garbage lengths, URLs and blank domains.
const ALPHABET: &[u8] = b"0123456789-abcxyz. /:";

/// Longest text typed in one operation.
const MAX_TEXT: usize = 12;

/// Case option values, including one the form doesn't know.
pub const CASE_NAMES: [&str; 4] = ["lowercase", "uppercase", "mixed", "Mixed"];

/// Operations that can be applied to the page.
#[derive(Debug, Clone, Arbitrary)]
pub enum Operation {
    /// Replace the content of a text field.
    Type {
        /// Field being edited.
        field: FieldChoice,
        /// New content.
        text: SmallText,
    },

    /// Check a case option (`None` unchecks all).
    SelectCase {
        /// Index into [`CASE_NAMES`], wrapped.
        choice: Option<u8>,
    },

    /// Press a key inside a field.
    KeyDown {
        /// Legacy `keyCode`.
        code: u8,
    },

    /// Activate the generate control.
    Submit,

    /// Acknowledge the masked result.
    Reveal,

    /// Activate a length stepper.
    AdjustLength {
        /// Increment when true, decrement otherwise.
        up: bool,
    },

    /// A context posts a message to the page.
    Message {
        /// Sending context.
        context: ContextId,
        /// What it sends.
        payload: PayloadChoice,
    },

    /// Let every pending update fetch finish.
    CompleteFetches,
}

/// Text field selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum FieldChoice {
    /// Master password.
    MasterPassword,
    /// Domain / URL.
    Domain,
    /// Length.
    Length,
}

impl From<FieldChoice> for Field {
    fn from(choice: FieldChoice) -> Self {
        match choice {
            FieldChoice::MasterPassword => Self::MasterPassword,
            FieldChoice::Domain => Self::Domain,
            FieldChoice::Length => Self::Length,
        }
    }
}

/// Small text for field input.
///
/// Raw bytes are mapped onto a fixed alphabet to keep test cases small.
#[derive(Debug, Clone, Arbitrary)]
pub struct SmallText {
    /// Seed bytes, one per character.
    pub bytes: Vec<u8>,
}

impl SmallText {
    /// Expand to the typed text.
    pub fn to_text(&self) -> String {
        self.bytes
            .iter()
            .take(MAX_TEXT)
            .map(|b| char::from(ALPHABET[usize::from(*b) % ALPHABET.len()]))
            .collect()
    }
}

/// Payloads a bookmarklet might post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum PayloadChoice {
    /// `{}`
    Empty,
    /// Current bookmarklet version.
    CurrentVersion,
    /// An old bookmarklet version.
    StaleVersion,
    /// An old version sent as a string.
    StaleVersionString,
    /// Keys the page doesn't know.
    UnknownKeys,
    /// An old version next to unknown keys.
    StaleWithUnknown,
    /// A `null` version, which compares as 0.
    NullVersion,
    /// Not JSON at all.
    NotJson,
    /// JSON that isn't an object.
    NotAnObject,
}

impl PayloadChoice {
    /// Wire form.
    pub fn to_wire(self) -> &'static str {
        match self {
            Self::Empty => "{}",
            Self::CurrentVersion => r#"{"version":20140531}"#,
            Self::StaleVersion => r#"{"version":1}"#,
            Self::StaleVersionString => r#"{"version":"20140530"}"#,
            Self::UnknownKeys => r#"{"height":10,"theme":"dark"}"#,
            Self::StaleWithUnknown => r#"{"theme":"dark","version":20130101}"#,
            Self::NullVersion => r#"{"version":null}"#,
            Self::NotJson => "version=1",
            Self::NotAnObject => "[20140531]",
        }
    }

    /// Whether the page accepts this payload, and if so whether it announces
    /// a stale bookmarklet.
    pub fn decoded_staleness(self) -> Option<bool> {
        match self {
            Self::Empty | Self::CurrentVersion | Self::UnknownKeys => Some(false),
            Self::StaleVersion
            | Self::StaleVersionString
            | Self::StaleWithUnknown
            | Self::NullVersion => Some(true),
            Self::NotJson | Self::NotAnObject => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_bounded_and_from_alphabet() {
        let text = SmallText { bytes: (0..=255).collect() }.to_text();
        assert_eq!(text.len(), MAX_TEXT);
        assert!(text.bytes().all(|b| ALPHABET.contains(&b)));
    }
}
