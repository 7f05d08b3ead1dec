//! Events fed into the form controller and actions it produces.

use crate::{
    channel::{InboundEvent, Outbound},
    config::PersistedConfig,
    locale::Language,
};

/// Text fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Master password input.
    MasterPassword,
    /// Domain / URL input.
    Domain,
    /// Password length input.
    Length,
}

/// Direction of a length adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// One character longer.
    Up,
    /// One character shorter.
    Down,
}

impl Step {
    /// Signed change applied to the length.
    pub fn delta(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

/// Events the host feeds into the controller.
#[derive(Debug, Clone)]
pub enum PageEvent<S> {
    /// The page finished loading.
    Loaded {
        /// Remembered settings to seed the form with.
        config: PersistedConfig,
        /// Language requested by the query string, if any.
        language: Option<Language>,
    },

    /// A text field changed.
    Input {
        /// Field that changed.
        field: Field,
        /// Its new content.
        value: String,
    },

    /// The case option changed. `None` when no option is checked.
    CaseSelected(Option<String>),

    /// A key went down inside a form field.
    KeyDown {
        /// Legacy `keyCode`.
        code: u32,
    },

    /// The generate control was activated.
    Submit,

    /// The user acknowledged the masked result.
    Reveal,

    /// A length increment/decrement control was activated.
    AdjustLength(Step),

    /// A message arrived from another browsing context.
    MessageReceived(InboundEvent<S>),

    /// The update asset fetch completed.
    UpdateFetched {
        /// Fetched body, used as the update link target.
        body: String,
    },

    /// The update asset fetch failed.
    UpdateFetchFailed {
        /// Description of the failure.
        reason: String,
    },
}

/// Actions produced by the controller for the host to execute, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction<S> {
    /// Post an envelope to the bookmarklet.
    Post(Outbound<S>),

    /// Remember the settings of a successful derivation.
    PersistConfig(PersistedConfig),

    /// Start fetching the update asset. Fire-and-forget: report the outcome
    /// later with [`PageEvent::UpdateFetched`] or
    /// [`PageEvent::UpdateFetchFailed`].
    FetchUpdate {
        /// Relative resource path.
        path: &'static str,
    },

    /// Remove focus from the active field.
    BlurActiveField,

    /// Suppress the browser's default handling of the triggering event.
    PreventDefault,

    /// Log a state machine note.
    Log {
        /// Message to log.
        message: String,
    },
}

impl<S> PageAction<S> {
    /// The post carried by this action, if any.
    pub fn as_post(&self) -> Option<&Outbound<S>> {
        match self {
            Self::Post(outbound) => Some(outbound),
            _ => None,
        }
    }
}
