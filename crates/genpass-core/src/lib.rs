//! GenPass page core
//!
//! Pure state machines behind the GenPass mobile page: the form that derives
//! a site password and the messaging channel that talks to the bookmarklet.
//!
//! # Architecture
//!
//! Nothing in this crate performs I/O. The [`FormController`]:
//! - Receives events from the caller (user input, inbound messages, fetch
//!   completions)
//! - Produces [`PageAction`]s for the caller to execute (post an envelope,
//!   persist settings, fetch the update asset)
//! - Uses the [`Environment`] trait for page measurements and the
//!   [`DerivationService`] trait for password derivation
//!
//! # Components
//!
//! - [`validator`]: clamp-not-reject length validation and case selection
//! - [`config`]: last-used settings over a [`KeyValueStore`]
//! - [`derivation`]: the derivation seam and the default [`GenPass`]
//! - [`channel`]: endpoint capture and origin-scoped outbound envelopes
//! - [`form`]: the form state machine

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod channel;
pub mod config;
pub mod derivation;
pub mod env;
mod error;
pub mod event;
pub mod form;
pub mod hostname;
pub mod keys;
pub mod locale;
pub mod validator;

pub use channel::{ChannelState, Endpoint, InboundEvent, MessageChannel, MessageSource, Outbound};
pub use config::{KeyValueStore, MemoryStore, PersistedConfig, StoreError};
pub use derivation::{DerivationService, DeriveOptions, GenPass, HashAlgorithm};
pub use env::Environment;
pub use error::FormError;
pub use event::{Field, PageAction, PageEvent, Step};
pub use form::{FormController, FormState, Status, ViewModel};
pub use genpass_proto::{Envelope, InboundField, InboundMessage, LATEST_VERSION, Origin};
pub use keys::KeyClass;
pub use locale::{Labels, Language};
pub use validator::{
    DEFAULT_LENGTH, MAX_LENGTH, MIN_LENGTH, PasswordCase, clamp_length, selected_case,
    validate_length,
};

/// Relative path of the latest bookmarklet build, fetched when a stale
/// bookmarklet contacts the page.
pub const UPDATE_ASSET_PATH: &str = "../bookmarklet/bookmarklet.min.js";
