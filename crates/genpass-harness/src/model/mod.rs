//! Reference model for model-based testing.
//!
//! The model is a simplified implementation that captures the observable
//! behavior of the page without real password derivation. It serves as the
//! oracle against which the controller is verified.
//!
//! # Design Principles
//!
//! - Simplicity: The model should be obviously correct
//! - Observable behavior only: Captures WHAT, not HOW
//! - Deterministic: Same inputs produce same outputs

mod form;
pub mod operation;

pub use form::{ModelForm, ObservableState};
pub use operation::{ContextId, FieldChoice, Operation, PayloadChoice, SmallText};
