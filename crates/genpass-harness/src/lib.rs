//! Deterministic simulation harness for GenPass page testing.
//!
//! Seeded implementations of the `Environment` and `MessageSource` traits and
//! a simulated page that executes controller actions the way a browser host
//! would, without a browser.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation for model-based
//! testing. Operations are applied to both the model and the simulated page,
//! and their observable states are compared.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod sim_env;
pub mod sim_source;
pub mod world;

pub use model::{ContextId, ModelForm, ObservableState, Operation, PayloadChoice, SmallText};
pub use sim_env::SimEnv;
pub use sim_source::{Delivery, SimSource};
pub use world::{CONTEXT_ORIGINS, SimPage};
