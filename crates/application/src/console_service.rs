//! Console state machine: events in, next state and effects out.
//!
//! [`handle_event`] never performs I/O. [`ConsoleRuntime`] performs the
//! returned effects through an [`EffectExecutor`] and feeds their
//! completions back as events.

mod events;
mod handler;
mod runtime;
mod state;

pub use events::{ConsoleEffect, ConsoleEvent};
pub use handler::handle_event;
pub use runtime::{ConsoleRuntime, EffectExecutor};
pub use state::{CommandEpoch, ConsoleState, ResponseMessage, ResponseRegion, ResponseTone};

/// Notice shown on the login panel after a successful registration.
pub const REGISTRATION_NOTICE: &str = "Registration successful! Please login.";
