mod backend;
mod client_state;

pub use backend::{ConsoleBackend, LoginRequest, RegisterRequest};
pub use client_state::ClientStateStore;
