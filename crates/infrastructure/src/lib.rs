//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod file_client_state_store;
mod http_console_backend;
mod in_memory_client_state_store;

pub use file_client_state_store::FileClientStateStore;
pub use http_console_backend::HttpConsoleBackend;
pub use in_memory_client_state_store::InMemoryClientStateStore;
