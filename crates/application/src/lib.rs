//! Application services and ports of the syscall console.

#![forbid(unsafe_code)]

mod command_dispatcher;
mod command_form;
mod console_ports;
mod console_service;
mod log_viewer;
mod session_store;
mod view_router;

#[cfg(test)]
mod test_support;

pub use command_dispatcher::{
    CommandDispatcher, PreparedCommand, ensure_permitted, prepare_command,
};
pub use command_form::{CommandForm, FormField};
pub use console_ports::{ClientStateStore, ConsoleBackend, LoginRequest, RegisterRequest};
pub use console_service::{
    CommandEpoch, ConsoleEffect, ConsoleEvent, ConsoleRuntime, ConsoleState, EffectExecutor,
    REGISTRATION_NOTICE, ResponseMessage, ResponseRegion, ResponseTone, handle_event,
};
pub use log_viewer::{AuditLogService, LogDisplay, LogViewer, RefreshTicket};
pub use session_store::SessionStore;
pub use view_router::{EnterHook, RouteChange, ViewAction, ViewState, route};
