//! Domain types for the syscall console.

#![forbid(unsafe_code)]

mod audit_log;
mod operation;
mod preference;
mod session;

pub use audit_log::{LogEntry, LogFilter};
pub use operation::{
    CommandRequest, FieldDescriptor, InputKind, OPERATIONS, OperationClass, OperationDescriptor,
    SyscallSummary, find_operation, operations_for_role,
};
pub use preference::Theme;
pub use session::{CurrentSession, Session};
