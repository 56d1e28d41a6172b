//! Command dispatcher: validates a form, builds the request and sends it.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use syscon_core::{AppError, AppResult, Role};
use syscon_domain::{CommandRequest, InputKind, OperationDescriptor, find_operation};
use tracing::{info, warn};

use crate::{ConsoleBackend, SessionStore};

/// Validated command whose upload fields are not read yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCommand {
    operation: &'static OperationDescriptor,
    params: BTreeMap<String, String>,
    uploads: BTreeMap<String, PathBuf>,
}

impl PreparedCommand {
    /// Returns the operation descriptor.
    #[must_use]
    pub fn operation(&self) -> &'static OperationDescriptor {
        self.operation
    }

    /// Returns the inline parameters.
    #[must_use]
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}

/// Builds a command from form values, keeping only declared fields.
///
/// Rejects unknown operations, missing required fields and non-integer
/// values in number fields. Number values are sent as typed, trimmed.
pub fn prepare_command(
    operation_name: &str,
    form_values: &BTreeMap<String, String>,
) -> AppResult<PreparedCommand> {
    let operation_name = operation_name.trim();
    if operation_name.is_empty() {
        return Err(AppError::Validation("select an operation first".to_owned()));
    }

    let operation = find_operation(operation_name).ok_or_else(|| {
        AppError::Validation(format!("unknown operation '{operation_name}'"))
    })?;

    let mut params = BTreeMap::new();
    let mut uploads = BTreeMap::new();

    for field in operation.fields {
        let raw = form_values
            .get(field.field_id)
            .map(String::as_str)
            .unwrap_or_default();

        if raw.trim().is_empty() {
            if field.required {
                return Err(AppError::Validation(format!("{} is required", field.label)));
            }
            continue;
        }

        match field.input_kind {
            InputKind::Number => {
                let trimmed = raw.trim();
                trimmed.parse::<i64>().map_err(|_| {
                    AppError::Validation(format!("{} must be an integer", field.label))
                })?;
                params.insert(field.field_id.to_owned(), trimmed.to_owned());
            }
            InputKind::File => {
                uploads.insert(field.field_id.to_owned(), PathBuf::from(raw.trim()));
            }
            InputKind::Text | InputKind::TextArea => {
                params.insert(field.field_id.to_owned(), raw.to_owned());
            }
        }
    }

    Ok(PreparedCommand {
        operation,
        params,
        uploads,
    })
}

/// Rejects write-class operations for roles that may not run them.
pub fn ensure_permitted(operation: &OperationDescriptor, role: Role) -> AppResult<()> {
    if operation.permits(role) {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "'{}' is not available to the {} role",
        operation.name,
        role.as_str()
    )))
}

/// Sends prepared commands with the current bearer token.
#[derive(Clone)]
pub struct CommandDispatcher {
    backend: Arc<dyn ConsoleBackend>,
    session: Arc<SessionStore>,
}

impl CommandDispatcher {
    /// Creates a dispatcher over the backend and the session context.
    #[must_use]
    pub fn new(backend: Arc<dyn ConsoleBackend>, session: Arc<SessionStore>) -> Self {
        Self { backend, session }
    }

    /// Validates, authorizes and sends one operation.
    ///
    /// Returns the backend result payload. Nothing is sent when validation,
    /// authentication, role gating or upload reading fails.
    pub async fn execute(
        &self,
        operation_name: &str,
        form_values: &BTreeMap<String, String>,
    ) -> AppResult<Value> {
        let prepared = prepare_command(operation_name, form_values)?;

        let current = self.session.current_session();
        let session = current
            .session()
            .ok_or_else(|| AppError::Unauthorized(String::new()))?;
        ensure_permitted(prepared.operation, session.role())?;

        let request = resolve_uploads(prepared).await?;

        info!(operation = request.operation, "dispatching syscall");
        let result = self.backend.execute(session.token(), &request).await;
        match &result {
            Ok(_) => info!(operation = request.operation, "syscall succeeded"),
            Err(error) => warn!(
                operation = request.operation,
                class = error.class().as_str(),
                error = %error,
                "syscall failed"
            ),
        }

        result
    }
}

async fn resolve_uploads(prepared: PreparedCommand) -> AppResult<CommandRequest> {
    let PreparedCommand {
        operation,
        mut params,
        uploads,
    } = prepared;

    for (field_id, path) in uploads {
        let content = tokio::fs::read_to_string(&path).await.map_err(|error| {
            AppError::Validation(format!(
                "could not read upload file '{}': {error}",
                path.display()
            ))
        })?;
        params.insert(field_id, content);
    }

    Ok(CommandRequest {
        operation: operation.name,
        params,
    })
}

#[cfg(test)]
mod tests;
