use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use syscon_core::{AppError, Role};
use uuid::Uuid;

use crate::SessionStore;
use crate::test_support::{FakeBackend, FakeClientStateStore, token};

use super::{CommandDispatcher, prepare_command};

fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

async fn dispatcher_with_session(
    role: Option<Role>,
) -> (CommandDispatcher, Arc<FakeBackend>) {
    let backend = Arc::new(FakeBackend::default());
    let session = Arc::new(SessionStore::new(Arc::new(FakeClientStateStore::default())));
    if let Some(role) = role {
        assert!(session.set_session(token("T1"), role).await.is_ok());
    }
    (CommandDispatcher::new(backend.clone(), session), backend)
}

#[tokio::test]
async fn read_sends_declared_fields_with_bearer_token() {
    let (dispatcher, backend) = dispatcher_with_session(Some(Role::Admin)).await;
    *backend.execute_result.lock().await = Ok(json!("hello"));

    let result = dispatcher
        .execute("read", &values(&[("fd", "3"), ("size", "1024")]))
        .await;

    assert_eq!(result, Ok(json!("hello")));
    let executed = backend.executed.lock().await;
    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0].0, "T1");
    assert_eq!(executed[0].1.operation, "read");
    assert_eq!(executed[0].1.body(), json!({ "fd": "3", "size": "1024" }));
}

#[tokio::test]
async fn ambient_form_values_are_not_sent() {
    let (dispatcher, backend) = dispatcher_with_session(Some(Role::User)).await;

    let result = dispatcher
        .execute(
            "close",
            &values(&[("fd", "4"), ("size", "1024"), ("content", "leftover")]),
        )
        .await;

    assert!(result.is_ok());
    let executed = backend.executed.lock().await;
    assert_eq!(executed[0].1.body(), json!({ "fd": "4" }));
}

#[tokio::test]
async fn missing_required_field_is_caught_before_sending() {
    let (dispatcher, backend) = dispatcher_with_session(Some(Role::Admin)).await;

    let result = dispatcher.execute("read", &values(&[("fd", "3")])).await;

    assert!(matches!(result, Err(AppError::Validation(message)) if message == "Size is required"));
    assert!(backend.executed.lock().await.is_empty());
}

#[tokio::test]
async fn non_integer_descriptor_is_rejected() {
    let (dispatcher, backend) = dispatcher_with_session(Some(Role::Admin)).await;

    let result = dispatcher.execute("close", &values(&[("fd", "three")])).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(backend.executed.lock().await.is_empty());
}

#[tokio::test]
async fn user_role_cannot_send_write_class_operations() {
    let (dispatcher, backend) = dispatcher_with_session(Some(Role::User)).await;

    let result = dispatcher
        .execute("write", &values(&[("fd", "3"), ("content", "hi")]))
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(backend.executed.lock().await.is_empty());
}

#[tokio::test]
async fn protected_call_without_session_is_unauthorized() {
    let (dispatcher, backend) = dispatcher_with_session(None).await;

    let result = dispatcher.execute("getpid", &BTreeMap::new()).await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
    assert!(backend.executed.lock().await.is_empty());
}

#[tokio::test]
async fn server_error_is_returned_verbatim() {
    let (dispatcher, backend) = dispatcher_with_session(Some(Role::Admin)).await;
    *backend.execute_result.lock().await =
        Err(AppError::Application("Permission denied for delete_file".to_owned()));

    let result = dispatcher.execute("delete_file", &BTreeMap::new()).await;

    assert_eq!(
        result.map_err(|error| error.user_message()),
        Err("Permission denied for delete_file".to_owned())
    );
}

#[tokio::test]
async fn write_file_uploads_local_file_content() {
    let (dispatcher, backend) = dispatcher_with_session(Some(Role::Admin)).await;
    let path = std::env::temp_dir().join(format!("syscon-upload-{}.txt", Uuid::new_v4()));
    assert!(tokio::fs::write(&path, "uploaded body").await.is_ok());

    let result = dispatcher
        .execute(
            "write_file",
            &values(&[("content", path.to_string_lossy().as_ref())]),
        )
        .await;
    let _ = tokio::fs::remove_file(&path).await;

    assert!(result.is_ok());
    let executed = backend.executed.lock().await;
    assert_eq!(executed[0].1.body(), json!({ "content": "uploaded body" }));
}

#[tokio::test]
async fn unreadable_upload_is_a_validation_error() {
    let (dispatcher, backend) = dispatcher_with_session(Some(Role::Admin)).await;
    let path = std::env::temp_dir().join(format!("syscon-missing-{}.txt", Uuid::new_v4()));

    let result = dispatcher
        .execute(
            "write_file",
            &values(&[("content", path.to_string_lossy().as_ref())]),
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(backend.executed.lock().await.is_empty());
}

#[test]
fn prepare_rejects_unknown_and_empty_operations() {
    assert!(matches!(
        prepare_command("fork", &BTreeMap::new()),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        prepare_command(" ", &BTreeMap::new()),
        Err(AppError::Validation(message)) if message == "select an operation first"
    ));
}

#[test]
fn prepare_trims_number_values() {
    let prepared = prepare_command("read", &values(&[("fd", " 3 "), ("size", "1024")]));
    assert!(matches!(
        prepared,
        Ok(command) if command.params().get("fd").map(String::as_str) == Some("3")
    ));
}
