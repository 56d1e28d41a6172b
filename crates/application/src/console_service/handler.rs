use serde_json::Value;
use syscon_core::{AppError, AppResult};
use syscon_domain::{CurrentSession, Session, Theme, find_operation};

use super::REGISTRATION_NOTICE;
use super::events::{ConsoleEffect, ConsoleEvent};
use super::state::{CommandEpoch, ConsoleState};
use crate::{
    EnterHook, LoginRequest, RegisterRequest, ViewAction, ViewState, ensure_permitted,
    prepare_command, route,
};

/// Applies one event and returns the next state plus the effects to perform.
///
/// Events that make no sense for the active panel leave the state untouched.
#[must_use]
pub fn handle_event(
    mut state: ConsoleState,
    event: ConsoleEvent,
) -> (ConsoleState, Vec<ConsoleEffect>) {
    let mut effects = Vec::new();

    match event {
        ConsoleEvent::Started { session, theme } => {
            state.theme = theme;
            if let CurrentSession::Authenticated(session) = session {
                navigate(
                    &mut state,
                    &mut effects,
                    ViewAction::LoginSucceeded {
                        role: session.role(),
                        username: None,
                    },
                );
            }
        }
        ConsoleEvent::ShowRegister => {
            if navigate(&mut state, &mut effects, ViewAction::ShowRegister) {
                state.register_response.clear();
            }
        }
        ConsoleEvent::ShowLogin => {
            if navigate(&mut state, &mut effects, ViewAction::ShowLogin) {
                state.login_response.clear();
            }
        }
        ConsoleEvent::SubmitLogin { username, password } => {
            if state.view == ViewState::AnonymousLogin {
                match require_credentials(&username, &password) {
                    Ok(()) => {
                        state.login_response.clear();
                        effects.push(ConsoleEffect::Login(LoginRequest { username, password }));
                    }
                    Err(error) => state.login_response.fail(error.user_message()),
                }
            }
        }
        ConsoleEvent::LoginCompleted { username, result } => {
            login_completed(&mut state, &mut effects, username, result);
        }
        ConsoleEvent::SubmitRegister {
            username,
            password,
            role,
        } => {
            if state.view == ViewState::AnonymousRegister {
                match require_credentials(&username, &password) {
                    Ok(()) => {
                        state.register_response.clear();
                        effects.push(ConsoleEffect::Register(RegisterRequest {
                            username,
                            password,
                            role,
                        }));
                    }
                    Err(error) => state.register_response.fail(error.user_message()),
                }
            }
        }
        ConsoleEvent::RegisterCompleted { result } => match result {
            Ok(()) => {
                if navigate(&mut state, &mut effects, ViewAction::ShowLogin) {
                    state.register_response.clear();
                    state.login_response.succeed(REGISTRATION_NOTICE);
                } else {
                    state.register_response.succeed(REGISTRATION_NOTICE);
                }
            }
            Err(error) => state.register_response.fail(error.user_message()),
        },
        ConsoleEvent::Logout => {
            if navigate(&mut state, &mut effects, ViewAction::Logout) {
                state.login_response.clear();
                effects.insert(0, ConsoleEffect::ClearSession);
            }
        }
        ConsoleEvent::SelectOperation { name } => select_operation(&mut state, &name),
        ConsoleEvent::SetField { field_id, value } => {
            if state.view.is_authenticated()
                && let Err(error) = state.form.set_value(&field_id, value)
            {
                state.command_response.fail(error.user_message());
            }
        }
        ConsoleEvent::SubmitCommand => submit_command(&mut state, &mut effects),
        ConsoleEvent::CommandCompleted {
            operation,
            epoch,
            result,
        } => {
            command_completed(&mut state, &mut effects, &operation, epoch, result);
        }
        ConsoleEvent::RefreshLogs => {
            if state.view.is_authenticated() {
                let ticket = state.logs.begin_refresh();
                effects.push(ConsoleEffect::FetchLogs(ticket));
            }
        }
        ConsoleEvent::LogsFetched { ticket, result } => {
            state.logs.complete_refresh(ticket, result);
        }
        ConsoleEvent::FilterLogs { username, syscall } => {
            if state.view.is_authenticated() {
                state.logs.apply_filter(&username, &syscall);
            }
        }
        ConsoleEvent::CatalogLoaded { result } => {
            if state.view.is_authenticated() {
                state.catalog = result.unwrap_or_default();
            }
        }
        ConsoleEvent::ToggleTheme => {
            state.theme = state.theme.toggled();
            effects.push(ConsoleEffect::PersistTheme(state.theme));
        }
        ConsoleEvent::ResetTheme => {
            state.theme = Theme::default();
            effects.push(ConsoleEffect::ClearTheme);
        }
        ConsoleEvent::StorageFailed(error) => {
            state.visible_response_mut().fail(error.user_message());
        }
    }

    (state, effects)
}

fn navigate(
    state: &mut ConsoleState,
    effects: &mut Vec<ConsoleEffect>,
    action: ViewAction,
) -> bool {
    let change = route(&state.view, action);
    if !change.changed() {
        return false;
    }

    state.view = change.next;
    for hook in change.hooks {
        match hook {
            EnterHook::ResetForm => {
                state.form.clear();
                state.command_response.clear();
            }
            EnterHook::RefreshLogs => {
                let ticket = state.logs.begin_refresh();
                effects.push(ConsoleEffect::FetchLogs(ticket));
            }
            EnterHook::LoadCatalog => effects.push(ConsoleEffect::LoadCatalog),
            EnterHook::ClearConsole => {
                state.command_epoch = state.command_epoch.advanced();
                state.form.clear();
                state.command_response.clear();
                state.logs.clear();
                state.catalog.clear();
            }
        }
    }

    true
}

fn require_credentials(username: &str, password: &str) -> AppResult<()> {
    if username.trim().is_empty() {
        return Err(AppError::Validation("Username is required".to_owned()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("Password is required".to_owned()));
    }
    Ok(())
}

fn login_completed(
    state: &mut ConsoleState,
    effects: &mut Vec<ConsoleEffect>,
    username: String,
    result: AppResult<Session>,
) {
    if state.view != ViewState::AnonymousLogin {
        return;
    }

    match result {
        Ok(session) => {
            let role = session.role();
            effects.push(ConsoleEffect::SetSession(session));
            navigate(
                state,
                effects,
                ViewAction::LoginSucceeded {
                    role,
                    username: Some(username),
                },
            );
            state.login_response.clear();
        }
        Err(error) => state.login_response.fail(error.user_message()),
    }
}

fn select_operation(state: &mut ConsoleState, name: &str) {
    let Some(role) = state.view.role() else {
        return;
    };

    if let Some(operation) = find_operation(name.trim())
        && let Err(error) = ensure_permitted(operation, role)
    {
        state.form.clear();
        state.command_response.fail(error.user_message());
        return;
    }

    state.form.build_form(name);
}

fn submit_command(state: &mut ConsoleState, effects: &mut Vec<ConsoleEffect>) {
    let Some(role) = state.view.role() else {
        return;
    };

    let operation_name = state.form.operation().map_or("", |operation| operation.name);
    let values = state.form.values();
    let checked = prepare_command(operation_name, &values)
        .and_then(|prepared| ensure_permitted(prepared.operation(), role));

    match checked {
        Ok(()) => effects.push(ConsoleEffect::ExecuteCommand {
            operation: operation_name.to_owned(),
            values,
            epoch: state.command_epoch,
        }),
        Err(error) => state.command_response.fail(error.user_message()),
    }
}

fn command_completed(
    state: &mut ConsoleState,
    effects: &mut Vec<ConsoleEffect>,
    operation: &str,
    epoch: CommandEpoch,
    result: AppResult<Value>,
) {
    if !state.view.is_authenticated() || epoch != state.command_epoch {
        return;
    }

    match result {
        Ok(value) => {
            state
                .command_response
                .succeed(format!("Success: {}", render_result(&value)));
            let ticket = state.logs.begin_refresh();
            effects.push(ConsoleEffect::FetchLogs(ticket));
        }
        Err(error) => {
            let message = error.user_message();
            if message.is_empty() {
                state.command_response.fail(format!("{operation} failed"));
            } else {
                state.command_response.fail(message);
            }
        }
    }
}

fn render_result(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
