use std::fmt::Write as _;

use syscon_application::{
    CommandForm, ConsoleState, LogDisplay, LogViewer, ResponseRegion, ResponseTone, ViewState,
};
use syscon_domain::{InputKind, Theme};

const RESET: &str = "\x1b[0m";

fn tone_color(theme: Theme, tone: ResponseTone) -> &'static str {
    match (theme, tone) {
        (Theme::Light, ResponseTone::Success) => "\x1b[32m",
        (Theme::Light, ResponseTone::Error) => "\x1b[31m",
        (Theme::Dark, ResponseTone::Success) => "\x1b[92m",
        (Theme::Dark, ResponseTone::Error) => "\x1b[91m",
    }
}

/// Renders the whole visible console.
pub fn render_state(state: &ConsoleState) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "== {} == (theme: {})",
        panel_title(&state.view),
        state.theme.as_str()
    );

    match &state.view {
        ViewState::AnonymousLogin => {
            output.push_str("login <username> <password>  |  show-register\n");
            push_response(&mut output, state.theme, &state.login_response);
        }
        ViewState::AnonymousRegister => {
            output.push_str("register <username> <password> [user|admin]  |  show-login\n");
            push_response(&mut output, state.theme, &state.register_response);
        }
        ViewState::Authenticated { role, username } => {
            let _ = writeln!(
                output,
                "logged in as {} ({})",
                username.as_deref().unwrap_or("restored session"),
                role.as_str()
            );
            output.push_str(&render_form(&state.form));
            push_response(&mut output, state.theme, &state.command_response);
            output.push_str(&render_logs(&state.logs));
        }
    }

    output
}

/// Renders only the regions that differ between two states.
pub fn render_changes(before: &ConsoleState, after: &ConsoleState) -> String {
    if before.view != after.view || before.theme != after.theme {
        return render_state(after);
    }

    let mut output = String::new();
    for (old, new) in [
        (&before.login_response, &after.login_response),
        (&before.register_response, &after.register_response),
        (&before.command_response, &after.command_response),
    ] {
        if old != new {
            push_response(&mut output, after.theme, new);
        }
    }
    if before.form != after.form {
        output.push_str(&render_form(&after.form));
    }
    if before.logs.display() != after.logs.display() {
        output.push_str(&render_logs(&after.logs));
    }
    output
}

/// Lists the operations visible to the session role.
pub fn render_operations(state: &ConsoleState) -> String {
    let operations = state.view.visible_operations();
    if operations.is_empty() {
        return "log in to see the available operations\n".to_owned();
    }

    let mut output = String::from("operations:\n");
    for operation in operations {
        let description = state
            .catalog
            .iter()
            .find(|summary| summary.name == operation.name && !summary.description.is_empty())
            .map_or(operation.description, |summary| summary.description.as_str());
        let _ = writeln!(
            output,
            "  {:<11} [{}] {description}",
            operation.name,
            operation.class.as_str()
        );
    }
    output
}

fn panel_title(view: &ViewState) -> &'static str {
    match view {
        ViewState::AnonymousLogin => "Login",
        ViewState::AnonymousRegister => "Register",
        ViewState::Authenticated { .. } => "Syscall Console",
    }
}

fn push_response(output: &mut String, theme: Theme, region: &ResponseRegion) {
    if let Some(message) = region.message() {
        let _ = writeln!(
            output,
            "{}{}{RESET}",
            tone_color(theme, message.tone),
            message.text
        );
    }
}

fn render_form(form: &CommandForm) -> String {
    let Some(operation) = form.operation() else {
        return "no operation selected (select <operation>)\n".to_owned();
    };

    let mut output = String::new();
    let _ = writeln!(output, "operation: {}", operation.name);
    if form.fields().is_empty() {
        output.push_str("  (no parameters)\n");
    }
    for field in form.fields() {
        let value = if field.value().is_empty() {
            format!("<{}>", field.placeholder())
        } else {
            field.value().to_owned()
        };
        let kind = match field.input_kind() {
            InputKind::File => " (local file path)",
            InputKind::Number => " (integer)",
            InputKind::Text | InputKind::TextArea => "",
        };
        let marker = if field.required() { "*" } else { "" };
        let _ = writeln!(
            output,
            "  {}{marker} [{}]{kind}: {value}",
            field.label(),
            field.field_id()
        );
    }
    output
}

fn render_logs(logs: &LogViewer) -> String {
    let mut output = String::from("-- audit log --\n");
    let filter = logs.filter();
    if !filter.is_empty() {
        let _ = writeln!(
            output,
            "filter: user~'{}' syscall~'{}'",
            filter.username(),
            filter.syscall()
        );
    }

    match logs.display() {
        LogDisplay::Cleared => output.push_str("(not loaded)\n"),
        LogDisplay::NoEntries => output.push_str("No logs found\n"),
        LogDisplay::Failed(message) => {
            let _ = writeln!(output, "Error loading logs: {message}");
        }
        LogDisplay::Entries(entries) => {
            for entry in entries {
                let _ = writeln!(
                    output,
                    "{} | {} | {} | {} | {}",
                    entry.display_timestamp(),
                    entry.username,
                    entry.syscall,
                    entry.params_text(),
                    entry.outcome_text()
                );
            }
        }
    }
    output
}
