use std::str::FromStr;

use syscon_application::ConsoleEvent;
use syscon_core::{AppError, AppResult, Role};

pub const HELP: &str = "\
commands:
  login <username> <password>               log in
  register <username> <password> [role]    create an account (role: user|admin)
  show-register | show-login                switch between the login and register forms
  logout                                    drop the session
  ops                                       list the operations available to your role
  select <operation>                        build the form for an operation
  set <field> <value...>                    fill a form field
  submit                                    send the selected operation
  logs                                      refresh the audit log
  filter [user=<text>] [syscall=<text>]     filter the audit log; no arguments clears it
  theme [toggle|reset]                      switch or forget the color theme
  show                                      redraw the console
  help                                      show this help
  quit                                      leave the console";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Event(ConsoleEvent),
    Operations,
    Show,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> AppResult<Option<ReplCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim_start()));
    let arguments = rest.split_whitespace().collect::<Vec<_>>();

    let command = match verb {
        "login" => match arguments.as_slice() {
            [username, password] => ReplCommand::Event(ConsoleEvent::SubmitLogin {
                username: (*username).to_owned(),
                password: (*password).to_owned(),
            }),
            _ => return Err(usage("login <username> <password>")),
        },
        "register" => {
            let (username, password, role) = match arguments.as_slice() {
                [username, password] => (*username, *password, Role::User),
                [username, password, role] => (*username, *password, Role::from_str(role)?),
                _ => return Err(usage("register <username> <password> [user|admin]")),
            };
            ReplCommand::Event(ConsoleEvent::SubmitRegister {
                username: username.to_owned(),
                password: password.to_owned(),
                role,
            })
        }
        "show-register" => ReplCommand::Event(ConsoleEvent::ShowRegister),
        "show-login" => ReplCommand::Event(ConsoleEvent::ShowLogin),
        "logout" => ReplCommand::Event(ConsoleEvent::Logout),
        "ops" => ReplCommand::Operations,
        "select" => match arguments.as_slice() {
            [name] => ReplCommand::Event(ConsoleEvent::SelectOperation {
                name: (*name).to_owned(),
            }),
            _ => return Err(usage("select <operation>")),
        },
        "set" => {
            let Some((field_id, value)) = rest
                .split_once(char::is_whitespace)
                .map(|(field_id, value)| (field_id, value.trim_start()))
                .or_else(|| (!rest.is_empty()).then_some((rest, "")))
            else {
                return Err(usage("set <field> <value...>"));
            };
            ReplCommand::Event(ConsoleEvent::SetField {
                field_id: field_id.to_owned(),
                value: value.to_owned(),
            })
        }
        "submit" => ReplCommand::Event(ConsoleEvent::SubmitCommand),
        "logs" => ReplCommand::Event(ConsoleEvent::RefreshLogs),
        "filter" => parse_filter(&arguments)?,
        "theme" => match arguments.as_slice() {
            [] | ["toggle"] => ReplCommand::Event(ConsoleEvent::ToggleTheme),
            ["reset"] => ReplCommand::Event(ConsoleEvent::ResetTheme),
            _ => return Err(usage("theme [toggle|reset]")),
        },
        "show" => ReplCommand::Show,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        other => {
            return Err(AppError::Validation(format!(
                "unknown command '{other}', type 'help' for a list"
            )));
        }
    };

    Ok(Some(command))
}

fn parse_filter(arguments: &[&str]) -> AppResult<ReplCommand> {
    let mut username = String::new();
    let mut syscall = String::new();

    for argument in arguments {
        match argument.split_once('=') {
            Some(("user", value)) => value.clone_into(&mut username),
            Some(("syscall", value)) => value.clone_into(&mut syscall),
            _ => return Err(usage("filter [user=<text>] [syscall=<text>]")),
        }
    }

    Ok(ReplCommand::Event(ConsoleEvent::FilterLogs { username, syscall }))
}

fn usage(text: &str) -> AppError {
    AppError::Validation(format!("usage: {text}"))
}
