//! Syscall console: terminal front end over the console state machine.

#![forbid(unsafe_code)]

mod console_config;
mod render;
mod repl_command;

use std::io::Write as _;
use std::sync::Arc;

use syscon_application::{ClientStateStore, ConsoleEvent, ConsoleRuntime, EffectExecutor};
use syscon_core::{AppError, AppResult};
use syscon_infrastructure::{FileClientStateStore, HttpConsoleBackend, InMemoryClientStateStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::console_config::{ConsoleConfig, StateBackend, init_tracing};
use crate::render::{render_changes, render_operations, render_state};
use crate::repl_command::{HELP, ReplCommand, parse_command};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let storage: Arc<dyn ClientStateStore> = match config.state_backend {
        StateBackend::File => Arc::new(FileClientStateStore::new(config.state_path.clone())),
        StateBackend::Memory => Arc::new(InMemoryClientStateStore::new()),
    };
    let backend = Arc::new(HttpConsoleBackend::with_timeout(
        config.api_base_url.clone(),
        config.request_timeout,
    )?);

    info!(
        api_base_url = %config.api_base_url,
        state_backend = ?config.state_backend,
        state_path = %config.state_path.display(),
        request_timeout_ms = config.request_timeout.as_millis(),
        "syscon-console started"
    );

    run(ConsoleRuntime::new(EffectExecutor::new(backend, storage))).await
}

async fn run(mut console: ConsoleRuntime) -> AppResult<()> {
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel::<ConsoleEvent>();

    let started = console.executor().startup_event().await;
    drive(&mut console, started, &completion_tx).await;
    print_output(&render_state(console.state()));
    print_prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.map_err(|error| {
                    AppError::Internal(format!("failed to read console input: {error}"))
                })?
                else {
                    break;
                };

                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(ReplCommand::Event(event))) => {
                        let before = console.state().clone();
                        drive(&mut console, event, &completion_tx).await;
                        print_output(&render_changes(&before, console.state()));
                    }
                    Ok(Some(ReplCommand::Operations)) => {
                        print_output(&render_operations(console.state()));
                    }
                    Ok(Some(ReplCommand::Show)) => print_output(&render_state(console.state())),
                    Ok(Some(ReplCommand::Help)) => print_output(HELP),
                    Ok(Some(ReplCommand::Quit)) => break,
                    Err(error) => print_output(&error.user_message()),
                }
                print_prompt();
            }
            Some(event) = completion_rx.recv() => {
                let before = console.state().clone();
                drive(&mut console, event, &completion_tx).await;
                let changes = render_changes(&before, console.state());
                if !changes.is_empty() {
                    print_output(&changes);
                    print_prompt();
                }
            }
        }
    }

    info!("syscon-console stopped");
    Ok(())
}

/// Applies an event, runs its storage effects inline and spawns its requests.
async fn drive(
    console: &mut ConsoleRuntime,
    event: ConsoleEvent,
    completion_tx: &mpsc::UnboundedSender<ConsoleEvent>,
) {
    for effect in console.step(event).await {
        let executor = console.executor().clone();
        let completion_tx = completion_tx.clone();
        tokio::spawn(async move {
            if let Some(completion) = executor.perform(effect).await
                && completion_tx.send(completion).is_err()
            {
                warn!("console loop closed before a request completed");
            }
        });
    }
}

fn print_output(text: &str) {
    if text.trim().is_empty() {
        return;
    }
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{}", text.trim_end());
}

fn print_prompt() {
    let mut stdout = std::io::stdout().lock();
    let _ = write!(stdout, "> ");
    let _ = stdout.flush();
}
