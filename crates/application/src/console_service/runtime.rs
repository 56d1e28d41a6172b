use std::collections::VecDeque;
use std::sync::Arc;

use syscon_core::AppResult;
use syscon_domain::{CurrentSession, SyscallSummary, Theme};
use tracing::{debug, warn};

use super::events::{ConsoleEffect, ConsoleEvent};
use super::handler::handle_event;
use super::state::ConsoleState;
use crate::{AuditLogService, ClientStateStore, CommandDispatcher, ConsoleBackend, SessionStore};

/// Performs console effects against the ports.
#[derive(Clone)]
pub struct EffectExecutor {
    backend: Arc<dyn ConsoleBackend>,
    storage: Arc<dyn ClientStateStore>,
    session: Arc<SessionStore>,
    dispatcher: CommandDispatcher,
    audit_log: AuditLogService,
}

impl EffectExecutor {
    /// Wires the session store, dispatcher and log service over the ports.
    #[must_use]
    pub fn new(backend: Arc<dyn ConsoleBackend>, storage: Arc<dyn ClientStateStore>) -> Self {
        let session = Arc::new(SessionStore::new(storage.clone()));
        Self {
            dispatcher: CommandDispatcher::new(backend.clone(), session.clone()),
            audit_log: AuditLogService::new(backend.clone(), session.clone()),
            backend,
            storage,
            session,
        }
    }

    /// Returns the shared session store.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Loads persisted session and theme into a startup event.
    ///
    /// Storage failures degrade to an anonymous session and the default theme.
    pub async fn startup_event(&self) -> ConsoleEvent {
        let session = match self.session.restore().await {
            Ok(session) => session,
            Err(error) => {
                warn!(error = %error, "failed to restore persisted session");
                CurrentSession::Unauthenticated
            }
        };

        let theme = match self.storage.load_theme().await {
            Ok(theme) => theme.unwrap_or_default(),
            Err(error) => {
                warn!(error = %error, "failed to load theme preference");
                Theme::default()
            }
        };

        ConsoleEvent::Started { session, theme }
    }

    /// Performs one effect and returns its completion event, if it has one.
    pub async fn perform(&self, effect: ConsoleEffect) -> Option<ConsoleEvent> {
        debug!(effect = effect.name(), "performing console effect");

        match effect {
            ConsoleEffect::Register(request) => Some(ConsoleEvent::RegisterCompleted {
                result: self.backend.register(&request).await,
            }),
            ConsoleEffect::Login(request) => {
                let result = self.backend.login(&request).await;
                if let Err(error) = &result {
                    warn!(class = error.class().as_str(), error = %error, "login failed");
                }
                Some(ConsoleEvent::LoginCompleted {
                    username: request.username,
                    result,
                })
            }
            ConsoleEffect::SetSession(session) => {
                storage_outcome(self.session.store(session).await)
            }
            ConsoleEffect::ClearSession => storage_outcome(self.session.clear_session().await),
            ConsoleEffect::ExecuteCommand {
                operation,
                values,
                epoch,
            } => {
                let result = self.dispatcher.execute(&operation, &values).await;
                Some(ConsoleEvent::CommandCompleted {
                    operation,
                    epoch,
                    result,
                })
            }
            ConsoleEffect::FetchLogs(ticket) => Some(ConsoleEvent::LogsFetched {
                ticket,
                result: self.audit_log.fetch_logs().await,
            }),
            ConsoleEffect::LoadCatalog => Some(ConsoleEvent::CatalogLoaded {
                result: self.load_catalog().await,
            }),
            ConsoleEffect::PersistTheme(theme) => {
                storage_outcome(self.storage.save_theme(theme).await)
            }
            ConsoleEffect::ClearTheme => storage_outcome(self.storage.clear_theme().await),
        }
    }

    async fn load_catalog(&self) -> AppResult<Vec<SyscallSummary>> {
        let result = match self.session.bearer_token() {
            Ok(token) => self.backend.list_syscalls(&token).await,
            Err(error) => Err(error),
        };

        if let Err(error) = &result {
            warn!(error = %error, "failed to load syscall catalog");
        }

        result
    }
}

fn storage_outcome(result: AppResult<()>) -> Option<ConsoleEvent> {
    result.err().map(|error| {
        warn!(error = %error, "client storage effect failed");
        ConsoleEvent::StorageFailed(error)
    })
}

/// Owns the console state and drives events through the handler.
pub struct ConsoleRuntime {
    state: ConsoleState,
    executor: EffectExecutor,
}

impl ConsoleRuntime {
    /// Creates a runtime in the initial anonymous state.
    #[must_use]
    pub fn new(executor: EffectExecutor) -> Self {
        Self {
            state: ConsoleState::default(),
            executor,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    /// Returns the effect executor.
    #[must_use]
    pub fn executor(&self) -> &EffectExecutor {
        &self.executor
    }

    /// Applies one event without performing any effect.
    pub fn apply(&mut self, event: ConsoleEvent) -> Vec<ConsoleEffect> {
        let state = std::mem::take(&mut self.state);
        let (next, effects) = handle_event(state, event);
        self.state = next;
        effects
    }

    /// Applies an event and performs its local effects inline.
    ///
    /// Returns the network effects, in order, for the caller to perform.
    pub async fn step(&mut self, event: ConsoleEvent) -> Vec<ConsoleEffect> {
        let mut pending = VecDeque::from([event]);
        let mut network = Vec::new();

        while let Some(event) = pending.pop_front() {
            for effect in self.apply(event) {
                if !effect.is_local() {
                    network.push(effect);
                    continue;
                }
                if let Some(completion) = self.executor.perform(effect).await {
                    pending.push_back(completion);
                }
            }
        }

        network
    }

    /// Drives an event and every completion it causes until idle.
    pub async fn dispatch(&mut self, event: ConsoleEvent) {
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            for effect in self.step(event).await {
                if let Some(completion) = self.executor.perform(effect).await {
                    queue.push_back(completion);
                }
            }
        }
    }
}
