//! Launch targets and the work sessions running in them

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::api::{Directory, Session, Transport};
use crate::core::{RelayError, failure_detail};

/// Asks the user to confirm a destructive action
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything, for `--yes` style invocations
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    Killed,
    Declined,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub directories: Vec<Directory>,
    pub sessions: Vec<Session>,
    /// Every directory trigger shares this flag
    pub triggers_enabled: bool,
    /// Last failure surfaced to the user
    pub alert: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            directories: Vec::new(),
            sessions: Vec::new(),
            triggers_enabled: true,
            alert: None,
        }
    }
}

#[derive(Clone)]
pub struct SessionManager {
    transport: Arc<dyn Transport>,
    state: Arc<RwLock<SessionState>>,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SessionState {
        self.read().clone()
    }

    pub async fn list_directories(&self) -> Result<Vec<Directory>, RelayError> {
        let directories = self.transport.directories().await.inspect_err(|err| {
            tracing::error!("Failed to load directories: {}", err);
        })?;
        self.write().directories = directories.clone();
        Ok(directories)
    }

    pub async fn list_sessions(&self) -> Result<Vec<Session>, RelayError> {
        let sessions = self.transport.sessions().await.inspect_err(|err| {
            tracing::error!("Failed to load sessions: {}", err);
        })?;
        self.write().sessions = sessions.clone();
        Ok(sessions)
    }

    /// Reloads sessions after a start or kill. A failed reload leaves the
    /// old list up and says so in the alert.
    async fn refresh_after_change(&self) {
        if let Err(err) = self.list_sessions().await {
            self.write().alert = Some(format!(
                "Failed to refresh sessions: {}",
                failure_detail(&err)
            ));
        }
    }

    /// Starts a session in `path`. All directory triggers are disabled while
    /// the request is in flight. Whether a second session for the same path
    /// is allowed is up to the server.
    pub async fn start_session(&self, path: &str) -> Result<(), RelayError> {
        {
            let mut state = self.write();
            if !state.triggers_enabled {
                return Err(RelayError::Busy);
            }
            state.triggers_enabled = false;
            state.alert = None;
        }

        let result = self.transport.start_session(path).await;
        self.write().triggers_enabled = true;

        match result {
            Ok(()) => {
                tracing::info!("Started session in {}", path);
                // The list is only a view, a failed reload does not undo the start
                self.refresh_after_change().await;
                Ok(())
            }
            Err(err) => {
                tracing::error!("Failed to start session in {}: {}", path, err);
                self.write().alert = Some(format!("Error: {}", failure_detail(&err)));
                Err(err)
            }
        }
    }

    /// Kills a session after the user confirms. The session stays in the
    /// list until a refresh no longer returns it.
    pub async fn kill_session(
        &self,
        name: &str,
        confirm: &dyn Confirm,
    ) -> Result<KillOutcome, RelayError> {
        if !confirm.confirm(&format!("Kill session \"{}\"?", name)) {
            return Ok(KillOutcome::Declined);
        }

        self.write().alert = None;
        match self.transport.kill_session(name).await {
            Ok(()) => {
                tracing::info!("Killed session {}", name);
                // Same as start: the kill went through even if the reload fails
                self.refresh_after_change().await;
                Ok(KillOutcome::Killed)
            }
            Err(err) => {
                tracing::error!("Failed to kill session {}: {}", name, err);
                self.write().alert = Some(format!("Error: {}", failure_detail(&err)));
                Err(err)
            }
        }
    }
}
