use dashmap::{mapref::entry::Entry, DashMap};
use protocol::ChallengerSnapshot;
use std::sync::Arc;
use uuid::Uuid;

use super::vault::SecretVault;
use crate::auth_token::{AuthTokenError, AuthTokenService};
use crate::challenges::ChallengeProgress;
use crate::config::ServerConfig;
use crate::store::TodoStore;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Challenger {0} not found")]
    NotFound(String),

    #[error("Invalid challenger id: {0}")]
    InvalidId(String),

    #[error("Challenger id mismatch: path {path}, payload {payload}")]
    IdMismatch { path: String, payload: String },

    #[error("Failed to issue auth token: {0}")]
    Token(#[from] AuthTokenError),
}

/// Whether a restore replaced an existing session or created a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Created,
    Updated,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub max_todos: usize,
    pub seed_todos: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_todos: crate::config::DEFAULT_MAX_TODOS,
            seed_todos: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChallengerState {
    pub id: String,
    pub todos: TodoStore,
    pub vault: SecretVault,
    pub auth_token: String,
    pub progress: ChallengeProgress,
}

impl ChallengerState {
    pub fn snapshot(&self) -> ChallengerSnapshot {
        ChallengerSnapshot {
            x_challenger: self.id.clone(),
            x_auth_token: self.auth_token.clone(),
            secret_note: self.vault.note().to_string(),
            challenge_status: self.progress.status_map(),
        }
    }
}

#[derive(Clone)]
pub struct SessionRegistry {
    // challenger id -> state
    sessions: Arc<DashMap<String, ChallengerState>>,
    tokens: AuthTokenService,
    settings: SessionSettings,
}

impl SessionRegistry {
    pub fn new(settings: SessionSettings, tokens: AuthTokenService) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            tokens,
            settings,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, AuthTokenError> {
        let settings = SessionSettings {
            max_todos: config.max_todos,
            seed_todos: config.seed_todos,
        };
        Ok(Self::new(settings, AuthTokenService::from_config(&config.auth)?))
    }

    fn fresh_store(&self) -> TodoStore {
        if self.settings.seed_todos {
            TodoStore::seeded(self.settings.max_todos)
        } else {
            TodoStore::new(self.settings.max_todos)
        }
    }

    /// Allocates a new session with the default todos and a minted token.
    pub fn create(&self) -> Result<ChallengerSnapshot, SessionError> {
        let id = Uuid::new_v4().to_string();
        let auth_token = self.tokens.issue_for(&id)?;

        let state = ChallengerState {
            id: id.clone(),
            todos: self.fresh_store(),
            vault: SecretVault::default(),
            auth_token,
            progress: ChallengeProgress::default(),
        };
        let snapshot = state.snapshot();
        self.sessions.insert(id.clone(), state);

        log::info!("Created challenger session {}", id);
        Ok(snapshot)
    }

    /// Loads a snapshot under `id`. An existing session keeps its todos and
    /// takes the snapshot's note, token and progress; an unknown id gets a
    /// fresh session built from the snapshot.
    pub fn restore(
        &self,
        id: &str,
        snapshot: &ChallengerSnapshot,
    ) -> Result<(RestoreOutcome, ChallengerSnapshot), SessionError> {
        let parsed = Uuid::parse_str(id).map_err(|_| SessionError::InvalidId(id.to_string()))?;
        let id = parsed.to_string();

        if !snapshot.x_challenger.is_empty() && !snapshot.x_challenger.eq_ignore_ascii_case(&id) {
            return Err(SessionError::IdMismatch {
                path: id,
                payload: snapshot.x_challenger.clone(),
            });
        }

        let auth_token = match self.tokens.verify_for(&snapshot.x_auth_token, &id) {
            Ok(_) => snapshot.x_auth_token.clone(),
            Err(_) => self.tokens.issue_for(&id)?,
        };
        let vault = SecretVault::with_note(snapshot.secret_note.clone());
        let progress = ChallengeProgress::from_status_map(&snapshot.challenge_status);

        let (outcome, restored) = match self.sessions.entry(id.clone()) {
            Entry::Occupied(mut entry) => {
                let state = entry.get_mut();
                state.vault = vault;
                state.auth_token = auth_token;
                state.progress = progress;
                (RestoreOutcome::Updated, state.snapshot())
            }
            Entry::Vacant(entry) => {
                let state = ChallengerState {
                    id: id.clone(),
                    todos: self.fresh_store(),
                    vault,
                    auth_token,
                    progress,
                };
                let restored = state.snapshot();
                entry.insert(state);
                (RestoreOutcome::Created, restored)
            }
        };

        log::info!("Restored challenger session {} ({:?})", id, outcome);
        Ok((outcome, restored))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn snapshot(&self, id: &str) -> Option<ChallengerSnapshot> {
        self.sessions.get(id).map(|state| state.snapshot())
    }

    /// Runs `f` against the session while holding its entry lock.
    pub fn with_challenger<R>(&self, id: &str, f: impl FnOnce(&ChallengerState) -> R) -> Option<R> {
        self.sessions.get(id).map(|state| f(&state))
    }

    /// Mutable variant of [`Self::with_challenger`]. Requests on the same
    /// session are serialised here, so read-modify-write sequences inside
    /// `f` cannot interleave.
    pub fn with_challenger_mut<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut ChallengerState) -> R,
    ) -> Option<R> {
        self.sessions.get_mut(id).map(|mut state| f(&mut state))
    }

    /// Mints a fresh token for the session and records it as current.
    pub fn issue_token(&self, id: &str) -> Result<String, SessionError> {
        if !self.contains(id) {
            return Err(SessionError::NotFound(id.to_string()));
        }

        let token = self.tokens.issue_for(id)?;
        self.with_challenger_mut(id, |state| state.auth_token = token.clone())
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;

        log::info!("Issued auth token for challenger {}", id);
        Ok(token)
    }

    /// Checks that `token` was issued to the session `id`.
    pub fn authorize(&self, id: &str, token: &str) -> Result<(), AuthTokenError> {
        self.tokens.verify_for(token, id).map(|_| ())
    }

    /// Marks challenges complete; returns how many were newly completed.
    pub fn complete_challenges(&self, id: &str, keys: &[&str]) -> usize {
        self.with_challenger_mut(id, |state| {
            keys.iter()
                .filter(|key| state.progress.complete(key))
                .count()
        })
        .unwrap_or(0)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
