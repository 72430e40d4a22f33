use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    client::{
        api::{ApiError, ApiErrorKind, AuthApi, HttpAuthApi},
        storage::{FileTokenStorage, TokenStorage, AUTH_TOKEN_KEY},
    },
    config::ClientConfig,
    models::dto::UserSummary,
};

/// Snapshot of the client's authentication status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserSummary>,
    pub is_loading: bool,
}

impl Session {
    pub fn loading() -> Self {
        Self {
            token: None,
            user: None,
            is_loading: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            token: None,
            user: None,
            is_loading: false,
        }
    }

    pub fn signed_in(token: String, user: UserSummary) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
            is_loading: false,
        }
    }

    /// A token on its own never counts: only a resolved user does.
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Header value for authenticated API calls, available only while
    /// logged in.
    pub fn authorization_header(&self) -> Option<String> {
        match (&self.token, self.is_logged_in()) {
            (Some(token), true) => Some(format!("Bearer {}", token)),
            _ => None,
        }
    }
}

/// Owns the client session and publishes every change to subscribers.
///
/// Construct one at the composition root, call [`SessionStore::initialize`]
/// once at startup and hand out receivers from [`SessionStore::subscribe`]
/// to whatever renders views.
pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn TokenStorage>,
    state: watch::Sender<Session>,
    whoami_timeout: Duration,
    /// Bumped by every explicit login or logout. A restore only applies its
    /// outcome if no such change happened while it was waiting.
    generation: Mutex<u64>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn AuthApi>, storage: Arc<dyn TokenStorage>, whoami_timeout: Duration) -> Self {
        let (state, _) = watch::channel(Session::loading());
        Self {
            api,
            storage,
            state,
            whoami_timeout,
            generation: Mutex::new(0),
        }
    }

    /// HTTP client plus file-backed storage, as configured by the environment.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            Arc::new(HttpAuthApi::new(&config.api_base_url)),
            Arc::new(FileTokenStorage::new(config.session_file.clone())),
            config.whoami_timeout,
        )
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().is_logged_in()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<UserSummary> {
        self.state.borrow().user.clone()
    }

    fn stored_token(&self) -> Option<String> {
        match self.storage.get(AUTH_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(err) => {
                log::warn!("Could not read stored session token: {}", err);
                None
            }
        }
    }

    fn discard_stored_token(&self) {
        if let Err(err) = self.storage.remove(AUTH_TOKEN_KEY) {
            log::warn!("Could not remove stored session token: {}", err);
        }
    }

    /// Restores the session from durable storage, resolving a stored token
    /// through the identity endpoint. `is_loading` stays true until this
    /// returns or an explicit login/logout supersedes the restore.
    pub async fn initialize(&self, cancel: &CancellationToken) -> Session {
        let started = {
            let generation = self.generation.lock().unwrap_or_else(|e| e.into_inner());
            self.state.send_replace(Session::loading());
            *generation
        };

        let Some(token) = self.stored_token() else {
            self.apply_restore(started, |_| Session::signed_out());
            return self.session();
        };

        let outcome = match tokio::time::timeout(
            self.whoami_timeout,
            self.api.who_am_i(&token, cancel),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ApiError::new(
                ApiErrorKind::Timeout,
                "Identity lookup timed out.",
            )),
        };

        self.apply_restore(started, |store| match outcome {
            Ok(user) => {
                log::info!("Session restored for {}", user.username);
                Session::signed_in(token, user)
            }
            Err(err) if err.kind == ApiErrorKind::Cancelled => {
                // no verdict on the token; keep it for the next start
                log::debug!("Session restore cancelled");
                Session::signed_out()
            }
            Err(err) => {
                match err.kind {
                    ApiErrorKind::Unauthorized => log::info!("Stored session token rejected"),
                    _ => log::warn!("Session restore failed: {}", err),
                }
                store.discard_stored_token();
                Session::signed_out()
            }
        });

        self.session()
    }

    /// Runs `resolve` and publishes its session unless a login or logout
    /// landed after the restore started. In that case the newer session and
    /// its stored token are left alone.
    fn apply_restore(&self, started: u64, resolve: impl FnOnce(&Self) -> Session) {
        let generation = self.generation.lock().unwrap_or_else(|e| e.into_inner());
        if *generation != started {
            log::debug!("Session changed during restore; dropping restore outcome");
            return;
        }
        let session = resolve(self);
        self.state.send_replace(session);
    }

    /// Records a login obtained from the login endpoint. No round-trip is
    /// made: the caller already holds verified data.
    pub fn login(&self, token: String, user: UserSummary) {
        let mut generation = self.generation.lock().unwrap_or_else(|e| e.into_inner());
        *generation += 1;
        if let Err(err) = self.storage.set(AUTH_TOKEN_KEY, &token) {
            log::warn!("Could not persist session token: {}", err);
        }
        log::info!("Logged in as {}", user.username);
        self.state.send_replace(Session::signed_in(token, user));
    }

    /// Forgets the session locally. The token stays valid on the server
    /// until it expires.
    pub fn logout(&self) {
        let mut generation = self.generation.lock().unwrap_or_else(|e| e.into_inner());
        *generation += 1;
        self.discard_stored_token();
        self.state.send_replace(Session::signed_out());
        log::info!("Logged out");
    }
}
