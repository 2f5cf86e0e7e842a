//! Session store.
//!
//! Holds at most one [`AuthUser`] and mirrors it to the `currentUser` storage key.
//! No credentials are checked against anything: login and registration only
//! validate their input and synthesise an identity.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::models::{AuthUser, SessionState};
use crate::{
    error::{ValidationError, MIN_PASSWORD_LEN},
    storage::{keys, KeyValueStore},
};

/// Identifier assigned to every user created by [`SessionStore::login`].
pub const LOGIN_USER_ID: &str = "user_123";

/// Course assigned to users created by [`SessionStore::login`].
pub const DEFAULT_COURSE: &str = "Computer Science";

/// Shared handle to the current session. Clones observe the same state.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Create an unresolved session backed by `store`. Call [`restore`](Self::restore)
    /// to resolve it.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::Unresolved)),
            store,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<AuthUser> {
        self.state.read().user().cloned()
    }

    /// True until [`restore`](Self::restore) has completed.
    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading()
    }

    /// Resolve the session from storage. Missing, unreadable or unparsable data all
    /// resolve to [`SessionState::Anonymous`].
    pub async fn restore(&self) -> SessionState {
        let restored = match self.store.get(keys::CURRENT_USER).await {
            Ok(Some(raw)) => match serde_json::from_str::<AuthUser>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!("stored session is unreadable: {err}");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!("failed to read stored session: {err}");
                None
            }
        };

        let state = match restored {
            Some(user) => {
                info!(user = %user.id, "session restored");
                SessionState::Authenticated(user)
            }
            None => {
                debug!("no stored session");
                SessionState::Anonymous
            }
        };
        *self.state.write() = state.clone();
        state
    }

    /// Sign in. The user's name is the part of `email` before `@`.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, ValidationError> {
        if email.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }

        let name = email.split('@').next().unwrap_or(email);
        let user = AuthUser {
            id: LOGIN_USER_ID.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            course: DEFAULT_COURSE.to_string(),
        };

        self.authenticate(user.clone()).await;
        Ok(user)
    }

    /// Create an account and sign in with a freshly generated id.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        course: &str,
    ) -> Result<AuthUser, ValidationError> {
        if [email, password, name, course]
            .iter()
            .any(|field| field.is_empty())
        {
            return Err(ValidationError::MissingFields);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }

        let user = AuthUser {
            id: format!("user_{}", Utc::now().timestamp_millis()),
            email: email.to_string(),
            name: name.to_string(),
            course: course.to_string(),
        };

        self.authenticate(user.clone()).await;
        Ok(user)
    }

    /// Sign out and forget the stored session. Marketplace data is left alone.
    pub async fn logout(&self) {
        *self.state.write() = SessionState::Anonymous;
        info!("signed out");
        if let Err(err) = self.store.remove(keys::CURRENT_USER).await {
            warn!("failed to remove stored session: {err}");
        }
    }

    async fn authenticate(&self, user: AuthUser) {
        info!(user = %user.id, "signed in");
        *self.state.write() = SessionState::Authenticated(user.clone());

        let payload = match serde_json::to_string(&user) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("failed to serialise session: {err}");
                return;
            }
        };
        if let Err(err) = self.store.set(keys::CURRENT_USER, &payload).await {
            warn!("failed to persist session: {err}");
        }
    }
}
