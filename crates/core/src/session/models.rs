use serde::{Deserialize, Serialize};

/// Identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Stable identifier (`user_…`).
    pub id: String,
    /// Email used to sign in.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Degree programme.
    pub course: String,
}

/// Authentication state of the device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Stored session not yet checked.
    #[default]
    Unresolved,
    /// Nobody is signed in.
    Anonymous,
    /// A user is signed in.
    Authenticated(AuthUser),
}

impl SessionState {
    /// True until the stored session has been checked.
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Unresolved)
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}
