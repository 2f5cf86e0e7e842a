//! Authenticated identity and its persistence.

mod models;
mod store;

pub use models::{AuthUser, SessionState};
pub use store::{SessionStore, DEFAULT_COURSE, LOGIN_USER_ID};
