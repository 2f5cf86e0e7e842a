#![warn(clippy::all, missing_docs)]

//! Core state for the campus lending marketplace.
//!
//! This crate hosts the data models, the persisted entity repository, the
//! session store and configuration handling used by the command-line
//! frontend and any future clients.

pub mod config;
pub mod defaults;
pub mod error;
pub mod models;
pub mod notifications;
pub mod repository;
pub mod session;
pub mod storage;

pub use self::config::AppConfig;
pub use error::ValidationError;
pub use models::{
    Item, ItemStatus, ProfilePatch, Transaction, TransactionFilter, TransactionKind,
    TransactionStatus, UserProfile,
};
pub use repository::Repository;
pub use session::{AuthUser, SessionState, SessionStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
