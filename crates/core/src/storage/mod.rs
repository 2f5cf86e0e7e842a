//! Durable key-value storage beneath the repository and session store.
//!
//! Values are opaque strings (JSON in practice) stored under a small fixed set of
//! keys. Nothing is atomic across keys.

mod error;
mod file;
mod memory;
mod queue;

use async_trait::async_trait;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use queue::PersistQueue;

/// Storage keys, one per persisted collection.
pub mod keys {
    /// Listed items.
    pub const ITEMS: &str = "borrowItems";
    /// Borrow/lend transactions.
    pub const TRANSACTIONS: &str = "transactions";
    /// The single user profile.
    pub const USER_PROFILE: &str = "userProfile";
    /// Favourite item ids.
    pub const FAVORITES: &str = "favoriteItems";
    /// Recent search queries.
    pub const SEARCH_HISTORY: &str = "searchHistory";
    /// The signed-in identity.
    pub const CURRENT_USER: &str = "currentUser";
}

/// Asynchronous string-keyed store.
///
/// Implementations must be thread-safe (`Send + Sync`); handles are shared as
/// `Arc<dyn KeyValueStore>`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, or `None` when nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
