//! In-memory entity repository with write-behind persistence.
//!
//! [`Repository`] is the single owner of items, transactions, the user profile,
//! favourites and search history. Every mutation updates memory under the write lock
//! and queues the affected collection for storage before returning, so reads observe
//! the change immediately while the durable copy catches up in the background.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::{
    defaults,
    models::{
        Item, ItemStatus, ProfilePatch, Transaction, TransactionFilter, UserProfile,
        ALL_CATEGORIES,
    },
    storage::{keys, KeyValueStore, PersistQueue},
};

/// Maximum number of remembered search queries.
pub const SEARCH_HISTORY_LIMIT: usize = 10;

/// Shared handle to the marketplace state. Clones observe the same data.
#[derive(Clone)]
pub struct Repository {
    inner: Arc<RwLock<Inner>>,
    queue: PersistQueue,
}

#[derive(Debug, Clone)]
struct Inner {
    items: Vec<Item>,
    transactions: Vec<Transaction>,
    profile: UserProfile,
    favorites: Vec<String>,
    search_history: Vec<String>,
}

impl Repository {
    /// Restore every collection from `store`, falling back to the built-in data for
    /// any key that is missing or unreadable, and start the background writer.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let items = load_or(store.as_ref(), keys::ITEMS, defaults::items).await;
        let transactions =
            load_or(store.as_ref(), keys::TRANSACTIONS, defaults::transactions).await;
        let profile = load_or(store.as_ref(), keys::USER_PROFILE, defaults::user_profile).await;
        let favorites = load_or(store.as_ref(), keys::FAVORITES, defaults::favorites).await;
        let search_history =
            load_or(store.as_ref(), keys::SEARCH_HISTORY, defaults::search_history).await;

        let favorites = dedup_preserving_order(favorites);
        let search_history = normalize_history(search_history);

        info!(
            items = items.len(),
            transactions = transactions.len(),
            favorites = favorites.len(),
            searches = search_history.len(),
            "repository loaded"
        );

        Self {
            inner: Arc::new(RwLock::new(Inner {
                items,
                transactions,
                profile,
                favorites,
                search_history,
            })),
            queue: PersistQueue::spawn(store),
        }
    }

    /// All items in insertion order.
    pub fn items(&self) -> Vec<Item> {
        self.inner.read().items.clone()
    }

    /// Item with the given id. With duplicate ids the most recently added wins.
    pub fn item(&self, id: &str) -> Option<Item> {
        self.inner
            .read()
            .items
            .iter()
            .rev()
            .find(|item| item.id == id)
            .cloned()
    }

    /// Items whose title contains `query` (case-insensitive) within `category`.
    ///
    /// `None` or `"All"` disables the category filter; an empty query matches every
    /// title.
    pub fn items_matching(&self, query: &str, category: Option<&str>) -> Vec<Item> {
        let needle = query.trim();
        let category = category.unwrap_or(ALL_CATEGORIES);
        self.inner
            .read()
            .items
            .iter()
            .filter(|item| item.matches_title(needle) && item.in_category(category))
            .cloned()
            .collect()
    }

    /// Append a new listing.
    pub fn add_item(&self, item: Item) {
        let mut inner = self.inner.write();
        debug!(id = %item.id, "adding item");
        inner.items.push(item);
        self.queue.enqueue(keys::ITEMS, &inner.items);
    }

    /// Set the status of every item with `id`. Returns `false`, and writes nothing,
    /// when no item matches.
    pub fn set_item_status(&self, id: &str, status: ItemStatus) -> bool {
        let mut inner = self.inner.write();
        let mut found = false;
        for item in inner.items.iter_mut().filter(|item| item.id == id) {
            item.status = status;
            found = true;
        }
        if !found {
            debug!(id, "status change for unknown item ignored");
            return false;
        }
        debug!(id, %status, "item status updated");
        self.queue.enqueue(keys::ITEMS, &inner.items);
        true
    }

    /// All transactions in insertion order.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.inner.read().transactions.clone()
    }

    /// Transactions accepted by `filter`, in insertion order.
    pub fn transactions_with_status(&self, filter: TransactionFilter) -> Vec<Transaction> {
        self.inner
            .read()
            .transactions
            .iter()
            .filter(|transaction| filter.matches(transaction))
            .cloned()
            .collect()
    }

    /// Record a new transaction.
    pub fn add_transaction(&self, transaction: Transaction) {
        let mut inner = self.inner.write();
        debug!(id = %transaction.id, kind = %transaction.kind, "adding transaction");
        inner.transactions.push(transaction);
        self.queue.enqueue(keys::TRANSACTIONS, &inner.transactions);
    }

    /// Current profile snapshot.
    pub fn user_profile(&self) -> UserProfile {
        self.inner.read().profile.clone()
    }

    /// Merge `patch` over the profile.
    pub fn update_user_profile(&self, patch: ProfilePatch) {
        let mut inner = self.inner.write();
        patch.apply(&mut inner.profile);
        self.queue.enqueue(keys::USER_PROFILE, &inner.profile);
    }

    /// Add `amount` (possibly negative) to the credit balance and return the new
    /// balance. No floor is applied.
    pub fn add_credits(&self, amount: i64) -> i64 {
        let mut inner = self.inner.write();
        let credits = inner.profile.credits.saturating_add(amount);
        ProfilePatch::credits(credits).apply(&mut inner.profile);
        debug!(amount, credits, "credits adjusted");
        self.queue.enqueue(keys::USER_PROFILE, &inner.profile);
        credits
    }

    /// Favourite item ids in the order they were added.
    pub fn favorites(&self) -> Vec<String> {
        self.inner.read().favorites.clone()
    }

    /// Whether `id` is among the favourites.
    pub fn is_favorite(&self, id: &str) -> bool {
        self.inner.read().favorites.iter().any(|fav| fav == id)
    }

    /// Favourited items that still exist, in favourites order.
    pub fn favorite_items(&self) -> Vec<Item> {
        let inner = self.inner.read();
        inner
            .favorites
            .iter()
            .filter_map(|id| inner.items.iter().rev().find(|item| &item.id == id))
            .cloned()
            .collect()
    }

    /// Add `id` to the favourites, or remove it if already present. Returns whether
    /// the id is a favourite afterwards.
    pub fn toggle_favorite(&self, id: &str) -> bool {
        let mut inner = self.inner.write();
        let now_favorite = match inner.favorites.iter().position(|fav| fav == id) {
            Some(index) => {
                inner.favorites.remove(index);
                false
            }
            None => {
                inner.favorites.push(id.to_string());
                true
            }
        };
        self.queue.enqueue(keys::FAVORITES, &inner.favorites);
        now_favorite
    }

    /// Recent queries, most recent first.
    pub fn search_history(&self) -> Vec<String> {
        self.inner.read().search_history.clone()
    }

    /// Move `query` to the front of the history. Blank queries are ignored.
    ///
    /// The query is stored as given; only the blank check trims it.
    pub fn add_search_history(&self, query: &str) {
        if query.trim().is_empty() {
            return;
        }
        let mut inner = self.inner.write();
        inner.search_history.retain(|entry| entry != query);
        inner.search_history.insert(0, query.to_string());
        inner.search_history.truncate(SEARCH_HISTORY_LIMIT);
        self.queue.enqueue(keys::SEARCH_HISTORY, &inner.search_history);
    }

    /// Forget every recent query.
    pub fn clear_search_history(&self) {
        let mut inner = self.inner.write();
        inner.search_history.clear();
        self.queue.enqueue(keys::SEARCH_HISTORY, &inner.search_history);
    }

    /// Wait for every write issued so far to reach storage (or fail).
    pub async fn flush(&self) {
        self.queue.flush().await;
    }
}

async fn load_or<T, F>(store: &dyn KeyValueStore, key: &str, fallback: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match store.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key, "restored from storage");
                value
            }
            Err(err) => {
                warn!(key, "stored value is unreadable, using defaults: {err}");
                fallback()
            }
        },
        Ok(None) => {
            debug!(key, "nothing stored, using defaults");
            fallback()
        }
        Err(err) => {
            warn!(key, "failed to read from storage, using defaults: {err}");
            fallback()
        }
    }
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(values.len());
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

fn normalize_history(history: Vec<String>) -> Vec<String> {
    let mut history: Vec<String> = dedup_preserving_order(history)
        .into_iter()
        .filter(|entry| !entry.trim().is_empty())
        .collect();
    history.truncate(SEARCH_HISTORY_LIMIT);
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{TransactionKind, TransactionStatus},
        storage::{FileStore, MemoryStore},
    };
    use anyhow::Result;
    use tempfile::tempdir;

    async fn fresh() -> (Repository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let repository = Repository::load(store.clone()).await;
        (repository, store)
    }

    fn sample_item(id: &str, title: &str) -> Item {
        Item {
            id: id.to_string(),
            title: title.to_string(),
            price: 25,
            category: "Tools".to_string(),
            status: ItemStatus::Available,
            image: "🔧".to_string(),
            rating: 4.2,
            owner: "Carlo Reyes".to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn empty_storage_yields_defaults() {
        let (repository, _) = fresh().await;
        assert_eq!(repository.items().len(), 6);
        assert_eq!(repository.transactions().len(), 3);
        assert_eq!(repository.user_profile().name, "Juan Dela Cruz");
        assert_eq!(repository.favorites(), vec!["1", "4"]);
        assert!(repository.search_history().is_empty());
    }

    #[tokio::test]
    async fn unreadable_key_falls_back_per_key() {
        let store = Arc::new(MemoryStore::new());
        store.insert(keys::ITEMS, "{not json");
        store.insert(keys::FAVORITES, r#"["5"]"#);

        let repository = Repository::load(store.clone()).await;
        assert_eq!(repository.items(), defaults::items());
        assert_eq!(repository.favorites(), vec!["5"]);
    }

    #[tokio::test]
    async fn failed_reads_fall_back_to_defaults() {
        let store = Arc::new(MemoryStore::new());
        store.insert(keys::FAVORITES, r#"["5"]"#);
        store.fail_reads(true);

        let repository = Repository::load(store.clone()).await;
        assert_eq!(repository.favorites(), vec!["1", "4"]);
    }

    #[tokio::test]
    async fn set_status_on_default_calculator() {
        let (repository, _) = fresh().await;
        let before = repository.item("3").unwrap();

        assert!(repository.set_item_status("3", ItemStatus::Available));

        let after = repository.item("3").unwrap();
        assert_eq!(after.status, ItemStatus::Available);
        assert_eq!(after.owner, "Mike Johnson");
        assert_eq!(after.price, 15);
        assert_eq!(
            Item {
                status: before.status,
                ..after
            },
            before
        );
    }

    #[tokio::test]
    async fn set_status_for_unknown_id_changes_nothing() {
        let (repository, store) = fresh().await;
        let before = repository.items();

        assert!(!repository.set_item_status("404", ItemStatus::Borrowed));
        repository.flush().await;

        assert_eq!(repository.items(), before);
        assert!(store.value(keys::ITEMS).is_none());
    }

    #[tokio::test]
    async fn added_item_is_visible_and_persisted() {
        let (repository, store) = fresh().await;
        repository.add_item(sample_item("7", "Cordless Drill"));

        assert_eq!(repository.items().len(), 7);
        assert_eq!(repository.items().last().unwrap().id, "7");

        repository.flush().await;
        let stored: Vec<Item> = serde_json::from_str(&store.value(keys::ITEMS).unwrap()).unwrap();
        assert_eq!(stored, repository.items());
    }

    #[tokio::test]
    async fn duplicate_ids_read_last_added() {
        let (repository, _) = fresh().await;
        repository.add_item(sample_item("1", "Second Laptop"));

        assert_eq!(repository.item("1").unwrap().title, "Second Laptop");
        repository.set_item_status("1", ItemStatus::Borrowed);
        assert!(repository
            .items()
            .iter()
            .filter(|item| item.id == "1")
            .all(|item| item.status == ItemStatus::Borrowed));
    }

    #[tokio::test]
    async fn items_matching_filters_title_and_category() {
        let (repository, _) = fresh().await;

        let electronics = repository.items_matching("", Some("Electronics"));
        assert_eq!(electronics.len(), 4);

        let books = repository.items_matching("PHYSICS", None);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, "2");

        assert!(repository.items_matching("physics", Some("Sports")).is_empty());
        assert_eq!(repository.items_matching("  ", Some("All")).len(), 6);
    }

    #[tokio::test]
    async fn transactions_filter_by_status() {
        let (repository, _) = fresh().await;
        repository.add_transaction(Transaction {
            id: "4".to_string(),
            kind: TransactionKind::Lend,
            item_name: "Cordless Drill".to_string(),
            other_user: "Ana Cruz".to_string(),
            price: 25,
            start_date: "2024-02-01".to_string(),
            end_date: "2024-02-03".to_string(),
            status: TransactionStatus::Pending,
            image: "🔧".to_string(),
        });

        assert_eq!(repository.transactions().len(), 4);
        assert_eq!(
            repository
                .transactions_with_status(TransactionFilter::All)
                .len(),
            4
        );
        let pending_filter = TransactionFilter::Status(TransactionStatus::Pending);
        let pending = repository.transactions_with_status(pending_filter);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "4");
    }

    #[tokio::test]
    async fn add_credits_matches_profile_patch() {
        let (by_credits, _) = fresh().await;
        let (by_patch, _) = fresh().await;

        for amount in [150, -3000, 0, 42] {
            let current = by_patch.user_profile().credits;
            by_patch.update_user_profile(ProfilePatch::credits(current + amount));
            by_credits.add_credits(amount);
            assert_eq!(by_credits.user_profile(), by_patch.user_profile());
        }
        assert_eq!(by_credits.user_profile().credits, 2450 + 150 - 3000 + 42);
    }

    #[tokio::test]
    async fn profile_patch_keeps_absent_fields() {
        let (repository, store) = fresh().await;
        repository.update_user_profile(ProfilePatch {
            year_level: Some("4th Year".to_string()),
            ..ProfilePatch::default()
        });

        let profile = repository.user_profile();
        assert_eq!(profile.year_level, "4th Year");
        assert_eq!(profile.email, "juan.delacruz@ustp.edu.ph");

        repository.flush().await;
        let stored: UserProfile =
            serde_json::from_str(&store.value(keys::USER_PROFILE).unwrap()).unwrap();
        assert_eq!(stored, profile);
    }

    #[tokio::test]
    async fn toggling_twice_restores_favorites() {
        let (repository, _) = fresh().await;
        let before = repository.favorites();

        assert!(repository.toggle_favorite("5"));
        assert!(repository.is_favorite("5"));
        assert!(!repository.toggle_favorite("5"));
        assert_eq!(repository.favorites(), before);

        assert!(!repository.toggle_favorite("1"));
        assert!(!repository.is_favorite("1"));
        assert!(repository.toggle_favorite("1"));
        assert_eq!(repository.favorites(), vec!["4", "1"]);
    }

    #[tokio::test]
    async fn favorite_items_skip_missing_ids() {
        let (repository, _) = fresh().await;
        repository.toggle_favorite("gone");

        let items: Vec<String> = repository
            .favorite_items()
            .into_iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(items, vec!["1", "4"]);
    }

    #[tokio::test]
    async fn search_history_is_bounded_and_deduplicated() {
        let (repository, _) = fresh().await;
        for round in 0..25 {
            repository.add_search_history(&format!("query {}", round % 13));
            let history = repository.search_history();
            assert!(history.len() <= SEARCH_HISTORY_LIMIT);
            assert_eq!(history[0], format!("query {}", round % 13));
            let mut unique = history.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), history.len());
        }

        repository.add_search_history("query 5");
        repository.add_search_history("query 5");
        let history = repository.search_history();
        assert_eq!(history.len(), SEARCH_HISTORY_LIMIT);
        assert_eq!(history[0], "query 5");
        assert_eq!(history.iter().filter(|entry| *entry == "query 5").count(), 1);
    }

    #[tokio::test]
    async fn blank_queries_are_ignored() {
        let (repository, _) = fresh().await;
        repository.add_search_history("arduino");

        repository.add_search_history("");
        repository.add_search_history("   ");
        repository.add_search_history("\t\n");
        assert_eq!(repository.search_history(), vec!["arduino"]);
    }

    #[tokio::test]
    async fn clearing_history_persists_empty_list() {
        let (repository, store) = fresh().await;
        repository.add_search_history("camera");
        repository.clear_search_history();

        assert!(repository.search_history().is_empty());
        repository.flush().await;
        assert_eq!(store.value(keys::SEARCH_HISTORY).as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn state_survives_restart() {
        let store = Arc::new(MemoryStore::new());
        let repository = Repository::load(store.clone()).await;
        repository.add_item(sample_item("7", "Cordless Drill"));
        repository.set_item_status("2", ItemStatus::Borrowed);
        repository.add_credits(-450);
        repository.toggle_favorite("7");
        repository.add_search_history("drill");
        repository.flush().await;

        let restored = Repository::load(store.clone()).await;
        assert_eq!(restored.items(), repository.items());
        assert_eq!(restored.transactions(), repository.transactions());
        assert_eq!(restored.user_profile(), repository.user_profile());
        assert_eq!(restored.favorites(), repository.favorites());
        assert_eq!(restored.search_history(), repository.search_history());
    }

    #[tokio::test]
    async fn state_survives_restart_on_disk() -> Result<()> {
        let dir = tempdir()?;
        let store = Arc::new(FileStore::new(dir.path().join("store"))?);
        let repository = Repository::load(store.clone()).await;
        repository.add_item(sample_item("7", "Cordless Drill"));
        repository.set_item_status("5", ItemStatus::Pending);
        repository.update_user_profile(ProfilePatch {
            phone: Some("+63 918 765 4321".to_string()),
            ..ProfilePatch::default()
        });
        repository.toggle_favorite("4");
        repository.add_search_history(" spaced ");
        repository.flush().await;

        let restored = Repository::load(store.clone()).await;
        assert_eq!(restored.items(), repository.items());
        assert_eq!(restored.transactions(), repository.transactions());
        assert_eq!(restored.user_profile(), repository.user_profile());
        assert_eq!(restored.favorites(), vec!["1"]);
        assert_eq!(restored.search_history(), vec![" spaced "]);
        Ok(())
    }

    #[tokio::test]
    async fn padded_queries_are_stored_as_given() {
        let (repository, store) = fresh().await;
        repository.add_search_history(" spaced ");
        repository.add_search_history("spaced");

        assert_eq!(repository.search_history(), vec!["spaced", " spaced "]);
        repository.flush().await;
        assert_eq!(
            store.value(keys::SEARCH_HISTORY).as_deref(),
            Some(r#"["spaced"," spaced "]"#)
        );
    }

    #[tokio::test]
    async fn failed_write_keeps_memory_but_is_lost_on_restart() {
        let store = Arc::new(MemoryStore::new());
        let repository = Repository::load(store.clone()).await;

        store.fail_writes(true);
        repository.toggle_favorite("6");
        repository.flush().await;
        assert!(repository.is_favorite("6"));

        store.fail_writes(false);
        let restored = Repository::load(store.clone()).await;
        assert!(!restored.is_favorite("6"));
    }

    #[tokio::test]
    async fn stored_history_is_normalised_on_load() {
        let store = Arc::new(MemoryStore::new());
        let stored: Vec<String> = (0..12)
            .map(|n| format!("q{}", n % 11))
            .chain(["  ".to_string()])
            .collect();
        store.insert(keys::SEARCH_HISTORY, serde_json::to_string(&stored).unwrap());

        let repository = Repository::load(store.clone()).await;
        let history = repository.search_history();
        assert_eq!(history.len(), SEARCH_HISTORY_LIMIT);
        assert_eq!(history[0], "q0");
    }

    #[tokio::test]
    async fn stored_favorites_are_deduplicated_on_load() {
        let store = Arc::new(MemoryStore::new());
        store.insert(keys::FAVORITES, r#"["2","1","2","4","1"]"#);

        let repository = Repository::load(store.clone()).await;
        assert_eq!(repository.favorites(), vec!["2", "1", "4"]);

        assert!(!repository.toggle_favorite("2"));
        assert!(!repository.is_favorite("2"));
    }
}
