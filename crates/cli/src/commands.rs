//! Command-line surface over the repository and session store.

use std::path::PathBuf;

use anyhow::{bail, Result};
use campuslend_core::{
    models::CATEGORIES, notifications, Item, ItemStatus, ProfilePatch, Repository, SessionState,
    SessionStore, Transaction, TransactionFilter, TransactionKind, TransactionStatus,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

/// Active rentals ending within this many days get a reminder.
const REMINDER_WINDOW_DAYS: i64 = 3;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "campuslend")]
#[command(author, version, about = "Campus peer-to-peer lending marketplace", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "CAMPUSLEND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override log filter
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List items, optionally filtered by title and category
    Items {
        /// Case-insensitive title search
        #[arg(short, long, default_value = "")]
        query: String,
        /// Category filter (All, Electronics, Books, Sports, Tools, Other)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show a single item
    Item {
        /// Item ID
        id: String,
    },

    /// List a new item for lending
    AddItem {
        /// Item ID
        id: String,
        /// Listing title
        title: String,
        /// Price per day
        price: i64,
        #[arg(short, long, default_value = "Other")]
        category: String,
        /// Glyph shown instead of a photo
        #[arg(long, default_value = "📦")]
        image: String,
        /// Owner display name (defaults to the profile name)
        #[arg(long)]
        owner: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Change an item's availability
    SetStatus {
        /// Item ID
        id: String,
        /// available, pending or borrowed
        status: ItemStatus,
    },

    /// List transactions
    Transactions {
        /// all, pending, active, completed or overdue
        #[arg(short, long, default_value = "all")]
        status: TransactionFilter,
    },

    /// Record a borrow or lend transaction
    AddTransaction {
        /// Transaction ID
        id: String,
        /// borrow or lend
        kind: TransactionKind,
        item_name: String,
        other_user: String,
        price: i64,
        /// Start date (YYYY-MM-DD)
        start_date: String,
        /// End date (YYYY-MM-DD)
        end_date: String,
        #[arg(short, long, default_value = "pending")]
        status: TransactionStatus,
        #[arg(long, default_value = "📦")]
        image: String,
    },

    /// Show the user profile
    Profile,

    /// Edit profile fields
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        course: Option<String>,
        #[arg(long)]
        year_level: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },

    /// Add (or with a negative amount, deduct) credits
    Credits {
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },

    /// Toggle an item in the favourites
    Favorite {
        /// Item ID
        id: String,
    },

    /// List favourite items
    Favorites,

    /// Search item titles and remember the query
    Search {
        query: String,
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show recent searches
    History {
        /// Forget all recent searches
        #[arg(long)]
        clear: bool,
    },

    /// Sign in
    Login { email: String, password: String },

    /// Create an account and sign in
    Register {
        email: String,
        password: String,
        name: String,
        course: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,
}

impl Command {
    /// Subcommand name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Items { .. } => "items",
            Command::Item { .. } => "item",
            Command::AddItem { .. } => "add-item",
            Command::SetStatus { .. } => "set-status",
            Command::Transactions { .. } => "transactions",
            Command::AddTransaction { .. } => "add-transaction",
            Command::Profile => "profile",
            Command::UpdateProfile { .. } => "update-profile",
            Command::Credits { .. } => "credits",
            Command::Favorite { .. } => "favorite",
            Command::Favorites => "favorites",
            Command::Search { .. } => "search",
            Command::History { .. } => "history",
            Command::Login { .. } => "login",
            Command::Register { .. } => "register",
            Command::Logout => "logout",
            Command::Whoami => "whoami",
        }
    }
}

/// Execute `command` against the shared stores.
pub async fn run(command: Command, repository: &Repository, session: &SessionStore) -> Result<()> {
    match command {
        Command::Items { query, category } => {
            check_category(category.as_deref())?;
            print_items(repository, &repository.items_matching(&query, category.as_deref()));
        }
        Command::Item { id } => match repository.item(&id) {
            Some(item) => println!("{}", serde_json::to_string_pretty(&item)?),
            None => bail!("no item with id {id}"),
        },
        Command::AddItem {
            id,
            title,
            price,
            category,
            image,
            owner,
            description,
        } => {
            let owner = owner.unwrap_or_else(|| repository.user_profile().name);
            repository.add_item(Item {
                id: id.clone(),
                title,
                price,
                category,
                status: ItemStatus::Available,
                image,
                rating: 0.0,
                owner,
                description,
            });
            println!("Listed item {id}");
        }
        Command::SetStatus { id, status } => {
            let Some(item) = repository.item(&id) else {
                bail!("no item with id {id}");
            };
            repository.set_item_status(&id, status);
            println!("Item {id} is now {status}");
            if item.status == ItemStatus::Borrowed && status == ItemStatus::Available {
                println!("{}", notifications::item_returned(&item.title, item.price));
            }
        }
        Command::Transactions { status } => {
            let transactions = repository.transactions_with_status(status);
            for transaction in &transactions {
                print_transaction(transaction);
            }
            let today = Local::now().date_naive();
            for transaction in &transactions {
                if let Some(days) = days_left(transaction, today) {
                    println!("{}", notifications::rental_reminder(&transaction.item_name, days));
                }
            }
        }
        Command::AddTransaction {
            id,
            kind,
            item_name,
            other_user,
            price,
            start_date,
            end_date,
            status,
            image,
        } => {
            if kind == TransactionKind::Lend && status == TransactionStatus::Pending {
                println!("{}", notifications::new_lend_request(&other_user, &item_name));
            }
            repository.add_transaction(Transaction {
                id: id.clone(),
                kind,
                item_name,
                other_user,
                price,
                start_date,
                end_date,
                status,
                image,
            });
            println!("Recorded transaction {id}");
        }
        Command::Profile => {
            println!("{}", serde_json::to_string_pretty(&repository.user_profile())?);
        }
        Command::UpdateProfile {
            name,
            course,
            year_level,
            email,
            phone,
        } => {
            let patch = ProfilePatch {
                name,
                course,
                year_level,
                email,
                phone,
                ..ProfilePatch::default()
            };
            if patch.is_empty() {
                bail!("nothing to update");
            }
            repository.update_user_profile(patch);
            println!("{}", serde_json::to_string_pretty(&repository.user_profile())?);
        }
        Command::Credits { amount } => {
            let balance = repository.add_credits(amount);
            if amount > 0 {
                println!("{}", notifications::credits_earned(amount));
            }
            println!("Balance: {balance} credits");
        }
        Command::Favorite { id } => {
            if repository.toggle_favorite(&id) {
                println!("Added {id} to favourites");
            } else {
                println!("Removed {id} from favourites");
            }
        }
        Command::Favorites => print_items(repository, &repository.favorite_items()),
        Command::Search { query, category } => {
            check_category(category.as_deref())?;
            repository.add_search_history(&query);
            print_items(repository, &repository.items_matching(&query, category.as_deref()));
        }
        Command::History { clear } => {
            if clear {
                repository.clear_search_history();
                println!("Search history cleared");
            } else {
                for (index, query) in repository.search_history().iter().enumerate() {
                    println!("{:>2}. {query}", index + 1);
                }
            }
        }
        Command::Login { email, password } => {
            let user = session.login(&email, &password).await?;
            println!("Signed in as {} ({})", user.name, user.email);
        }
        Command::Register {
            email,
            password,
            name,
            course,
        } => {
            let user = session.register(&email, &password, &name, &course).await?;
            println!("Welcome, {}! Your id is {}", user.name, user.id);
        }
        Command::Logout => {
            session.logout().await;
            println!("Signed out");
        }
        Command::Whoami => match session.state() {
            SessionState::Authenticated(user) => {
                println!("{} <{}> · {} · {}", user.name, user.email, user.course, user.id)
            }
            _ => println!("Not signed in"),
        },
    }
    Ok(())
}

/// Days until an active rental ends, when that falls inside the reminder window.
fn days_left(transaction: &Transaction, today: NaiveDate) -> Option<u32> {
    if transaction.status != TransactionStatus::Active {
        return None;
    }
    let end = NaiveDate::parse_from_str(&transaction.end_date, "%Y-%m-%d").ok()?;
    let days = (end - today).num_days();
    if (0..=REMINDER_WINDOW_DAYS).contains(&days) {
        u32::try_from(days).ok()
    } else {
        None
    }
}

fn check_category(category: Option<&str>) -> Result<()> {
    match category {
        Some(category) if !CATEGORIES.contains(&category) => {
            bail!("unknown category {category}; expected one of {}", CATEGORIES.join(", "))
        }
        _ => Ok(()),
    }
}

fn print_items(repository: &Repository, items: &[Item]) {
    if items.is_empty() {
        println!("No items found");
        return;
    }
    for item in items {
        let marker = if repository.is_favorite(&item.id) { "★" } else { " " };
        println!(
            "{marker} [{}] {} {} · {} · ₱{}/day · {} · ⭐ {:.1} · {}",
            item.id, item.image, item.title, item.category, item.price, item.status, item.rating,
            item.owner
        );
    }
}

fn print_transaction(transaction: &Transaction) {
    println!(
        "[{}] {} {} {} · {} · ₱{} · {} → {} · {} {}",
        transaction.id,
        transaction.image,
        transaction.kind,
        transaction.item_name,
        transaction.other_user,
        transaction.price,
        transaction.start_date,
        transaction.end_date,
        transaction.status.icon(),
        transaction.status
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rental(status: TransactionStatus, end_date: &str) -> Transaction {
        Transaction {
            id: "2".to_string(),
            kind: TransactionKind::Borrow,
            item_name: "Canon EOS Camera".to_string(),
            other_user: "Mike Johnson".to_string(),
            price: 120,
            start_date: "2024-01-12".to_string(),
            end_date: end_date.to_string(),
            status,
            image: "📷".to_string(),
        }
    }

    #[test]
    fn reminders_cover_active_rentals_ending_soon() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 13).unwrap();

        assert_eq!(days_left(&rental(TransactionStatus::Active, "2024-01-15"), today), Some(2));
        assert_eq!(days_left(&rental(TransactionStatus::Active, "2024-01-13"), today), Some(0));
        assert_eq!(days_left(&rental(TransactionStatus::Active, "2024-01-30"), today), None);
        assert_eq!(days_left(&rental(TransactionStatus::Active, "2024-01-10"), today), None);
        assert_eq!(days_left(&rental(TransactionStatus::Pending, "2024-01-15"), today), None);
        assert_eq!(days_left(&rental(TransactionStatus::Active, "soon"), today), None);
    }

    #[test]
    fn command_names_match_subcommands() {
        let cli = Cli::try_parse_from(["campuslend", "credits", "80"]).unwrap();
        assert_eq!(cli.command.name(), "credits");

        let cli = Cli::try_parse_from(["campuslend", "set-status", "3", "available"]).unwrap();
        assert_eq!(cli.command.name(), "set-status");

        let cli = Cli::try_parse_from(["campuslend", "credits", "-50"]).unwrap();
        assert!(matches!(cli.command, Command::Credits { amount: -50 }));
    }
}
