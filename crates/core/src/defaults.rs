//! Built-in data used whenever a storage key is missing or unreadable.

use once_cell::sync::Lazy;

use crate::models::{
    Item, ItemStatus, Transaction, TransactionKind, TransactionStatus, UserProfile,
};

static ITEMS: Lazy<Vec<Item>> = Lazy::new(|| {
    vec![
        item(
            "1",
            "Laptop - Dell XPS 13",
            50,
            "Electronics",
            ItemStatus::Available,
            "💻",
            4.8,
            "John Doe",
            "High-performance laptop, great for coding",
        ),
        item(
            "2",
            "Textbook - Physics 101",
            10,
            "Books",
            ItemStatus::Available,
            "📚",
            4.5,
            "Jane Smith",
            "Latest edition physics textbook",
        ),
        item(
            "3",
            "Scientific Calculator",
            15,
            "Electronics",
            ItemStatus::Pending,
            "🧮",
            4.7,
            "Mike Johnson",
            "For engineering calculations",
        ),
        item(
            "4",
            "Project Kit - Arduino",
            30,
            "Electronics",
            ItemStatus::Available,
            "⚙️",
            4.9,
            "Sarah Lee",
            "Complete Arduino development kit",
        ),
        item(
            "5",
            "Canon EOS Camera",
            100,
            "Electronics",
            ItemStatus::Available,
            "📷",
            4.9,
            "Robert Chen",
            "Professional DSLR camera",
        ),
        item(
            "6",
            "Sports Bicycle",
            80,
            "Sports",
            ItemStatus::Available,
            "🚴",
            4.6,
            "Lisa Rodriguez",
            "Mountain bike with accessories",
        ),
    ]
});

static TRANSACTIONS: Lazy<Vec<Transaction>> = Lazy::new(|| {
    vec![
        transaction(
            "1",
            TransactionKind::Borrow,
            "Laptop - Dell XPS 13",
            "John Doe",
            50,
            ("2024-01-10", "2024-01-12"),
            TransactionStatus::Active,
            "💻",
        ),
        transaction(
            "2",
            TransactionKind::Lend,
            "Projector",
            "Jane Smith",
            200,
            ("2024-01-08", "2024-01-09"),
            TransactionStatus::Completed,
            "📽️",
        ),
        transaction(
            "3",
            TransactionKind::Borrow,
            "Textbook - Physics 101",
            "Mike Johnson",
            10,
            ("2024-01-05", "2024-01-07"),
            TransactionStatus::Overdue,
            "📚",
        ),
    ]
});

static USER_PROFILE: Lazy<UserProfile> = Lazy::new(|| UserProfile {
    name: "Juan Dela Cruz".to_string(),
    course: "Computer Science".to_string(),
    year_level: "3rd Year".to_string(),
    email: "juan.delacruz@ustp.edu.ph".to_string(),
    phone: "+63 917 123 4567".to_string(),
    rating: 4.8,
    credits: 2450,
    items_borrowed: 8,
    items_lent: 12,
    member_since: "January 2024".to_string(),
});

/// The six items listed on a fresh install.
pub fn items() -> Vec<Item> {
    ITEMS.clone()
}

/// Sample borrow/lend history shown on a fresh install.
pub fn transactions() -> Vec<Transaction> {
    TRANSACTIONS.clone()
}

/// Profile used until the user edits their own.
pub fn user_profile() -> UserProfile {
    USER_PROFILE.clone()
}

/// Items favourited on a fresh install.
pub fn favorites() -> Vec<String> {
    vec!["1".to_string(), "4".to_string()]
}

/// Search history starts empty.
pub fn search_history() -> Vec<String> {
    Vec::new()
}

#[allow(clippy::too_many_arguments)]
fn item(
    id: &str,
    title: &str,
    price: i64,
    category: &str,
    status: ItemStatus,
    image: &str,
    rating: f64,
    owner: &str,
    description: &str,
) -> Item {
    Item {
        id: id.to_string(),
        title: title.to_string(),
        price,
        category: category.to_string(),
        status,
        image: image.to_string(),
        rating,
        owner: owner.to_string(),
        description: Some(description.to_string()),
    }
}

#[allow(clippy::too_many_arguments)]
fn transaction(
    id: &str,
    kind: TransactionKind,
    item_name: &str,
    other_user: &str,
    price: i64,
    (start_date, end_date): (&str, &str),
    status: TransactionStatus,
    image: &str,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        kind,
        item_name: item_name.to_string(),
        other_user: other_user.to_string(),
        price,
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
        status,
        image: image.to_string(),
    }
}
