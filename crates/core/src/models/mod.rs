//! Shared domain models.
//!
//! Every type here round-trips through JSON using camelCase field names and
//! lower-case enum values, matching what the storage layer writes under each key.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod profile;

pub use profile::{ProfilePatch, UserProfile};

/// Category filters offered by the marketplace. `All` matches every item.
pub const CATEGORIES: [&str; 6] = ["All", "Electronics", "Books", "Sports", "Tools", "Other"];

/// Category label that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Returned when a status or kind label does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
}

impl ParseLabelError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Availability of a listed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Free to borrow.
    Available,
    /// A borrow request is awaiting the owner.
    Pending,
    /// Currently lent out.
    Borrowed,
}

impl ItemStatus {
    /// Lower-case label used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Available => "available",
            ItemStatus::Pending => "pending",
            ItemStatus::Borrowed => "borrowed",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = ParseLabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(ItemStatus::Available),
            "pending" => Ok(ItemStatus::Pending),
            "borrowed" => Ok(ItemStatus::Borrowed),
            _ => Err(ParseLabelError::new("item status", value)),
        }
    }
}

/// An item listed for peer-to-peer lending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Identifier, expected to be unique within the repository.
    pub id: String,
    /// Listing title.
    pub title: String,
    /// Daily price in whole currency units.
    pub price: i64,
    /// Category label (see [`CATEGORIES`]).
    pub category: String,
    /// Current availability.
    pub status: ItemStatus,
    /// Glyph shown in place of a photo.
    pub image: String,
    /// Average rating between 0 and 5.
    pub rating: f64,
    /// Display name of the owner.
    pub owner: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Item {
    /// Case-insensitive title match. An empty needle matches everything.
    pub fn matches_title(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Category match where `All` acts as a wildcard.
    pub fn in_category(&self, category: &str) -> bool {
        category == ALL_CATEGORIES || self.category == category
    }
}

/// Direction of a transaction from the signed-in user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// The user borrows from someone else.
    Borrow,
    /// The user lends to someone else.
    Lend,
}

impl TransactionKind {
    /// Lower-case label used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Borrow => "borrow",
            TransactionKind::Lend => "lend",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ParseLabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "borrow" => Ok(TransactionKind::Borrow),
            "lend" => Ok(TransactionKind::Lend),
            _ => Err(ParseLabelError::new("transaction kind", value)),
        }
    }
}

/// Lifecycle of a transaction. Always set by the caller; nothing here derives
/// `Overdue` from the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Requested, not yet handed over.
    Pending,
    /// Item is with the borrower.
    Active,
    /// Item was returned.
    Completed,
    /// Item is past its end date.
    Overdue,
}

impl TransactionStatus {
    /// Lower-case label used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Active => "active",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Overdue => "overdue",
        }
    }

    /// Glyph shown next to the status badge.
    pub fn icon(&self) -> &'static str {
        match self {
            TransactionStatus::Active => "▶️",
            TransactionStatus::Completed => "✓",
            TransactionStatus::Pending => "⏳",
            TransactionStatus::Overdue => "⚠️",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = ParseLabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TransactionStatus::Pending),
            "active" => Ok(TransactionStatus::Active),
            "completed" => Ok(TransactionStatus::Completed),
            "overdue" => Ok(TransactionStatus::Overdue),
            _ => Err(ParseLabelError::new("transaction status", value)),
        }
    }
}

/// Filter applied when listing transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionFilter {
    /// Every transaction.
    #[default]
    All,
    /// Only transactions in this status.
    Status(TransactionStatus),
}

impl TransactionFilter {
    /// Whether `transaction` passes the filter.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Status(status) => transaction.status == *status,
        }
    }
}

impl FromStr for TransactionFilter {
    type Err = ParseLabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(TransactionFilter::All);
        }
        value.parse().map(TransactionFilter::Status)
    }
}

/// A borrow or lend agreement between the signed-in user and another student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Identifier, expected to be unique.
    pub id: String,
    /// Borrow or lend.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Title of the item involved.
    pub item_name: String,
    /// Display name of the counterpart.
    pub other_user: String,
    /// Agreed price in whole currency units.
    pub price: i64,
    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    pub start_date: String,
    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    pub end_date: String,
    /// Caller-managed lifecycle state.
    pub status: TransactionStatus,
    /// Glyph shown in place of a photo.
    pub image: String,
}
