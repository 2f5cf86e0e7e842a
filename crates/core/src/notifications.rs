//! Notification message templates.

/// Reminder that a rental is about to expire.
pub fn rental_reminder(item_name: &str, days_left: u32) -> String {
    format!(
        "Your rental of \"{item_name}\" expires in {days_left} day(s). Return before overdue."
    )
}

/// Sent to an owner when someone asks to borrow their item.
pub fn new_lend_request(user_name: &str, item_name: &str) -> String {
    format!("{user_name} requested to borrow your {item_name}")
}

/// Credit reward for a completed lend.
pub fn credits_earned(amount: i64) -> String {
    format!("You earned {amount} credits from lending!")
}

/// Confirmation that a lent item came back.
pub fn item_returned(item_name: &str, credits_earned: i64) -> String {
    format!(
        "{item_name} was returned successfully. {credits_earned} credits added to your account."
    )
}
