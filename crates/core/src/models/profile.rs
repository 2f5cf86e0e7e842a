#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

/// Profile of the signed-in student. A single instance is kept per device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub course: String,
    pub year_level: String,
    pub email: String,
    pub phone: String,
    pub rating: f64,
    /// Credit balance. No floor is enforced.
    pub credits: i64,
    pub items_borrowed: u32,
    pub items_lent: u32,
    pub member_since: String,
}

/// Partial update merged field-by-field over a [`UserProfile`].
///
/// `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub course: Option<String>,
    pub year_level: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub rating: Option<f64>,
    pub credits: Option<i64>,
    pub items_borrowed: Option<u32>,
    pub items_lent: Option<u32>,
    pub member_since: Option<String>,
}

impl ProfilePatch {
    /// Patch that only replaces the credit balance.
    pub fn credits(credits: i64) -> Self {
        Self {
            credits: Some(credits),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the patch in place.
    pub fn apply(self, profile: &mut UserProfile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(course) = self.course {
            profile.course = course;
        }
        if let Some(year_level) = self.year_level {
            profile.year_level = year_level;
        }
        if let Some(email) = self.email {
            profile.email = email;
        }
        if let Some(phone) = self.phone {
            profile.phone = phone;
        }
        if let Some(rating) = self.rating {
            profile.rating = rating;
        }
        if let Some(credits) = self.credits {
            profile.credits = credits;
        }
        if let Some(items_borrowed) = self.items_borrowed {
            profile.items_borrowed = items_borrowed;
        }
        if let Some(items_lent) = self.items_lent {
            profile.items_lent = items_lent;
        }
        if let Some(member_since) = self.member_since {
            profile.member_since = member_since;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    #[test]
    fn patch_overrides_only_present_fields() {
        let mut profile = defaults::user_profile();
        let before = profile.clone();

        ProfilePatch {
            phone: Some("+63 900 000 0000".to_string()),
            items_lent: Some(13),
            ..ProfilePatch::default()
        }
        .apply(&mut profile);

        assert_eq!(profile.phone, "+63 900 000 0000");
        assert_eq!(profile.items_lent, 13);
        assert_eq!(profile.name, before.name);
        assert_eq!(profile.credits, before.credits);
    }

    #[test]
    fn patch_deserialises_from_partial_json() {
        let patch: ProfilePatch = serde_json::from_str(r#"{"yearLevel":"4th Year"}"#).unwrap();
        assert_eq!(patch.year_level.as_deref(), Some("4th Year"));
        assert!(patch.credits.is_none());
        assert!(!patch.is_empty());
        assert!(ProfilePatch::default().is_empty());
    }
}
