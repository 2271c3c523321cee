//! Session user types.

use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId};

/// The signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Partial profile edit. Only the fields that are `Some` are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<Email>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    /// Merge the present fields into `user`.
    ///
    /// Blank names are ignored so a cleared form field cannot erase the
    /// display name.
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            let name = name.trim();
            if !name.is_empty() {
                name.clone_into(&mut user.name);
            }
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = Some(avatar).filter(|a| !a.trim().is_empty());
        }
    }

    /// Whether applying this update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.avatar.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: UserId::new(1),
            name: "Jane Doe".to_string(),
            email: Email::parse("jane@aurora.test").unwrap(),
            avatar: None,
        }
    }

    #[test]
    fn test_apply_merges_present_fields_only() {
        let mut u = user();
        ProfileUpdate {
            name: Some("Jane Q. Doe".to_string()),
            ..ProfileUpdate::default()
        }
        .apply(&mut u);

        assert_eq!(u.name, "Jane Q. Doe");
        assert_eq!(u.email.as_str(), "jane@aurora.test");
    }

    #[test]
    fn test_apply_ignores_blank_name() {
        let mut u = user();
        ProfileUpdate {
            name: Some("   ".to_string()),
            ..ProfileUpdate::default()
        }
        .apply(&mut u);
        assert_eq!(u.name, "Jane Doe");
    }

    #[test]
    fn test_apply_clears_avatar_with_blank_value() {
        let mut u = user();
        u.avatar = Some("https://img.test/a.png".to_string());
        ProfileUpdate {
            avatar: Some(String::new()),
            ..ProfileUpdate::default()
        }
        .apply(&mut u);
        assert!(u.avatar.is_none());
    }

    #[test]
    fn test_empty_update() {
        assert!(ProfileUpdate::default().is_empty());
    }
}
