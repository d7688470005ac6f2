use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A person known to the ledger.
///
/// The id is issued externally (e.g. by the identity provider at sign-in)
/// and is opaque to the ledger; the email is unique across users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input form for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: Option<String>,
}

impl NewUser {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            display_name: display_name.into(),
            photo_url: None,
        }
    }

    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.display_name, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_builder() {
        let user = NewUser::new("u1", "ada@example.com", "Ada").with_photo_url("http://x/p.png");
        assert_eq!(user.id, "u1");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.photo_url.as_deref(), Some("http://x/p.png"));
    }

    #[test]
    fn test_user_display() {
        let user = User {
            id: "u1".to_string(),
            email: "ada@example.com".to_string(),
            display_name: "Ada".to_string(),
            photo_url: None,
            created_at: Utc::now(),
        };
        assert_eq!(format!("{}", user), "Ada <ada@example.com>");
    }
}
