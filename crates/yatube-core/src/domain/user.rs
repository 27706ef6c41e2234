use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;
use crate::error::DomainError;

pub const USERNAME_MAX_LEN: usize = 150;

/// User entity - an author, commenter or follower.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamp.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            password_hash,
            created_at: Utc::now(),
        }
    }

    pub fn with_name(mut self, first_name: String, last_name: String) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }

    /// "First Last", or the username when no name was given.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// Usernames are 1-150 characters of letters, digits and `@.+-_`.
    pub fn validate_username(username: &str) -> Result<(), DomainError> {
        if username.is_empty() || username.chars().count() > USERNAME_MAX_LEN {
            return Err(DomainError::validation(
                "username",
                format!("must be 1 to {USERNAME_MAX_LEN} characters"),
            ));
        }
        let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
        if !username.chars().all(allowed) {
            return Err(DomainError::validation(
                "username",
                "may contain only letters, digits and @/./+/-/_",
            ));
        }
        Ok(())
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            full_name: self.display_name(),
        }
    }
}

/// The public face of a user as shown next to posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user = User::new("leo".into(), "leo@example.com".into(), "hash".into());
        assert_eq!(user.display_name(), "leo");

        let user = user.with_name("Leo".into(), "Tolstoy".into());
        assert_eq!(user.display_name(), "Leo Tolstoy");
    }

    #[test]
    fn test_validate_username() {
        assert!(User::validate_username("auth_1").is_ok());
        assert!(User::validate_username("a.b+c@d-e").is_ok());
        assert!(User::validate_username("").is_err());
        assert!(User::validate_username("has space").is_err());
        assert!(User::validate_username(&"u".repeat(151)).is_err());
    }
}
