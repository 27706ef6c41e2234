//! Signup, login and password change.

use std::sync::Arc;

use crate::domain::{User, UserId};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, PasswordService, TokenService, UserRepository};

pub const PASSWORD_MIN_LEN: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct SignupDraft {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// A logged-in user and the bearer token issued for them.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<dyn TokenService> {
        &self.tokens
    }

    pub async fn signup(&self, draft: SignupDraft) -> Result<Session, DomainError> {
        let username = draft.username.trim();
        User::validate_username(username)?;

        let email = draft.email.trim();
        if !email.is_empty() && !email.contains('@') {
            return Err(DomainError::validation("email", "enter a valid email address"));
        }
        check_password("password", &draft.password)?;

        let password_hash = self.passwords.hash(&draft.password)?;
        let user = User::new(username.to_string(), email.to_string(), password_hash).with_name(
            draft.first_name.trim().to_string(),
            draft.last_name.trim().to_string(),
        );

        let user = self.users.create(user).await.map_err(|e| match e {
            RepoError::Unique(_) => {
                DomainError::Duplicate(format!("username `{username}` is already taken"))
            }
            other => other.into(),
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User signed up");
        self.session(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, DomainError> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::warn!(username = %user.username, "Failed login attempt");
            return Err(DomainError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.session(user)
    }

    pub async fn change_password(
        &self,
        actor: Option<UserId>,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        let user_id = actor.ok_or(DomainError::AuthRequired)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::AuthRequired)?;

        if !self.passwords.verify(old_password, &user.password_hash)? {
            return Err(DomainError::validation(
                "old_password",
                "your old password was entered incorrectly",
            ));
        }
        check_password("new_password", new_password)?;

        let hash = self.passwords.hash(new_password)?;
        self.users.update_password(user_id, &hash).await?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    fn session(&self, user: User) -> Result<Session, DomainError> {
        let token = self
            .tokens
            .generate_token(user.id, &user.username)
            .map_err(|e| DomainError::Internal(format!("issue token: {e}")))?;
        Ok(Session {
            user,
            token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }
}

fn check_password(field: &'static str, password: &str) -> Result<(), DomainError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(DomainError::validation(
            field,
            format!("must contain at least {PASSWORD_MIN_LEN} characters"),
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation(field, "cannot be entirely numeric"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_rules() {
        assert!(check_password("password", "short").is_err());
        assert!(check_password("password", "12345678901").is_err());
        assert!(check_password("password", "correct horse").is_ok());
    }
}
