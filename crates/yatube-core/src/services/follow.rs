//! Following and unfollowing authors.

use crate::domain::{Follow, User, UserId};
use crate::error::{DomainError, RepoError};

use super::ContentStore;

#[derive(Clone)]
pub struct FollowService {
    store: ContentStore,
}

impl FollowService {
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }

    /// Follow `username`. Following someone twice returns the existing pair.
    pub async fn follow(&self, actor: Option<UserId>, username: &str) -> Result<Follow, DomainError> {
        let user_id = actor.ok_or(DomainError::AuthRequired)?;
        let author = self.author(username).await?;

        if author.id == user_id {
            return Err(DomainError::validation("author", "you cannot follow yourself"));
        }

        if let Some(existing) = self.store.follows.find(user_id, author.id).await? {
            return Ok(existing);
        }

        match self.store.follows.create(user_id, author.id).await {
            Ok(follow) => {
                tracing::info!(user = %user_id, author = %author.id, "Follow created");
                Ok(follow)
            }
            // Lost a race with a concurrent identical follow.
            Err(RepoError::Unique(_)) => self
                .store
                .follows
                .find(user_id, author.id)
                .await?
                .ok_or_else(|| DomainError::Internal("follow vanished after conflict".to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Stop following `username`. Returns whether a follow existed.
    pub async fn unfollow(&self, actor: Option<UserId>, username: &str) -> Result<bool, DomainError> {
        let user_id = actor.ok_or(DomainError::AuthRequired)?;
        let author = self.author(username).await?;

        let removed = self.store.follows.delete_pair(user_id, author.id).await?;
        if removed {
            tracing::info!(user = %user_id, author = %author.id, "Follow removed");
        }
        Ok(removed)
    }

    async fn author(&self, username: &str) -> Result<User, DomainError> {
        self.store
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))
    }
}
