//! Domain entities - the core business objects.

mod comment;
mod follow;
mod group;
mod post;
mod user;

pub use comment::{Comment, NewComment};
pub use follow::Follow;
pub use group::{Group, NewGroup};
pub use post::{NewPost, Post};
pub use user::{User, UserSummary};

use crate::error::DomainError;

pub type UserId = uuid::Uuid;
pub type GroupId = i64;
pub type PostId = i64;
pub type CommentId = i64;
pub type FollowId = i64;

/// Number of characters an entity shows when rendered as a short label.
pub(crate) const LABEL_LEN: usize = 15;

pub(crate) fn label(text: &str) -> String {
    text.chars().take(LABEL_LEN).collect()
}

/// Trim submitted free text and reject it when nothing is left.
pub fn clean_text(field: &'static str, text: &str) -> Result<String, DomainError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}
