use std::fmt;

use serde::{Deserialize, Serialize};

use super::{FollowId, UserId};

/// `user_id` follows `author_id`. The pair is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub id: FollowId,
    pub user_id: UserId,
    pub author_id: UserId,
}

impl fmt::Display for Follow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.user_id, self.author_id)
    }
}
