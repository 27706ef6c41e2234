use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GroupId, PostId, UserId};

/// A published post. `pub_date` is fixed at creation and is the feed sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: UserId,
    pub group_id: Option<GroupId>,
    pub image: Option<String>,
}

/// A post that has not been stored yet; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: UserId,
    pub group_id: Option<GroupId>,
    pub image: Option<String>,
}

impl NewPost {
    /// Create a new post stamped with the current time.
    pub fn new(author_id: UserId, text: String, group_id: Option<GroupId>) -> Self {
        Self {
            text,
            pub_date: Utc::now(),
            author_id,
            group_id,
            image: None,
        }
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::label(&self.text))
    }
}
