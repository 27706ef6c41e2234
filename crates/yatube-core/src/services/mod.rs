//! Services - the use cases handlers call into.

pub mod accounts;
pub mod feed;
pub mod feed_cache;
pub mod follow;
pub mod groups;
pub mod pagination;
pub mod submission;

use std::sync::Arc;

use crate::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};

pub use accounts::{AccountService, Session, SignupDraft};
pub use feed::{CommentCard, FeedComposer, GroupFeed, PostCard, PostDetail, ProfileFeed};
pub use feed_cache::FeedCache;
pub use follow::FollowService;
pub use groups::{GroupDraft, GroupService};
pub use pagination::{Page, PageWindow, Paginator};
pub use submission::{PostDraft, SubmissionService};

/// Handles to every table of the content store.
#[derive(Clone)]
pub struct ContentStore {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}
