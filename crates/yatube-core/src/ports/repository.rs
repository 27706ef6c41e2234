use async_trait::async_trait;

use crate::domain::{
    Comment, Follow, Group, GroupId, NewComment, NewGroup, NewPost, Post, PostId, User, UserId,
};
use crate::error::RepoError;

/// Generic repository trait defining the lookups every table shares.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID, applying the table's cascade rules.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository. Usernames are unique.
#[async_trait]
pub trait UserRepository: BaseRepository<User, UserId> {
    async fn create(&self, user: User) -> Result<User, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, RepoError>;

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), RepoError>;
}

/// Group repository. Slugs are unique; deleting a group detaches its posts.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, GroupId> {
    async fn create(&self, group: NewGroup) -> Result<Group, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    async fn find_by_ids(&self, ids: &[GroupId]) -> Result<Vec<Group>, RepoError>;

    /// All groups ordered by title.
    async fn list(&self) -> Result<Vec<Group>, RepoError>;
}

/// Which posts a feed shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(GroupId),
    Author(UserId),
    Authors(Vec<UserId>),
}

/// Post repository. Listing order is newest `pub_date` first, then newest id.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, PostId> {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Overwrite text, group and image. `pub_date` and author never change.
    async fn update(&self, post: &Post) -> Result<Post, RepoError>;

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError>;

    async fn fetch(
        &self,
        filter: &PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository. Comments go away with their post.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Comments on a post, oldest first.
    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, RepoError>;
}

/// Follow repository. (`user_id`, `author_id`) is unique.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn create(&self, user_id: UserId, author_id: UserId) -> Result<Follow, RepoError>;

    async fn find(&self, user_id: UserId, author_id: UserId) -> Result<Option<Follow>, RepoError>;

    /// Returns whether a row was removed.
    async fn delete_pair(&self, user_id: UserId, author_id: UserId) -> Result<bool, RepoError>;

    /// Authors `user_id` follows.
    async fn followed_authors(&self, user_id: UserId) -> Result<Vec<UserId>, RepoError>;
}
