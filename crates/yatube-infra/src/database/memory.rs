//! In-memory content store.
//!
//! Holds every table behind one lock so that cascades and uniqueness checks
//! happen atomically, the way a relational engine would apply them.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::domain::{
    Comment, CommentId, Follow, FollowId, Group, GroupId, NewComment, NewGroup, NewPost, Post,
    PostId, User, UserId,
};
use yatube_core::error::RepoError;
use yatube_core::ports::{
    BaseRepository, CommentRepository, FollowRepository, GroupRepository, PostFilter,
    PostRepository, UserRepository,
};
use yatube_core::services::ContentStore;

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    groups: BTreeMap<GroupId, Group>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    follows: BTreeMap<FollowId, Follow>,
    group_seq: GroupId,
    post_seq: PostId,
    comment_seq: CommentId,
    follow_seq: FollowId,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

fn require(field: &str, value: &str) -> Result<(), RepoError> {
    if value.trim().is_empty() {
        return Err(RepoError::Constraint(format!("{field} must not be empty")));
    }
    Ok(())
}

impl Tables {
    fn require_user(&self, id: UserId) -> Result<(), RepoError> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(RepoError::Constraint(format!("user {id} does not exist")))
        }
    }

    fn require_group(&self, id: Option<GroupId>) -> Result<(), RepoError> {
        match id {
            Some(id) if !self.groups.contains_key(&id) => {
                Err(RepoError::Constraint(format!("group {id} does not exist")))
            }
            _ => Ok(()),
        }
    }

    fn remove_post(&mut self, id: PostId) -> Option<Post> {
        let post = self.posts.remove(&id)?;
        self.comments.retain(|_, c| c.post_id != id);
        Some(post)
    }

    fn matching_posts(&self, filter: &PostFilter) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .values()
            .filter(|p| match filter {
                PostFilter::All => true,
                PostFilter::Group(id) => p.group_id == Some(*id),
                PostFilter::Author(id) => p.author_id == *id,
                PostFilter::Authors(ids) => ids.contains(&p.author_id),
            })
            .collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        posts
    }
}

/// Content store kept entirely in process memory.
#[derive(Default)]
pub struct InMemoryContentStore {
    tables: RwLock<Tables>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out this store as every repository of a [`ContentStore`].
    pub fn into_content_store(self: Arc<Self>) -> ContentStore {
        ContentStore {
            users: self.clone(),
            groups: self.clone(),
            posts: self.clone(),
            comments: self.clone(),
            follows: self,
        }
    }
}

#[async_trait]
impl BaseRepository<User, UserId> for InMemoryContentStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn delete(&self, id: UserId) -> Result<(), RepoError> {
        let mut t = self.tables.write().await;
        t.users.remove(&id).ok_or(RepoError::NotFound)?;

        let authored: Vec<PostId> = t
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in authored {
            t.remove_post(post_id);
        }
        t.comments.retain(|_, c| c.author_id != id);
        t.follows.retain(|_, f| f.user_id != id && f.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryContentStore {
    async fn create(&self, user: User) -> Result<User, RepoError> {
        require("username", &user.username)?;
        let mut t = self.tables.write().await;
        if t.users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Unique(format!(
                "username `{}` is taken",
                user.username
            )));
        }
        if t.users.contains_key(&user.id) {
            return Err(RepoError::Unique(format!("user id {} exists", user.id)));
        }
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, RepoError> {
        let t = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| t.users.get(id).cloned()).collect())
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), RepoError> {
        let mut t = self.tables.write().await;
        let user = t.users.get_mut(&id).ok_or(RepoError::NotFound)?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Group, GroupId> for InMemoryContentStore {
    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, RepoError> {
        Ok(self.tables.read().await.groups.get(&id).cloned())
    }

    async fn delete(&self, id: GroupId) -> Result<(), RepoError> {
        let mut t = self.tables.write().await;
        t.groups.remove(&id).ok_or(RepoError::NotFound)?;
        for post in t.posts.values_mut() {
            if post.group_id == Some(id) {
                post.group_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for InMemoryContentStore {
    async fn create(&self, group: NewGroup) -> Result<Group, RepoError> {
        require("title", &group.title)?;
        require("slug", &group.slug)?;
        let mut t = self.tables.write().await;
        if t.groups.values().any(|g| g.slug == group.slug) {
            return Err(RepoError::Unique(format!("slug `{}` is taken", group.slug)));
        }
        let group = Group {
            id: next(&mut t.group_seq),
            title: group.title,
            slug: group.slug,
            description: group.description,
        };
        t.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let t = self.tables.read().await;
        Ok(t.groups.values().find(|g| g.slug == slug).cloned())
    }

    async fn find_by_ids(&self, ids: &[GroupId]) -> Result<Vec<Group>, RepoError> {
        let t = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| t.groups.get(id).cloned()).collect())
    }

    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let t = self.tables.read().await;
        let mut groups: Vec<Group> = t.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(groups)
    }
}

#[async_trait]
impl BaseRepository<Post, PostId> for InMemoryContentStore {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        let mut t = self.tables.write().await;
        t.remove_post(id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryContentStore {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        require("text", &post.text)?;
        let mut t = self.tables.write().await;
        t.require_user(post.author_id)?;
        t.require_group(post.group_id)?;

        let post = Post {
            id: next(&mut t.post_seq),
            text: post.text,
            pub_date: post.pub_date,
            author_id: post.author_id,
            group_id: post.group_id,
            image: post.image,
        };
        t.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: &Post) -> Result<Post, RepoError> {
        require("text", &post.text)?;
        let mut t = self.tables.write().await;
        t.require_group(post.group_id)?;

        let stored = t.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        stored.text = post.text.clone();
        stored.group_id = post.group_id;
        stored.image = post.image.clone();
        Ok(stored.clone())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        let t = self.tables.read().await;
        Ok(t.matching_posts(filter).len() as u64)
    }

    async fn fetch(
        &self,
        filter: &PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let t = self.tables.read().await;
        Ok(t.matching_posts(filter)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommentRepository for InMemoryContentStore {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        require("text", &comment.text)?;
        let mut t = self.tables.write().await;
        t.require_user(comment.author_id)?;
        if !t.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                comment.post_id
            )));
        }

        let comment = Comment {
            id: next(&mut t.comment_seq),
            post_id: comment.post_id,
            author_id: comment.author_id,
            text: comment.text,
            created: comment.created,
        };
        t.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, RepoError> {
        let t = self.tables.read().await;
        let mut comments: Vec<Comment> = t
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(comments)
    }
}

#[async_trait]
impl FollowRepository for InMemoryContentStore {
    async fn create(&self, user_id: UserId, author_id: UserId) -> Result<Follow, RepoError> {
        let mut t = self.tables.write().await;
        t.require_user(user_id)?;
        t.require_user(author_id)?;
        if t
            .follows
            .values()
            .any(|f| f.user_id == user_id && f.author_id == author_id)
        {
            return Err(RepoError::Unique(format!(
                "{user_id} already follows {author_id}"
            )));
        }

        let follow = Follow {
            id: next(&mut t.follow_seq),
            user_id,
            author_id,
        };
        t.follows.insert(follow.id, follow.clone());
        Ok(follow)
    }

    async fn find(&self, user_id: UserId, author_id: UserId) -> Result<Option<Follow>, RepoError> {
        let t = self.tables.read().await;
        Ok(t.follows
            .values()
            .find(|f| f.user_id == user_id && f.author_id == author_id)
            .cloned())
    }

    async fn delete_pair(&self, user_id: UserId, author_id: UserId) -> Result<bool, RepoError> {
        let mut t = self.tables.write().await;
        let before = t.follows.len();
        t.follows
            .retain(|_, f| !(f.user_id == user_id && f.author_id == author_id));
        Ok(t.follows.len() < before)
    }

    async fn followed_authors(&self, user_id: UserId) -> Result<Vec<UserId>, RepoError> {
        let t = self.tables.read().await;
        Ok(t.follows
            .values()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.author_id)
            .collect())
    }
}
