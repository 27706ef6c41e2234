//! Read-only feed queries: global, group, profile and follow feeds, plus the
//! single-post view.

use std::collections::{HashMap, HashSet};

use crate::domain::{Comment, Group, Post, PostId, User, UserId, UserSummary};
use crate::error::DomainError;
use crate::ports::{BaseRepository, PostFilter};

use super::ContentStore;
use super::pagination::{Page, Paginator};

/// A post together with what a listing shows next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub post: Post,
    pub author: UserSummary,
    pub group: Option<Group>,
}

#[derive(Debug, Clone)]
pub struct GroupFeed {
    pub group: Group,
    pub page: Page<PostCard>,
}

#[derive(Debug, Clone)]
pub struct ProfileFeed {
    pub author: UserSummary,
    pub post_count: u64,
    /// Whether the viewer follows this author. Always false for anonymous viewers.
    pub following: bool,
    pub page: Page<PostCard>,
}

#[derive(Debug, Clone)]
pub struct CommentCard {
    pub comment: Comment,
    pub author: UserSummary,
}

#[derive(Debug, Clone)]
pub struct PostDetail {
    pub card: PostCard,
    pub author_post_count: u64,
    pub comments: Vec<CommentCard>,
}

/// Builds the ordered, paginated views consumed by presentation.
#[derive(Clone)]
pub struct FeedComposer {
    store: ContentStore,
    paginator: Paginator,
}

impl FeedComposer {
    pub fn new(store: ContentStore, paginator: Paginator) -> Self {
        Self { store, paginator }
    }

    pub fn paginator(&self) -> Paginator {
        self.paginator
    }

    /// Every post, newest first.
    pub async fn global_feed(&self, page: Option<&str>) -> Result<Page<PostCard>, DomainError> {
        self.page(&PostFilter::All, page).await
    }

    /// Posts in the group addressed by `slug`.
    pub async fn group_feed(&self, slug: &str, page: Option<&str>) -> Result<GroupFeed, DomainError> {
        let group = self
            .store
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))?;

        let page = self.page(&PostFilter::Group(group.id), page).await?;
        Ok(GroupFeed { group, page })
    }

    /// Posts written by `username`.
    pub async fn profile_feed(
        &self,
        username: &str,
        page: Option<&str>,
        viewer: Option<UserId>,
    ) -> Result<ProfileFeed, DomainError> {
        let author = self
            .store
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let filter = PostFilter::Author(author.id);
        let page = self.page(&filter, page).await?;

        let following = match viewer {
            Some(viewer) if viewer != author.id => {
                self.store.follows.find(viewer, author.id).await?.is_some()
            }
            _ => false,
        };

        Ok(ProfileFeed {
            author: author.summary(),
            post_count: page.count,
            following,
            page,
        })
    }

    /// Posts by the authors `actor` follows. Following nobody is an empty page.
    pub async fn follow_feed(
        &self,
        actor: Option<UserId>,
        page: Option<&str>,
    ) -> Result<Page<PostCard>, DomainError> {
        let actor = actor.ok_or(DomainError::AuthRequired)?;

        let authors = self.store.follows.followed_authors(actor).await?;
        if authors.is_empty() {
            return Ok(self.paginator.window(0, page).into_page(Vec::new()));
        }

        self.page(&PostFilter::Authors(authors), page).await
    }

    /// A single post with its comments, oldest comment first.
    pub async fn post_detail(&self, post_id: PostId) -> Result<PostDetail, DomainError> {
        let post = self
            .store
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        let author_post_count = self
            .store
            .posts
            .count(&PostFilter::Author(post.author_id))
            .await?;

        let comments = self.store.comments.list_for_post(post_id).await?;
        let commenter_ids: Vec<UserId> = comments.iter().map(|c| c.author_id).collect();
        let commenters = self.users_by_id(&commenter_ids).await?;

        let comments = comments
            .into_iter()
            .map(|comment| {
                let author = summary_for(&commenters, comment.author_id)?;
                Ok(CommentCard { comment, author })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let card = self
            .cards(vec![post])
            .await?
            .pop()
            .ok_or_else(|| DomainError::Internal("post card missing".to_string()))?;

        Ok(PostDetail {
            card,
            author_post_count,
            comments,
        })
    }

    async fn page(
        &self,
        filter: &PostFilter,
        page: Option<&str>,
    ) -> Result<Page<PostCard>, DomainError> {
        let count = self.store.posts.count(filter).await?;
        let window = self.paginator.window(count, page);
        let posts = self
            .store
            .posts
            .fetch(filter, window.offset, window.limit)
            .await?;

        tracing::debug!(
            ?filter,
            count,
            page = window.number,
            fetched = posts.len(),
            "Feed page composed"
        );

        Ok(window.into_page(self.cards(posts).await?))
    }

    async fn cards(&self, posts: Vec<Post>) -> Result<Vec<PostCard>, DomainError> {
        let author_ids: Vec<UserId> = posts.iter().map(|p| p.author_id).collect();
        let authors = self.users_by_id(&author_ids).await?;

        let group_ids: Vec<_> = unique(posts.iter().filter_map(|p| p.group_id));
        let groups: HashMap<_, _> = if group_ids.is_empty() {
            HashMap::new()
        } else {
            self.store
                .groups
                .find_by_ids(&group_ids)
                .await?
                .into_iter()
                .map(|g| (g.id, g))
                .collect()
        };

        posts
            .into_iter()
            .map(|post| {
                let author = summary_for(&authors, post.author_id)?;
                let group = post.group_id.and_then(|id| groups.get(&id).cloned());
                Ok(PostCard {
                    post,
                    author,
                    group,
                })
            })
            .collect()
    }

    async fn users_by_id(&self, ids: &[UserId]) -> Result<HashMap<UserId, User>, DomainError> {
        let ids = unique(ids.iter().copied());
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let users = self.store.users.find_by_ids(&ids).await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }
}

fn unique<T: Eq + std::hash::Hash + Copy>(ids: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

fn summary_for(users: &HashMap<UserId, User>, id: UserId) -> Result<UserSummary, DomainError> {
    users
        .get(&id)
        .map(User::summary)
        .ok_or_else(|| DomainError::Internal(format!("author {id} missing from store")))
}
