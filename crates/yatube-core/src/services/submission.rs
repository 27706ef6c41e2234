//! Post and comment submission.
//!
//! Every operation takes the acting user explicitly; `None` is an anonymous
//! caller and is turned away with [`DomainError::AuthRequired`] before any
//! read or write happens.

use std::sync::Arc;

use crate::domain::{self, Comment, GroupId, NewComment, NewPost, Post, PostId, UserId};
use crate::error::DomainError;
use crate::ports::{BaseRepository, ImageUpload, MediaStorage};

use super::ContentStore;
use super::feed_cache::FeedCache;

const IMAGE_FOLDER: &str = "posts";

/// The fields of the post form.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub text: String,
    /// Group slug; `None` or blank means no group.
    pub group: Option<String>,
    /// A new image. On edit, `None` keeps the current one.
    pub image: Option<ImageUpload>,
}

impl PostDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn in_group(mut self, slug: impl Into<String>) -> Self {
        self.group = Some(slug.into());
        self
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }
}

/// Validates and persists user-submitted posts and comments.
#[derive(Clone)]
pub struct SubmissionService {
    store: ContentStore,
    media: Arc<dyn MediaStorage>,
    feed_cache: FeedCache,
}

impl SubmissionService {
    pub fn new(store: ContentStore, media: Arc<dyn MediaStorage>, feed_cache: FeedCache) -> Self {
        Self {
            store,
            media,
            feed_cache,
        }
    }

    pub async fn create_post(
        &self,
        actor: Option<UserId>,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        let author_id = actor.ok_or(DomainError::AuthRequired)?;
        let text = domain::clean_text("text", &draft.text)?;
        let group_id = self.resolve_group(draft.group.as_deref()).await?;
        let image = self.store_image(draft.image.as_ref()).await?;

        let new_post = NewPost::new(author_id, text, group_id).with_image(image.clone());
        let post = match self.store.posts.create(new_post).await {
            Ok(post) => post,
            Err(e) => {
                self.discard_image(image.as_deref()).await;
                return Err(e.into());
            }
        };

        self.feed_cache.invalidate().await;
        tracing::info!(post_id = post.id, author = %author_id, "Post created");
        Ok(post)
    }

    pub async fn edit_post(
        &self,
        post_id: PostId,
        actor: Option<UserId>,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        let editor = actor.ok_or(DomainError::AuthRequired)?;
        let post = self.owned_post(post_id, editor).await?;

        let text = domain::clean_text("text", &draft.text)?;
        let group_id = self.resolve_group(draft.group.as_deref()).await?;
        let new_image = self.store_image(draft.image.as_ref()).await?;

        let old_image = post.image.clone();
        let changed = Post {
            text,
            group_id,
            image: new_image.clone().or_else(|| old_image.clone()),
            ..post
        };

        let updated = match self.store.posts.update(&changed).await {
            Ok(updated) => updated,
            Err(e) => {
                self.discard_image(new_image.as_deref()).await;
                return Err(e.into());
            }
        };

        if new_image.is_some() {
            self.discard_image(old_image.as_deref()).await;
        }

        self.feed_cache.invalidate().await;
        tracing::info!(post_id, editor = %editor, "Post edited");
        Ok(updated)
    }

    /// Delete a post and, through the store's cascade, its comments.
    pub async fn delete_post(&self, post_id: PostId, actor: Option<UserId>) -> Result<(), DomainError> {
        let editor = actor.ok_or(DomainError::AuthRequired)?;
        let post = self.owned_post(post_id, editor).await?;

        self.store.posts.delete(post_id).await?;
        self.discard_image(post.image.as_deref()).await;

        self.feed_cache.invalidate().await;
        tracing::info!(post_id, editor = %editor, "Post deleted");
        Ok(())
    }

    pub async fn create_comment(
        &self,
        post_id: PostId,
        actor: Option<UserId>,
        text: &str,
    ) -> Result<Comment, DomainError> {
        let author_id = actor.ok_or(DomainError::AuthRequired)?;

        if self.store.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("post", post_id));
        }

        let text = domain::clean_text("text", text)?;
        let comment = self
            .store
            .comments
            .create(NewComment::new(post_id, author_id, text))
            .await?;

        tracing::info!(post_id, comment_id = comment.id, "Comment added");
        Ok(comment)
    }

    async fn owned_post(&self, post_id: PostId, editor: UserId) -> Result<Post, DomainError> {
        let post = self
            .store
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        if post.author_id != editor {
            tracing::warn!(post_id, editor = %editor, "Rejected change by non-author");
            return Err(DomainError::Permission { post_id });
        }
        Ok(post)
    }

    async fn resolve_group(&self, slug: Option<&str>) -> Result<Option<GroupId>, DomainError> {
        let Some(slug) = slug.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        match self.store.groups.find_by_slug(slug).await? {
            Some(group) => Ok(Some(group.id)),
            None => Err(DomainError::validation(
                "group",
                format!("unknown group `{slug}`"),
            )),
        }
    }

    async fn store_image(&self, image: Option<&ImageUpload>) -> Result<Option<String>, DomainError> {
        match image {
            Some(upload) => Ok(Some(self.media.store(IMAGE_FOLDER, upload).await?)),
            None => Ok(None),
        }
    }

    async fn discard_image(&self, path: Option<&str>) {
        if let Some(path) = path {
            if let Err(e) = self.media.remove(path).await {
                tracing::warn!(path, error = %e, "Failed to remove post image");
            }
        }
    }
}
