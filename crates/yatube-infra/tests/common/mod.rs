#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use yatube_core::domain::{Group, NewGroup, Post, User};
use yatube_core::ports::{ImageUpload, PostFilter};
use yatube_core::services::{
    ContentStore, FeedCache, FeedComposer, FollowService, GroupService, Paginator, PostDraft,
    SubmissionService,
};
use yatube_infra::{InMemoryCache, InMemoryContentStore, InMemoryMediaStorage};

pub const SMALL_GIF: &[u8] = b"GIF89a\x02\x00\x01\x00\x80\x00\x00\x00\x00\x00\xFF\xFF\xFF\x21\xF9\x04\x00\x00\x00\x00\x00\x2C\x00\x00\x00\x00\x02\x00\x01\x00\x00\x02\x02\x0C\x0A\x00\x3B";

/// Services wired to in-memory infrastructure.
pub struct World {
    pub store: ContentStore,
    pub cache: Arc<InMemoryCache>,
    pub media: Arc<InMemoryMediaStorage>,
    pub feed_cache: FeedCache,
    pub feeds: FeedComposer,
    pub submissions: SubmissionService,
    pub follows: FollowService,
    pub groups: GroupService,
}

impl World {
    pub fn new() -> Self {
        Self::with_page_size(10)
    }

    pub fn with_page_size(per_page: usize) -> Self {
        let store = Arc::new(InMemoryContentStore::new()).into_content_store();
        let cache = Arc::new(InMemoryCache::new());
        let media = Arc::new(InMemoryMediaStorage::new());
        let feed_cache = FeedCache::new(cache.clone(), Duration::from_secs(20));

        Self {
            feeds: FeedComposer::new(store.clone(), Paginator::new(per_page)),
            submissions: SubmissionService::new(store.clone(), media.clone(), feed_cache.clone()),
            follows: FollowService::new(store.clone()),
            groups: GroupService::new(store.clone()),
            store,
            cache,
            media,
            feed_cache,
        }
    }

    pub async fn user(&self, username: &str) -> User {
        let user = User::new(
            username.to_string(),
            format!("{username}@example.com"),
            "not-a-real-hash".to_string(),
        );
        self.store.users.create(user).await.unwrap()
    }

    pub async fn group(&self, slug: &str) -> Group {
        let group = NewGroup::new(&format!("Group {slug}"), slug, "Test description").unwrap();
        self.store.groups.create(group).await.unwrap()
    }

    pub async fn post(&self, author: &User, text: &str) -> Post {
        self.submissions
            .create_post(Some(author.id), PostDraft::new(text))
            .await
            .unwrap()
    }

    /// `n` posts by `author` in `group`, numbered 1..=n in creation order.
    pub async fn seed_posts(&self, author: &User, group: &Group, n: usize) -> Vec<Post> {
        let mut posts = Vec::with_capacity(n);
        for i in 1..=n {
            let draft = PostDraft::new(format!("Test post number {i}")).in_group(&group.slug);
            posts.push(
                self.submissions
                    .create_post(Some(author.id), draft)
                    .await
                    .unwrap(),
            );
        }
        posts
    }

    pub async fn post_count(&self) -> u64 {
        self.store.posts.count(&PostFilter::All).await.unwrap()
    }

    /// A stand-in for template rendering: one line per post on the page.
    pub async fn render_index(&self, page: Option<&str>) -> String {
        let page = self.feeds.global_feed(page).await.unwrap();
        let mut body = format!("page {}/{}\n", page.number, page.num_pages);
        for card in &page.items {
            body.push_str(&format!("{} {} {}\n", card.post.id, card.author.username, card.post.text));
        }
        body
    }
}

pub fn gif() -> ImageUpload {
    ImageUpload::new("image/gif", SMALL_GIF.to_vec()).unwrap()
}
