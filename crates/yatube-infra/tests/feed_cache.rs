mod common;

use std::time::Duration;

use common::World;
use yatube_core::DomainError;
use yatube_core::ports::BaseRepository;
use yatube_core::services::{Paginator, PostDraft};

async fn cached_index(world: &World, raw: Option<&str>) -> String {
    let number = Paginator::parse_page(raw);
    world
        .feed_cache
        .get_or_render(number, || async move {
            Ok::<_, DomainError>(world.render_index(raw).await)
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn cached_page_survives_direct_deletion_until_cleared() {
    let world = World::new();
    let leo = world.user("leo").await;
    world.post(&leo, "first").await;
    let newest = world.post(&leo, "second").await;

    let before = cached_index(&world, None).await;
    assert!(before.contains("second"));

    world.store.posts.delete(newest.id).await.unwrap();
    let stale = cached_index(&world, None).await;
    assert_eq!(stale, before);

    world.feed_cache.invalidate().await;
    let fresh = cached_index(&world, None).await;
    assert_ne!(fresh, before);
    assert!(!fresh.contains("second"));
}

#[tokio::test(start_paused = true)]
async fn cached_page_expires_after_ttl() {
    let world = World::new();
    let leo = world.user("leo").await;
    let newest = world.post(&leo, "soon gone").await;

    let before = cached_index(&world, None).await;
    world.store.posts.delete(newest.id).await.unwrap();

    tokio::time::advance(Duration::from_secs(19)).await;
    assert_eq!(cached_index(&world, None).await, before);

    tokio::time::advance(Duration::from_secs(2)).await;
    let after = cached_index(&world, None).await;
    assert!(!after.contains("soon gone"));
}

#[tokio::test]
async fn post_mutations_drop_cached_pages() {
    let world = World::new();
    let leo = world.user("leo").await;
    let post = world.post(&leo, "v1").await;

    cached_index(&world, None).await;
    cached_index(&world, Some("1")).await;
    assert_eq!(world.cache.len().await, 1);

    world
        .submissions
        .edit_post(post.id, Some(leo.id), PostDraft::new("v2"))
        .await
        .unwrap();
    assert_eq!(world.cache.len().await, 0);
    assert!(cached_index(&world, None).await.contains("v2"));

    world.post(&leo, "v3").await;
    assert_eq!(world.cache.len().await, 0);
}

#[tokio::test]
async fn comments_leave_the_cache_alone() {
    let world = World::new();
    let leo = world.user("leo").await;
    let post = world.post(&leo, "topic").await;

    cached_index(&world, None).await;
    world
        .submissions
        .create_comment(post.id, Some(leo.id), "a remark")
        .await
        .unwrap();

    assert_eq!(world.cache.len().await, 1);
}
