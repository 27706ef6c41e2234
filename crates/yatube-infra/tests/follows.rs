mod common;

use common::World;
use yatube_core::DomainError;
use yatube_core::services::GroupDraft;

#[tokio::test]
async fn following_twice_keeps_one_row() {
    let world = World::new();
    let reader = world.user("reader").await;
    let author = world.user("author").await;

    let first = world.follows.follow(Some(reader.id), "author").await.unwrap();
    let second = world.follows.follow(Some(reader.id), "author").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(
        world.store.follows.followed_authors(reader.id).await.unwrap(),
        vec![author.id]
    );
}

#[tokio::test]
async fn self_follow_is_rejected() {
    let world = World::new();
    let leo = world.user("leo").await;

    let err = world.follows.follow(Some(leo.id), "leo").await.unwrap_err();

    assert!(matches!(err, DomainError::Validation { field: "author", .. }));
    assert!(world.store.follows.find(leo.id, leo.id).await.unwrap().is_none());
}

#[tokio::test]
async fn follow_requires_login_and_a_real_author() {
    let world = World::new();
    let reader = world.user("reader").await;
    world.user("author").await;

    let err = world.follows.follow(None, "author").await.unwrap_err();
    assert!(matches!(err, DomainError::AuthRequired));

    let err = world.follows.follow(Some(reader.id), "ghost").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "user", .. }));
}

#[tokio::test]
async fn unfollow_removes_the_pair_once() {
    let world = World::new();
    let reader = world.user("reader").await;
    let author = world.user("author").await;
    world.follows.follow(Some(reader.id), "author").await.unwrap();

    assert!(world.follows.unfollow(Some(reader.id), "author").await.unwrap());
    assert!(!world.follows.unfollow(Some(reader.id), "author").await.unwrap());
    assert!(world.store.follows.find(reader.id, author.id).await.unwrap().is_none());
}

#[tokio::test]
async fn groups_are_created_once_per_slug() {
    let world = World::new();
    let admin = world.user("admin").await;

    let group = world
        .groups
        .create_group(Some(admin.id), GroupDraft::new("Cats", "cats", "All about cats"))
        .await
        .unwrap();
    assert_eq!(group.slug, "cats");

    let err = world
        .groups
        .create_group(Some(admin.id), GroupDraft::new("Cats again", "cats", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));

    let err = world
        .groups
        .create_group(None, GroupDraft::new("Dogs", "dogs", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AuthRequired));

    let listed = world.groups.list_groups().await.unwrap();
    assert_eq!(listed.len(), 1);
}
