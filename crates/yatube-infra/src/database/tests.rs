use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

use yatube_core::domain::{NewPost, Post};
use yatube_core::error::RepoError;
use yatube_core::ports::{BaseRepository, FollowRepository, PostFilter, PostRepository};

use super::entity::{follow, post};
use super::postgres_content_store;
use super::postgres_repo::{PostgresFollowRepository, PostgresPostRepository};

fn post_model(id: i64, text: &str, author_id: uuid::Uuid) -> post::Model {
    post::Model {
        id,
        text: text.to_owned(),
        pub_date: chrono::Utc::now().into(),
        author_id,
        group_id: None,
        image: None,
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let author_id = uuid::Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(7, "Test Post", author_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result: Option<Post> = repo.find_by_id(7_i64).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.id, 7);
    assert_eq!(post.text, "Test Post");
    assert_eq!(post.author_id, author_id);
}

#[tokio::test]
async fn test_create_post_returns_stored_row() {
    let author_id = uuid::Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(1, "Fresh", author_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post = repo
        .create(NewPost::new(author_id, "Fresh".to_string(), None))
        .await
        .unwrap();

    assert_eq!(post.id, 1);
    assert_eq!(post.text, "Fresh");
}

#[tokio::test]
async fn test_fetch_maps_rows_in_order() {
    let author_id = uuid::Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            post_model(2, "newer", author_id),
            post_model(1, "older", author_id),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts = repo
        .fetch(&PostFilter::Author(author_id), 0, 10)
        .await
        .unwrap();

    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = BaseRepository::<Post, i64>::delete(&repo, 42).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_delete_pair_reports_removal() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresFollowRepository::new(db);
    let removed = repo
        .delete_pair(uuid::Uuid::new_v4(), uuid::Uuid::new_v4())
        .await
        .unwrap();

    assert!(removed);
}

#[tokio::test]
async fn test_content_store_repositories_share_one_connection() {
    let author_id = uuid::Uuid::new_v4();
    let reader_id = uuid::Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(3, "Shared", author_id)]])
        .append_query_results(vec![vec![follow::Model {
            id: 1,
            user_id: reader_id,
            author_id,
        }]])
        .into_connection();

    let store = postgres_content_store(db);

    let post = store.posts.find_by_id(3).await.unwrap().unwrap();
    assert_eq!(post.text, "Shared");

    let authors = store.follows.followed_authors(reader_id).await.unwrap();
    assert_eq!(authors, vec![author_id]);
}
