use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Value, json};

use yatube_core::ports::BaseRepository;
use yatube_core::services::{ContentStore, SignupDraft};
use yatube_infra::{InMemoryCache, InMemoryContentStore, InMemoryMediaStorage, JwtConfig};

use super::configure_routes;
use crate::config::AppConfig;
use crate::middleware::login_redirect::LoginRedirect;
use crate::state::AppState;

const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00\x3B";

fn state() -> AppState {
    state_with_store().0
}

/// The state plus a handle on its store, for changes that bypass the services.
fn state_with_store() -> (AppState, ContentStore) {
    let store = Arc::new(InMemoryContentStore::new()).into_content_store();
    let config = AppConfig {
        jwt: JwtConfig {
            secret: "handler-tests".to_string(),
            ..JwtConfig::default()
        },
        ..AppConfig::default()
    };

    let state = AppState::assemble(
        store.clone(),
        "memory",
        Arc::new(InMemoryCache::new()),
        Arc::new(InMemoryMediaStorage::new()),
        &config,
    );
    (state, store)
}

async fn token_for(state: &AppState, username: &str) -> String {
    let session = state
        .accounts
        .signup(SignupDraft {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "a long password".to_string(),
            ..SignupDraft::default()
        })
        .await
        .unwrap();
    format!("Bearer {}", session.token)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(LoginRedirect)
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn anonymous_create_redirects_to_login() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/create/")
        .set_json(json!({ "text": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/auth/login/?next=/create/"
    );
}

#[actix_web::test]
async fn invalid_token_is_anonymous() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/follow/")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/auth/login/?next=/follow/"
    );
}

#[actix_web::test]
async fn signup_then_post_shows_on_index() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_json(json!({
            "username": "leo",
            "email": "leo@example.com",
            "password": "war and peace",
            "first_name": "Leo",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let token = format!("Bearer {}", body["access_token"].as_str().unwrap());
    assert_eq!(body["user"]["full_name"], "Leo");

    let req = test::TestRequest::post()
        .uri("/create/")
        .insert_header((header::AUTHORIZATION, token))
        .set_json(json!({
            "text": "Hello",
            "image": { "content_type": "image/gif", "data": STANDARD.encode(GIF) },
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["author"]["username"], "leo");
    assert!(created["image"].as_str().unwrap().starts_with("posts/"));

    let req = test::TestRequest::get().uri("/").to_request();
    let index: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(index["count"], 1);
    assert_eq!(index["items"][0]["id"], created["id"]);
    assert_eq!(index["items"][0]["text"], "Hello");
}

#[actix_web::test]
async fn index_is_served_from_cache_until_invalidated() {
    let (state, store) = state_with_store();
    let token = token_for(&state, "leo").await;
    let app = app!(state);

    let mut ids = Vec::new();
    for text in ["first", "second"] {
        let req = test::TestRequest::post()
            .uri("/create/")
            .insert_header((header::AUTHORIZATION, token.clone()))
            .set_json(json!({ "text": text }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(created["id"].as_i64().unwrap());
    }
    let newest = ids[1];

    let req = test::TestRequest::get().uri("/").to_request();
    let before = test::call_and_read_body(&app, req).await;

    store.posts.delete(newest).await.unwrap();

    let req = test::TestRequest::get().uri("/").to_request();
    let cached = test::call_and_read_body(&app, req).await;
    assert_eq!(cached, before);

    state.feed_cache.invalidate().await;

    let req = test::TestRequest::get().uri("/").to_request();
    let fresh: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fresh["count"], 1);
    assert_eq!(fresh["items"][0]["id"], ids[0]);
    assert!(
        fresh["items"]
            .as_array()
            .unwrap()
            .iter()
            .all(|item| item["id"] != newest)
    );
}

#[actix_web::test]
async fn blank_post_is_unprocessable() {
    let state = state();
    let token = token_for(&state, "leo").await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/create/")
        .insert_header((header::AUTHORIZATION, token))
        .set_json(json!({ "text": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "text");
}

#[actix_web::test]
async fn non_author_edit_redirects_to_post() {
    let state = state();
    let owner = token_for(&state, "owner").await;
    let intruder = token_for(&state, "intruder").await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/create/")
        .insert_header((header::AUTHORIZATION, owner))
        .set_json(json!({ "text": "original" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{id}/edit/"))
        .insert_header((header::AUTHORIZATION, intruder))
        .set_json(json!({ "text": "hijacked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
        format!("/posts/{id}/")
    );

    let req = test::TestRequest::get().uri(&format!("/posts/{id}/")).to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["post"]["text"], "original");
}

#[actix_web::test]
async fn missing_things_are_not_found() {
    let state = state();
    let app = app!(state);

    for uri in ["/group/nope/", "/profile/ghost/", "/posts/999/"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn bad_page_numbers_fall_back() {
    let state = state();
    let app = app!(state);

    for uri in ["/?page=abc", "/?page=-1", "/?page=50"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["number"], 1, "{uri}");
        assert_eq!(body["num_pages"], 1);
    }
}

#[actix_web::test]
async fn follow_feed_after_following() {
    let state = state();
    let author = token_for(&state, "author").await;
    let reader = token_for(&state, "reader").await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/create/")
        .insert_header((header::AUTHORIZATION, author))
        .set_json(json!({ "text": "for my followers" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/profile/author/follow/")
        .insert_header((header::AUTHORIZATION, reader.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["following"], true);

    let req = test::TestRequest::get()
        .uri("/follow/")
        .insert_header((header::AUTHORIZATION, reader.clone()))
        .to_request();
    let feed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(feed["count"], 1);
    assert_eq!(feed["items"][0]["text"], "for my followers");

    let req = test::TestRequest::get()
        .uri("/profile/author/")
        .insert_header((header::AUTHORIZATION, reader))
        .to_request();
    let profile: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile["following"], true);
    assert_eq!(profile["post_count"], 1);
}

#[actix_web::test]
async fn duplicate_group_slug_conflicts() {
    let state = state();
    let token = token_for(&state, "admin").await;
    let app = app!(state);

    let form = json!({ "title": "Cats", "slug": "cats", "description": "" });
    let req = test::TestRequest::post()
        .uri("/groups/")
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(&form)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/groups/")
        .insert_header((header::AUTHORIZATION, token))
        .set_json(&form)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get().uri("/groups/").to_request();
    let groups: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(groups.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn wrong_password_is_unauthorized() {
    let state = state();
    token_for(&state, "leo").await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_json(json!({ "username": "leo", "password": "nope nope nope" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn health_reports_the_store() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}
