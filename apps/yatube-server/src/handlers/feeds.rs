//! Read-only feed pages.

use actix_web::{HttpResponse, http::header::ContentType, web};
use serde::Deserialize;

use yatube_core::DomainError;
use yatube_core::domain::PostId;
use yatube_core::services::Paginator;
use yatube_shared::dto::{GroupFeedResponse, ProfileResponse};

use super::present;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// `?page=` as sent; anything unusable falls back to the first page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    fn raw(&self) -> Option<&str> {
        self.page.as_deref()
    }
}

/// GET / - every post, newest first. Rendered pages are cached.
pub async fn index(state: web::Data<AppState>, query: web::Query<PageQuery>) -> AppResult<HttpResponse> {
    let raw = query.raw();
    let number = Paginator::parse_page(raw);

    let body = state
        .feed_cache
        .get_or_render(number, || async {
            let page = state.feeds.global_feed(raw).await?;
            serde_json::to_string(&present::page(page))
                .map_err(|e| DomainError::Internal(format!("render index page: {e}")))
        })
        .await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let feed = state.feeds.group_feed(&slug, query.raw()).await?;

    Ok(HttpResponse::Ok().json(GroupFeedResponse {
        group: present::group(feed.group),
        page: present::page(feed.page),
    }))
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let feed = state
        .feeds
        .profile_feed(&username, query.raw(), viewer.actor())
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        author: present::user(feed.author),
        post_count: feed.post_count,
        following: feed.following,
        page: present::page(feed.page),
    }))
}

/// GET /follow/ - posts by the authors the caller follows.
pub async fn follow_index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let page = state.feeds.follow_feed(viewer.actor(), query.raw()).await?;
    Ok(HttpResponse::Ok().json(present::page(page)))
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    post_id: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let detail = state.feeds.post_detail(post_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(present::post_detail(detail)))
}
