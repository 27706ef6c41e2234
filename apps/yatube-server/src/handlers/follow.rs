//! Following authors.

use actix_web::{HttpResponse, web};

use yatube_shared::dto::FollowResponse;

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /profile/{username}/follow/
pub async fn profile_follow(
    state: web::Data<AppState>,
    username: web::Path<String>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let username = username.into_inner();
    state.follows.follow(viewer.actor(), &username).await?;

    Ok(HttpResponse::Ok().json(FollowResponse {
        author: username,
        following: true,
    }))
}

/// POST /profile/{username}/unfollow/
pub async fn profile_unfollow(
    state: web::Data<AppState>,
    username: web::Path<String>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let username = username.into_inner();
    state.follows.unfollow(viewer.actor(), &username).await?;

    Ok(HttpResponse::Ok().json(FollowResponse {
        author: username,
        following: false,
    }))
}
