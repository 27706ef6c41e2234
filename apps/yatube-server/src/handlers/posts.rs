//! Post and comment submission.

use actix_web::{HttpResponse, http::header, web};
use base64::{Engine, engine::general_purpose::STANDARD};

use yatube_core::domain::{PostId, UserId};
use yatube_core::ports::ImageUpload;
use yatube_core::services::PostDraft;
use yatube_shared::dto::{CommentForm, ImagePayload, PostForm};

use super::present;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn decode_image(payload: ImagePayload) -> AppResult<ImageUpload> {
    let invalid = |message: String| AppError::Validation {
        field: "image".to_string(),
        message,
    };

    let bytes = STANDARD
        .decode(payload.data.trim())
        .map_err(|e| invalid(format!("not valid base64: {e}")))?;
    ImageUpload::new(&payload.content_type, bytes).map_err(|e| invalid(e.to_string()))
}

fn draft(form: PostForm) -> AppResult<PostDraft> {
    let mut draft = PostDraft::new(form.text);
    draft.group = form.group;
    if let Some(image) = form.image {
        draft = draft.with_image(decode_image(image)?);
    }
    Ok(draft)
}

/// Anonymous form posts are sent to login before the form is even decoded.
fn require_login(viewer: &OptionalIdentity) -> AppResult<UserId> {
    viewer.actor().ok_or(AppError::LoginRequired)
}

/// POST /create/
pub async fn post_create(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    form: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let actor = require_login(&viewer)?;
    let post = state
        .submissions
        .create_post(Some(actor), draft(form.into_inner())?)
        .await?;

    let detail = state.feeds.post_detail(post.id).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/posts/{}/", post.id)))
        .json(present::post(detail.card)))
}

/// POST /posts/{post_id}/edit/
pub async fn post_edit(
    state: web::Data<AppState>,
    post_id: web::Path<PostId>,
    viewer: OptionalIdentity,
    form: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let actor = require_login(&viewer)?;
    let post_id = post_id.into_inner();
    state
        .submissions
        .edit_post(post_id, Some(actor), draft(form.into_inner())?)
        .await?;

    let detail = state.feeds.post_detail(post_id).await?;
    Ok(HttpResponse::Ok().json(present::post(detail.card)))
}

/// POST /posts/{post_id}/delete/
pub async fn post_delete(
    state: web::Data<AppState>,
    post_id: web::Path<PostId>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    state
        .submissions
        .delete_post(post_id.into_inner(), viewer.actor())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /posts/{post_id}/comment/
pub async fn add_comment(
    state: web::Data<AppState>,
    post_id: web::Path<PostId>,
    viewer: OptionalIdentity,
    form: web::Json<CommentForm>,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();
    let comment = state
        .submissions
        .create_comment(post_id, viewer.actor(), &form.text)
        .await?;

    // Re-read so the response carries the commenter's display name.
    let detail = state.feeds.post_detail(post_id).await?;
    let card = detail
        .comments
        .into_iter()
        .find(|card| card.comment.id == comment.id)
        .ok_or_else(|| AppError::Internal(format!("comment {} vanished", comment.id)))?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/posts/{post_id}/")))
        .json(present::comment(card)))
}
