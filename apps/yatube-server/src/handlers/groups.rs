//! Group listing and creation.

use actix_web::{HttpResponse, http::header, web};

use yatube_core::services::GroupDraft;
use yatube_shared::dto::{GroupForm, GroupResponse};

use super::present;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /groups/
pub async fn group_list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let groups: Vec<GroupResponse> = state
        .groups
        .list_groups()
        .await?
        .into_iter()
        .map(present::group)
        .collect();
    Ok(HttpResponse::Ok().json(groups))
}

/// POST /groups/
pub async fn group_create(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    form: web::Json<GroupForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let group = state
        .groups
        .create_group(
            viewer.actor(),
            GroupDraft::new(form.title, form.slug, form.description),
        )
        .await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/group/{}/", group.slug)))
        .json(present::group(group)))
}
