//! Authentication handlers.

use actix_web::{HttpResponse, web};

use yatube_core::services::{Session, SignupDraft};
use yatube_shared::ApiResponse;
use yatube_shared::dto::{AuthResponse, LoginRequest, PasswordChangeRequest, SignupRequest};

use super::present;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn auth_response(session: Session) -> AuthResponse {
    AuthResponse {
        access_token: session.token,
        token_type: "Bearer".to_string(),
        expires_in: u64::try_from(session.expires_in).unwrap_or(0),
        user: present::user(session.user.summary()),
    }
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state
        .accounts
        .signup(SignupDraft {
            username: req.username,
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await?;

    Ok(HttpResponse::Created().json(auth_response(session)))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let session = state.accounts.login(&body.username, &body.password).await?;
    Ok(HttpResponse::Ok().json(auth_response(session)))
}

/// POST /auth/password_change/
pub async fn password_change(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    body: web::Json<PasswordChangeRequest>,
) -> AppResult<HttpResponse> {
    state
        .accounts
        .change_password(viewer.actor(), &body.old_password, &body.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        (),
        "Your password was changed.",
    )))
}
